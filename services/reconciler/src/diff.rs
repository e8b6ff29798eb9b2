//! Dataset comparison
//!
//! A fixed, declared sequence of per-domain diff rules; the fixed order
//! keeps the report layout deterministic. Both sides are canonically
//! sorted before pairing, so producer ordering never affects the outcome.
//! Comparison never errors: every domain always yields a status, worst
//! case `ValuesMismatch`.

use std::collections::HashSet;

use serde::Serialize;

use types::prelude::*;

/// Compare two datasets domain by domain.
pub fn compare(core: &Dataset, datanode: &Dataset) -> Report {
    let statuses = vec![
        diff_accounts(core, datanode),
        diff_sorted(
            "orders",
            &core.orders,
            &datanode.orders,
            |o| o.id.clone(),
            order_eq,
        ),
        diff_sorted(
            "markets",
            &core.markets,
            &datanode.markets,
            |m| m.id.clone(),
            canonical_eq,
        ),
        diff_sorted(
            "parties",
            &core.parties,
            &datanode.parties,
            |p| p.id.clone(),
            canonical_eq,
        ),
        diff_singleton("networkLimits", &core.network_limits, &datanode.network_limits),
        diff_sorted(
            "assets",
            &core.assets,
            &datanode.assets,
            |a| a.id.clone(),
            canonical_eq,
        ),
        diff_scalar("currentTime", core.current_time, datanode.current_time),
        diff_sorted(
            "delegations",
            &core.delegations,
            &datanode.delegations,
            |d| (d.epoch_seq, d.node_id.clone(), d.party.clone()),
            canonical_eq,
        ),
        diff_singleton("epoch", &core.epoch, &datanode.epoch),
        diff_sorted(
            "nodes",
            &core.nodes,
            &datanode.nodes,
            |n| n.id.clone(),
            canonical_eq,
        ),
        diff_sorted(
            "networkParameters",
            &core.network_parameters,
            &datanode.network_parameters,
            |p| p.key.clone(),
            canonical_eq,
        ),
        diff_sorted(
            "proposals",
            &core.proposals,
            &datanode.proposals,
            |p| p.id.clone(),
            canonical_eq,
        ),
        diff_sorted(
            "deposits",
            &core.deposits,
            &datanode.deposits,
            |d| d.id.clone(),
            canonical_eq,
        ),
        diff_intersection("withdrawals", &core.withdrawals, &datanode.withdrawals, |w| {
            w.id.clone()
        }),
        diff_intersection("transfers", &core.transfers, &datanode.transfers, |t| {
            t.id.clone()
        }),
        diff_sorted(
            "positions",
            &core.positions,
            &datanode.positions,
            |p| (p.party.clone(), p.market.clone()),
            canonical_eq,
        ),
        diff_sorted(
            "liquidityProvisions",
            &core.liquidity_provisions,
            &datanode.liquidity_provisions,
            |l| l.id.clone(),
            canonical_eq,
        ),
        diff_sorted(
            "stakeLinks",
            &core.stake_links,
            &datanode.stake_links,
            |s| s.id.clone(),
            canonical_eq,
        ),
    ];
    Report::new(statuses)
}

// ── Pairwise equality rules ─────────────────────────────────────────

fn canonical_eq<T: Serialize>(a: &T, b: &T) -> bool {
    canonical_json(a) == canonical_json(b)
}

/// The snapshot does not emit a new event for unchanged state, so a pair
/// differing only in `updated_at` is forgiven.
fn order_eq(a: &Order, b: &Order) -> bool {
    if canonical_eq(a, b) {
        return true;
    }
    let mut a = a.clone();
    let mut b = b.clone();
    a.updated_at = 0;
    b.updated_at = 0;
    canonical_eq(&a, &b)
}

// ── Diff helpers ────────────────────────────────────────────────────

fn diff_sorted<T, K, E>(
    key: &'static str,
    core: &[T],
    datanode: &[T],
    sort_key: impl Fn(&T) -> K,
    eq: E,
) -> DomainStatus
where
    T: Clone + Serialize,
    K: Ord,
    E: Fn(&T, &T) -> bool,
{
    let mut core: Vec<T> = core.to_vec();
    core.sort_by_key(|record| sort_key(record));
    let mut datanode: Vec<T> = datanode.to_vec();
    datanode.sort_by_key(|record| sort_key(record));

    let result = if core.len() != datanode.len() {
        MatchResult::SizeMismatch
    } else if core.iter().zip(&datanode).any(|(a, b)| !eq(a, b)) {
        MatchResult::ValuesMismatch
    } else {
        MatchResult::FullMatch
    };

    DomainStatus {
        key,
        result,
        core_len: core.len(),
        datanode_len: datanode.len(),
        core_dump: canonical_json(&core),
        datanode_dump: canonical_json(&datanode),
    }
}

/// Append-only domains: the read-model never deletes while the snapshot
/// may prune, so only ids present on both sides are paired.
fn diff_intersection<T>(
    key: &'static str,
    core: &[T],
    datanode: &[T],
    id: impl Fn(&T) -> String,
) -> DomainStatus
where
    T: Clone + Serialize,
{
    let core_ids: HashSet<String> = core.iter().map(&id).collect();
    let datanode_ids: HashSet<String> = datanode.iter().map(&id).collect();

    let core_kept: Vec<T> = core
        .iter()
        .filter(|record| datanode_ids.contains(&id(record)))
        .cloned()
        .collect();
    let datanode_kept: Vec<T> = datanode
        .iter()
        .filter(|record| core_ids.contains(&id(record)))
        .cloned()
        .collect();

    diff_sorted(key, &core_kept, &datanode_kept, |record| id(record), canonical_eq)
}

/// The read-model retains accounts for settled markets and historical
/// parties the snapshot has pruned; restrict both sides to the snapshot's
/// universe before pairing.
fn diff_accounts(core: &Dataset, datanode: &Dataset) -> DomainStatus {
    let markets: HashSet<&str> = core.markets.iter().map(|m| m.id.as_str()).collect();
    let owners: HashSet<&str> = core.parties.iter().map(|p| p.id.as_str()).collect();
    let in_universe = |account: &Account| {
        (account.market.is_empty() || markets.contains(account.market.as_str()))
            && (account.owner.is_empty() || owners.contains(account.owner.as_str()))
    };

    let core_kept: Vec<Account> = core.accounts.iter().filter(|a| in_universe(a)).cloned().collect();
    let datanode_kept: Vec<Account> = datanode
        .accounts
        .iter()
        .filter(|a| in_universe(a))
        .cloned()
        .collect();

    diff_sorted(
        "accounts",
        &core_kept,
        &datanode_kept,
        |a| {
            (
                a.owner.clone(),
                a.market.clone(),
                a.asset.clone(),
                a.kind,
            )
        },
        canonical_eq,
    )
}

fn diff_singleton<T: Clone + Serialize>(
    key: &'static str,
    core: &Option<T>,
    datanode: &Option<T>,
) -> DomainStatus {
    let core_len = usize::from(core.is_some());
    let datanode_len = usize::from(datanode.is_some());

    let result = if core_len != datanode_len {
        MatchResult::SizeMismatch
    } else if !canonical_eq(core, datanode) {
        MatchResult::ValuesMismatch
    } else {
        MatchResult::FullMatch
    };

    DomainStatus {
        key,
        result,
        core_len,
        datanode_len,
        core_dump: canonical_json(core),
        datanode_dump: canonical_json(datanode),
    }
}

fn diff_scalar(key: &'static str, core: i64, datanode: i64) -> DomainStatus {
    DomainStatus {
        key,
        result: if core == datanode {
            MatchResult::FullMatch
        } else {
            MatchResult::ValuesMismatch
        },
        core_len: 1,
        datanode_len: 1,
        core_dump: core.to_string(),
        datanode_dump: datanode.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, updated_at: i64) -> Order {
        Order {
            id: id.into(),
            market: "mkt-1".into(),
            party: "alice".into(),
            side: Side::Buy,
            price: "100".into(),
            size: 5,
            remaining: 5,
            status: OrderStatus::Active,
            reference: String::new(),
            created_at: 1_000,
            updated_at,
            version: 1,
        }
    }

    fn account(owner: &str, market: &str, balance: &str) -> Account {
        Account {
            owner: owner.into(),
            market: market.into(),
            asset: "usd".into(),
            kind: AccountKind::General,
            balance: balance.into(),
        }
    }

    fn market(id: &str) -> Market {
        Market {
            id: id.into(),
            code: id.into(),
            settlement_asset: "usd".into(),
            decimal_places: 5,
            status: MarketStatus::Active,
        }
    }

    fn withdrawal(id: &str, amount: &str) -> Withdrawal {
        Withdrawal {
            id: id.into(),
            party: "alice".into(),
            asset: "usd".into(),
            amount: amount.into(),
            status: WithdrawalStatus::Finalized,
            reference: String::new(),
            expiry: 0,
            created_at: 0,
            withdrawn_at: 0,
            foreign_tx_hash: String::new(),
        }
    }

    fn sample() -> Dataset {
        Dataset {
            orders: vec![order("o1", 10_000), order("o2", 20_000)],
            markets: vec![market("mkt-1")],
            parties: vec![Party::new("alice"), Party::new("network")],
            accounts: vec![account("alice", "mkt-1", "100"), account("", "", "7")],
            withdrawals: vec![withdrawal("w1", "5"), withdrawal("w2", "6")],
            current_time: 1_700_000_000_000_001_000,
            ..Dataset::default()
        }
    }

    fn reversed(mut dataset: Dataset) -> Dataset {
        dataset.accounts.reverse();
        dataset.orders.reverse();
        dataset.markets.reverse();
        dataset.parties.reverse();
        dataset.assets.reverse();
        dataset.delegations.reverse();
        dataset.nodes.reverse();
        dataset.network_parameters.reverse();
        dataset.proposals.reverse();
        dataset.deposits.reverse();
        dataset.withdrawals.reverse();
        dataset.transfers.reverse();
        dataset.positions.reverse();
        dataset.liquidity_provisions.reverse();
        dataset.stake_links.reverse();
        dataset
    }

    #[test]
    fn test_identical_datasets_fully_match() {
        let report = compare(&sample(), &sample());
        assert!(report.success(), "{}", report.render_failures());
        assert_eq!(report.statuses().len(), 18);
    }

    #[test]
    fn test_reordered_collections_do_not_change_report() {
        let core = sample();
        let shuffled = reversed(sample());

        let straight = compare(&core, &core);
        let crossed = compare(&core, &shuffled);

        assert!(crossed.success(), "{}", crossed.render_failures());
        assert_eq!(straight, crossed);
    }

    #[test]
    fn test_fixed_domain_order() {
        let report = compare(&Dataset::default(), &Dataset::default());
        let keys: Vec<&str> = report.statuses().iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec![
                "accounts",
                "orders",
                "markets",
                "parties",
                "networkLimits",
                "assets",
                "currentTime",
                "delegations",
                "epoch",
                "nodes",
                "networkParameters",
                "proposals",
                "deposits",
                "withdrawals",
                "transfers",
                "positions",
                "liquidityProvisions",
                "stakeLinks",
            ]
        );
    }

    #[test]
    fn test_size_mismatch() {
        let core = sample();
        let mut datanode = sample();
        datanode.orders.push(order("o3", 30_000));

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "orders").unwrap();
        assert_eq!(status.result, MatchResult::SizeMismatch);
        assert_eq!(status.core_len, 2);
        assert_eq!(status.datanode_len, 3);
    }

    #[test]
    fn test_values_mismatch() {
        let core = sample();
        let mut datanode = sample();
        datanode.accounts[0].balance = "999".into();

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "accounts").unwrap();
        assert_eq!(status.result, MatchResult::ValuesMismatch);
        assert!(!report.success());
    }

    #[test]
    fn test_order_updated_at_is_forgiven_when_rest_matches() {
        let core = sample();
        let mut datanode = sample();
        datanode.orders[0].updated_at = 999_000;

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "orders").unwrap();
        assert_eq!(status.result, MatchResult::FullMatch);
    }

    #[test]
    fn test_order_updated_at_not_forgiven_with_other_changes() {
        let core = sample();
        let mut datanode = sample();
        datanode.orders[0].updated_at = 999_000;
        datanode.orders[0].remaining = 1;

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "orders").unwrap();
        assert_eq!(status.result, MatchResult::ValuesMismatch);
    }

    #[test]
    fn test_withdrawals_compared_on_id_intersection() {
        let core = sample(); // w1, w2
        let mut datanode = sample();
        datanode.withdrawals.push(withdrawal("w3", "9")); // retained history

        let report = compare(&core, &datanode);
        let status = report
            .statuses()
            .iter()
            .find(|s| s.key == "withdrawals")
            .unwrap();
        assert_eq!(status.result, MatchResult::FullMatch);
        assert_eq!(status.core_len, 2);
        assert_eq!(status.datanode_len, 2);
    }

    #[test]
    fn test_withdrawal_value_drift_still_detected_inside_intersection() {
        let core = sample();
        let mut datanode = sample();
        datanode.withdrawals[1].amount = "1000000".into();

        let report = compare(&core, &datanode);
        let status = report
            .statuses()
            .iter()
            .find(|s| s.key == "withdrawals")
            .unwrap();
        assert_eq!(status.result, MatchResult::ValuesMismatch);
    }

    #[test]
    fn test_accounts_restricted_to_core_market_universe() {
        let core = sample();
        let mut datanode = sample();
        // Account on a settled market the snapshot no longer carries.
        datanode.accounts.push(account("alice", "settled-mkt", "3"));

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "accounts").unwrap();
        assert_eq!(status.result, MatchResult::FullMatch);
    }

    #[test]
    fn test_accounts_restricted_to_core_party_universe() {
        let core = sample();
        let mut datanode = sample();
        datanode.accounts.push(account("ghost-party", "mkt-1", "3"));

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "accounts").unwrap();
        assert_eq!(status.result, MatchResult::FullMatch);
    }

    #[test]
    fn test_singleton_presence_mismatch() {
        let mut core = Dataset::default();
        core.epoch = Some(Epoch {
            seq: 4,
            start_time: 1_000,
            expire_time: 2_000,
        });
        let datanode = Dataset::default();

        let report = compare(&core, &datanode);
        let status = report.statuses().iter().find(|s| s.key == "epoch").unwrap();
        assert_eq!(status.result, MatchResult::SizeMismatch);
        assert_eq!(status.core_len, 1);
        assert_eq!(status.datanode_len, 0);
    }

    #[test]
    fn test_scalar_time_mismatch() {
        let core = sample();
        let mut datanode = sample();
        datanode.current_time += 1_000;

        let report = compare(&core, &datanode);
        let status = report
            .statuses()
            .iter()
            .find(|s| s.key == "currentTime")
            .unwrap();
        assert_eq!(status.result, MatchResult::ValuesMismatch);
        assert!(report
            .render_failures()
            .contains("key=currentTime, matchResult=mismatching values"));
    }
}
