//! Snapshot payload extraction
//!
//! Turns the decoded payloads of one store version into the canonical
//! [`Dataset`]. Multi-chunk domains accumulate across payload occurrences;
//! singleton domains keep the first occurrence only. All normalization
//! rules that make the snapshot comparable to the read-model are applied
//! here: timestamp truncation, sentinel translation, price rescaling and
//! dropping fields the read-model never serves.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use types::prelude::*;

use crate::envelope::{AppStatePayload, MatchingBookPayload, Payload};
use crate::normalize::{
    account_market, account_owner, owner_to_party, scale_price, truncate_to_micros,
};

/// Build a dataset from one version's decoded payloads.
pub fn extract(payloads: Vec<Payload>) -> Dataset {
    let mut app_state: Option<AppStatePayload> = None;
    let mut accounts: Vec<Account> = Vec::new();
    let mut books: Vec<MatchingBookPayload> = Vec::new();
    let mut markets: Vec<Market> = Vec::new();
    let mut assets: Vec<Asset> = Vec::new();
    let mut limits: Option<NetworkLimits> = None;
    let mut delegations: Vec<Delegation> = Vec::new();
    let mut epoch: Option<Epoch> = None;
    let mut proposals: Vec<Proposal> = Vec::new();
    let mut withdrawals: Vec<Withdrawal> = Vec::new();
    let mut deposits: Vec<Deposit> = Vec::new();
    let mut transfers: Vec<Transfer> = Vec::new();
    let mut stake_links: Vec<StakeLink> = Vec::new();
    let mut provisions: Vec<LiquidityProvision> = Vec::new();
    let mut nodes: Vec<ValidatorNode> = Vec::new();
    let mut parameters: Vec<NetworkParameter> = Vec::new();

    for payload in payloads {
        match payload {
            Payload::AppState(p) => {
                if app_state.is_none() {
                    app_state = Some(p);
                }
            }
            Payload::CollateralAccounts(p) => accounts.extend(p.accounts),
            Payload::MatchingBook(p) => books.push(p),
            Payload::ExecutionMarkets(p) => markets.extend(p.markets),
            Payload::ActiveAssets(p) => assets.extend(p.assets),
            Payload::PendingAssets(p) => assets.extend(p.assets),
            Payload::NetworkLimits(p) => {
                if limits.is_none() {
                    limits = Some(p.limits);
                }
            }
            Payload::ActiveDelegations(p) => delegations.extend(p.delegations),
            Payload::Epoch(p) => {
                if epoch.is_none() {
                    epoch = Some(p.epoch);
                }
            }
            Payload::GovernanceActive(p) => proposals.extend(p.proposals),
            Payload::GovernanceEnacted(p) => proposals.extend(p.proposals),
            Payload::GovernanceNode(p) => proposals.extend(p.proposals),
            Payload::BankingWithdrawals(p) => withdrawals.extend(p.withdrawals),
            Payload::BankingDeposits(p) => deposits.extend(p.deposits),
            Payload::ScheduledTransfers(p) => transfers.extend(p.transfers),
            Payload::RecurringTransfers(p) => transfers.extend(p.transfers),
            Payload::StakingAccounts(p) => stake_links.extend(p.stake_links),
            Payload::LiquidityProvisions(p) => provisions.extend(p.provisions),
            Payload::Topology(p) => nodes.extend(p.nodes),
            Payload::NetworkParameters(p) => parameters.extend(p.parameters),
            Payload::Ignored(_) => {}
        }
    }

    // Parties are derived, not stored: distinct owners plus delegators,
    // with the sentinel owner mapped to the network party. Derived before
    // account sentinel translation erases the owner.
    let mut party_ids: BTreeSet<String> = BTreeSet::new();
    for account in &accounts {
        party_ids.insert(owner_to_party(&account.owner));
    }
    for delegation in &delegations {
        party_ids.insert(delegation.party.clone());
    }
    let parties: Vec<Party> = party_ids.into_iter().map(Party::new).collect();

    let accounts: Vec<Account> = accounts
        .into_iter()
        .map(|mut account| {
            account.owner = account_owner(&account.owner);
            account.market = account_market(&account.market);
            account
        })
        .collect();

    let market_by_id: HashMap<&str, &Market> =
        markets.iter().map(|m| (m.id.as_str(), m)).collect();
    let asset_by_id: HashMap<&str, &Asset> = assets.iter().map(|a| (a.id.as_str(), a)).collect();
    let mut orders: Vec<Order> = Vec::new();
    for book in &books {
        for order in book.buy.iter().chain(book.sell.iter()) {
            orders.push(normalize_order(order.clone(), &market_by_id, &asset_by_id));
        }
    }

    Dataset {
        accounts,
        orders,
        markets,
        parties,
        network_limits: limits.map(|mut l| {
            l.propose_market_enabled_from = truncate_to_micros(l.propose_market_enabled_from);
            l.propose_asset_enabled_from = truncate_to_micros(l.propose_asset_enabled_from);
            l
        }),
        assets,
        current_time: app_state
            .map(|app| truncate_to_micros(app.block_time))
            .unwrap_or_default(),
        delegations,
        epoch: epoch.map(|mut e| {
            e.start_time = truncate_to_micros(e.start_time);
            e.expire_time = truncate_to_micros(e.expire_time);
            e
        }),
        nodes,
        network_parameters: parameters,
        proposals: proposals
            .into_iter()
            .map(|mut p| {
                p.timestamp = truncate_to_micros(p.timestamp);
                p
            })
            .collect(),
        deposits: deposits
            .into_iter()
            .map(|mut d| {
                d.created_at = truncate_to_micros(d.created_at);
                d.credited_at = truncate_to_micros(d.credited_at);
                d
            })
            .collect(),
        withdrawals: withdrawals.into_iter().map(normalize_withdrawal).collect(),
        transfers: transfers
            .into_iter()
            .map(|mut t| {
                t.timestamp = truncate_to_micros(t.timestamp);
                t
            })
            .collect(),
        // The two models' position abstractions are not reconcilable at
        // this layer; the collection stays empty on both sides.
        positions: Vec::new(),
        liquidity_provisions: provisions
            .into_iter()
            .map(|mut lp| {
                lp.created_at = truncate_to_micros(lp.created_at);
                lp.updated_at = truncate_to_micros(lp.updated_at);
                lp
            })
            .collect(),
        stake_links: stake_links
            .into_iter()
            .map(|mut s| {
                s.timestamp = truncate_to_micros(s.timestamp);
                s
            })
            .collect(),
    }
}

fn normalize_order(
    mut order: Order,
    markets: &HashMap<&str, &Market>,
    assets: &HashMap<&str, &Asset>,
) -> Order {
    order.created_at = truncate_to_micros(order.created_at);
    order.updated_at = truncate_to_micros(order.updated_at);

    let joined = markets
        .get(order.market.as_str())
        .and_then(|market| {
            assets
                .get(market.settlement_asset.as_str())
                .map(|asset| (*market, *asset))
        });
    match joined {
        Some((market, asset)) => {
            match scale_price(&order.price, asset.decimals, market.decimal_places) {
                Ok(price) => order.price = price,
                Err(err) => {
                    warn!(order = %order.id, error = %err, "leaving raw order price");
                }
            }
        }
        None => {
            warn!(
                order = %order.id,
                market = %order.market,
                "market or settlement asset unknown, leaving raw order price"
            );
        }
    }
    order
}

fn normalize_withdrawal(mut withdrawal: Withdrawal) -> Withdrawal {
    withdrawal.created_at = truncate_to_micros(withdrawal.created_at);
    withdrawal.withdrawn_at = truncate_to_micros(withdrawal.withdrawn_at);
    withdrawal.expiry = truncate_to_micros(withdrawal.expiry);
    // Bridge details only the snapshot knows; the read-model never serves
    // them, so they cannot take part in the comparison.
    withdrawal.foreign_tx_hash = String::new();
    withdrawal
}

// ── Tests ───────────────────────────────────────────────────────────
