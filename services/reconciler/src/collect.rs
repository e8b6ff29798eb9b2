//! Read-model collection fan-out
//!
//! One task per domain, all sharing one client. Tasks own disjoint fields
//! of the resulting dataset (assembled after the join), so the dataset
//! itself needs no locking. Every task runs to completion regardless of
//! its siblings; the first error observed is retained in a shared slot and
//! returned once the join barrier has drained every task, so one failing
//! sub-query does not hide diagnostics for the other domains.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use types::prelude::*;

use crate::datanode::{CollectError, DatanodeClient};

type ErrSlot = Arc<OnceLock<CollectError>>;

fn spawn_domain<T, F, Fut>(
    domain: &'static str,
    client: Arc<dyn DatanodeClient>,
    slot: ErrSlot,
    query: F,
) -> JoinHandle<Option<T>>
where
    T: Send + 'static,
    F: FnOnce(Arc<dyn DatanodeClient>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, CollectError>> + Send + 'static,
{
    tokio::spawn(async move {
        match query(client).await {
            Ok(value) => {
                debug!(domain, "collected");
                Some(value)
            }
            Err(err) => {
                warn!(domain, error = %err, "collection task failed");
                let _ = slot.set(err);
                None
            }
        }
    })
}

fn settle<T>(joined: Result<Option<T>, JoinError>, slot: &ErrSlot) -> Option<T> {
    match joined {
        Ok(value) => value,
        Err(err) => {
            let _ = slot.set(CollectError::Task(err.to_string()));
            None
        }
    }
}

/// Collect the read-model's view of the ledger state.
///
/// Returns the dataset together with the first error any domain task
/// observed; a non-nil error still leaves every sibling domain's data in
/// the dataset (the failed domain contributes an empty collection).
pub async fn collect(client: Arc<dyn DatanodeClient>) -> (Dataset, Option<CollectError>) {
    let slot: ErrSlot = Arc::new(OnceLock::new());

    let accounts = spawn_domain(
        "accounts",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.accounts().await },
    );
    let orders = spawn_domain(
        "orders",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move {
            // Parked orders live off-book; the snapshot side never sees them.
            let mut orders = c.orders().await?;
            orders.retain(|o| o.status != OrderStatus::Parked);
            Ok(orders)
        },
    );
    let markets = spawn_domain(
        "markets",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.markets().await },
    );
    let parties = spawn_domain(
        "parties",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.parties().await },
    );
    let limits = spawn_domain(
        "network limits",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.network_limits().await },
    );
    let assets = spawn_domain(
        "assets",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move {
            let mut assets = c.assets().await?;
            assets.retain(|a| a.status != AssetStatus::Rejected);
            Ok(assets)
        },
    );
    let time = spawn_domain(
        "current time",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.current_time().await },
    );
    let delegations = spawn_domain(
        "delegations",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.delegations().await },
    );
    let epoch = spawn_domain(
        "epoch",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.epoch().await },
    );
    let nodes = spawn_domain(
        "nodes",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.nodes().await },
    );
    let parameters = spawn_domain(
        "network parameters",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.network_parameters().await },
    );
    let proposals = spawn_domain(
        "proposals",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move {
            let mut proposals = c.proposals().await?;
            proposals.retain(|p| !p.state.is_discarded());
            Ok(proposals)
        },
    );
    let deposits = spawn_domain(
        "deposits",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.deposits().await },
    );
    let withdrawals = spawn_domain(
        "withdrawals",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.withdrawals().await },
    );
    let transfers = spawn_domain(
        "transfers",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move { c.transfers().await },
    );
    let provisions = spawn_domain(
        "liquidity provisions",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move {
            // Second fan-out keyed by market, bounded by the keys this task
            // fetched itself, run sequentially.
            let markets = c.markets().await?;
            let mut provisions = Vec::new();
            for market in &markets {
                let mut page = c.liquidity_provisions(&market.id).await?;
                page.retain(|p| p.status.is_live());
                provisions.extend(page);
            }
            Ok(provisions)
        },
    );
    let stake_links = spawn_domain(
        "stake links",
        Arc::clone(&client),
        Arc::clone(&slot),
        |c| async move {
            let parties = c.parties().await?;
            let mut links = Vec::new();
            for party in &parties {
                links.extend(c.stake_links(&party.id).await?);
            }
            Ok(links)
        },
    );

    // Join barrier: exactly one result consumed per task, no short-circuit.
    let (
        accounts,
        orders,
        markets,
        parties,
        limits,
        assets,
        time,
        delegations,
        epoch,
        nodes,
        parameters,
        proposals,
        deposits,
        withdrawals,
        transfers,
        provisions,
        stake_links,
    ) = tokio::join!(
        accounts,
        orders,
        markets,
        parties,
        limits,
        assets,
        time,
        delegations,
        epoch,
        nodes,
        parameters,
        proposals,
        deposits,
        withdrawals,
        transfers,
        provisions,
        stake_links,
    );

    let dataset = Dataset {
        accounts: settle(accounts, &slot).unwrap_or_default(),
        orders: settle(orders, &slot).unwrap_or_default(),
        markets: settle(markets, &slot).unwrap_or_default(),
        parties: settle(parties, &slot).unwrap_or_default(),
        network_limits: settle(limits, &slot).flatten(),
        assets: settle(assets, &slot).unwrap_or_default(),
        current_time: settle(time, &slot).unwrap_or_default(),
        delegations: settle(delegations, &slot).unwrap_or_default(),
        epoch: settle(epoch, &slot).flatten(),
        nodes: settle(nodes, &slot).unwrap_or_default(),
        network_parameters: settle(parameters, &slot).unwrap_or_default(),
        proposals: settle(proposals, &slot).unwrap_or_default(),
        deposits: settle(deposits, &slot).unwrap_or_default(),
        withdrawals: settle(withdrawals, &slot).unwrap_or_default(),
        transfers: settle(transfers, &slot).unwrap_or_default(),
        // Not reconcilable at this layer; stays empty on both sides.
        positions: Vec::new(),
        liquidity_provisions: settle(provisions, &slot).unwrap_or_default(),
        stake_links: settle(stake_links, &slot).unwrap_or_default(),
    };

    // Every task clone is dropped once the barrier has drained.
    let error = match Arc::try_unwrap(slot) {
        Ok(lock) => lock.into_inner(),
        Err(shared) => shared.get().map(|e| CollectError::Task(e.to_string())),
    };
    (dataset, error)
}

// ── Tests ───────────────────────────────────────────────────────────
