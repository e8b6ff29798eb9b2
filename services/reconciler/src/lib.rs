//! Reconciliation engine
//!
//! Proves two independently produced representations of the same ledger
//! state agree: a point-in-time consensus snapshot read from a versioned,
//! merkleized key-value store, and the derived read-model served by the
//! datanode query API.
//!
//! # Architecture
//!
//! ```text
//!  store path ──► VersionedStore ──► extract ──► Dataset (core)
//!                                                   │
//!  datanode addr ──► collect (17 tasks) ──► Dataset (datanode)
//!                                                   │
//!                                          compare ─┴─► Report
//! ```
//!
//! The reader is fully sequential; the collector fans out one task per
//! domain behind a join barrier; the comparator is a pure function over
//! the two finished datasets. A full match is silent success; any
//! mismatch or fatal error surfaces as one aggregate error whose message
//! is the textual report.

pub mod collect;
pub mod datanode;
pub mod diff;
pub mod envelope;
pub mod extract;
pub mod normalize;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use types::prelude::*;

pub use crate::collect::collect;
pub use crate::datanode::{CollectError, DatanodeClient, HttpDatanodeClient};
pub use crate::diff::compare;
pub use crate::envelope::{DecodeError, Envelope, Payload};
pub use crate::extract::extract;
pub use crate::store::{StoreError, StoreWriter, VersionedStore};

/// Inputs for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory of the versioned store.
    pub store_path: PathBuf,
    /// Target block height; 0 selects the most recent version available.
    pub block_height: u64,
    /// Address of the datanode query service.
    pub datanode_addr: String,
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("payload decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("datanode client: {0}")]
    Client(CollectError),

    #[error("collection failed: {source}\n{report}")]
    Collection {
        source: CollectError,
        report: String,
    },

    #[error("state mismatch:\n{0}")]
    Mismatch(String),
}

/// Run a full audit: read the snapshot, collect the read-model, compare.
///
/// Fatal reader errors abort before any collection is attempted. A
/// collector error is deferred past the join barrier and carries the
/// best-effort report for the domains that did collect.
pub async fn run_audit(config: &AuditConfig) -> Result<Report, AuditError> {
    let store = VersionedStore::open(&config.store_path)?;
    let version = store.load_version(config.block_height)?;
    info!(
        version = version.version(),
        height = version.height(),
        "loaded snapshot version"
    );

    let core = extract(version.decode_payloads()?);
    let client = HttpDatanodeClient::new(&config.datanode_addr).map_err(AuditError::Client)?;
    audit_datasets(core, Arc::new(client)).await
}

/// Collect the read-model and compare it against an already-built core
/// dataset. Split out so tests can drive the engine with a fake client.
pub async fn audit_datasets(
    core: Dataset,
    client: Arc<dyn DatanodeClient>,
) -> Result<Report, AuditError> {
    let (datanode, collect_error) = collect(client).await;
    let report = compare(&core, &datanode);

    if let Some(source) = collect_error {
        return Err(AuditError::Collection {
            source,
            report: report.render_failures(),
        });
    }
    if !report.success() {
        return Err(AuditError::Mismatch(report.render_failures()));
    }

    info!(domains = report.statuses().len(), "all domains fully match");
    Ok(report)
}
