//! Read-model query client
//!
//! [`DatanodeClient`] is the seam between the collector and the wire:
//! implementors return flat record lists per domain. The production
//! implementation speaks the connection-style paginated JSON API
//! (`edges[].node` plus `pageInfo`), flattening every page behind one
//! call. Fakes implement the trait directly in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use types::prelude::*;

/// Records requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("query {path} returned HTTP status {status}")]
    Status { path: String, status: u16 },

    #[error("decoding {path} response: {detail}")]
    Decode { path: String, detail: String },

    #[error("{domain} query failed: {detail}")]
    Query { domain: String, detail: String },

    #[error("collection task aborted: {0}")]
    Task(String),
}

// ── Client trait ────────────────────────────────────────────────────

/// One method per domain query against the read-model service.
#[async_trait]
pub trait DatanodeClient: Send + Sync {
    async fn accounts(&self) -> Result<Vec<Account>, CollectError>;
    async fn orders(&self) -> Result<Vec<Order>, CollectError>;
    async fn markets(&self) -> Result<Vec<Market>, CollectError>;
    async fn parties(&self) -> Result<Vec<Party>, CollectError>;
    async fn network_limits(&self) -> Result<Option<NetworkLimits>, CollectError>;
    async fn assets(&self) -> Result<Vec<Asset>, CollectError>;
    async fn current_time(&self) -> Result<i64, CollectError>;
    async fn delegations(&self) -> Result<Vec<Delegation>, CollectError>;
    async fn epoch(&self) -> Result<Option<Epoch>, CollectError>;
    async fn nodes(&self) -> Result<Vec<ValidatorNode>, CollectError>;
    async fn network_parameters(&self) -> Result<Vec<NetworkParameter>, CollectError>;
    async fn proposals(&self) -> Result<Vec<Proposal>, CollectError>;
    async fn deposits(&self) -> Result<Vec<Deposit>, CollectError>;
    async fn withdrawals(&self) -> Result<Vec<Withdrawal>, CollectError>;
    async fn transfers(&self) -> Result<Vec<Transfer>, CollectError>;
    async fn liquidity_provisions(
        &self,
        market: &str,
    ) -> Result<Vec<LiquidityProvision>, CollectError>;
    async fn stake_links(&self, party: &str) -> Result<Vec<StakeLink>, CollectError>;
}

// ── Wire envelopes ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: String,
}

#[derive(Debug, Deserialize)]
struct TimeResponse {
    timestamp: i64,
}

// ── HTTP implementation ─────────────────────────────────────────────

/// reqwest-backed client for a running read-model service.
pub struct HttpDatanodeClient {
    base: String,
    http: reqwest::Client,
    page_size: usize,
}

impl HttpDatanodeClient {
    /// Build a client for the given service address. Only connection-level
    /// defaults apply; no additional per-call timeouts are layered on.
    pub fn new(addr: &str) -> Result<Self, CollectError> {
        let base = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{addr}")
        };
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base,
            http,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CollectError> {
        let url = format!("{}{}", self.base, path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CollectError::Decode {
            path: path.to_string(),
            detail: e.to_string(),
        })
    }

    /// Flatten cursor pagination into one record list.
    async fn paged<T: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &[(&str, String)],
    ) -> Result<Vec<T>, CollectError> {
        let mut records = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut query: Vec<(&str, String)> = base_query.to_vec();
            query.push(("first", self.page_size.to_string()));
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let page: Connection<T> = self.get_json(path, &query).await?;
            let has_next = page.page_info.has_next_page;
            let cursor = page.page_info.end_cursor;
            records.extend(page.edges.into_iter().map(|edge| edge.node));
            debug!(path, fetched = records.len(), has_next, "fetched page");

            if !has_next {
                break;
            }
            after = Some(cursor);
        }
        Ok(records)
    }
}

#[async_trait]
impl DatanodeClient for HttpDatanodeClient {
    async fn accounts(&self) -> Result<Vec<Account>, CollectError> {
        self.paged("/api/v2/accounts", &[]).await
    }

    async fn orders(&self) -> Result<Vec<Order>, CollectError> {
        self.paged("/api/v2/orders", &[]).await
    }

    async fn markets(&self) -> Result<Vec<Market>, CollectError> {
        self.paged("/api/v2/markets", &[]).await
    }

    async fn parties(&self) -> Result<Vec<Party>, CollectError> {
        self.paged("/api/v2/parties", &[]).await
    }

    async fn network_limits(&self) -> Result<Option<NetworkLimits>, CollectError> {
        self.get_json("/api/v2/network/limits", &[]).await
    }

    async fn assets(&self) -> Result<Vec<Asset>, CollectError> {
        self.paged("/api/v2/assets", &[]).await
    }

    async fn current_time(&self) -> Result<i64, CollectError> {
        let time: TimeResponse = self.get_json("/api/v2/time", &[]).await?;
        Ok(time.timestamp)
    }

    async fn delegations(&self) -> Result<Vec<Delegation>, CollectError> {
        self.paged("/api/v2/delegations", &[]).await
    }

    async fn epoch(&self) -> Result<Option<Epoch>, CollectError> {
        self.get_json("/api/v2/epoch", &[]).await
    }

    async fn nodes(&self) -> Result<Vec<ValidatorNode>, CollectError> {
        self.paged("/api/v2/nodes", &[]).await
    }

    async fn network_parameters(&self) -> Result<Vec<NetworkParameter>, CollectError> {
        self.paged("/api/v2/network/parameters", &[]).await
    }

    async fn proposals(&self) -> Result<Vec<Proposal>, CollectError> {
        self.paged("/api/v2/proposals", &[]).await
    }

    async fn deposits(&self) -> Result<Vec<Deposit>, CollectError> {
        self.paged("/api/v2/deposits", &[]).await
    }

    async fn withdrawals(&self) -> Result<Vec<Withdrawal>, CollectError> {
        self.paged("/api/v2/withdrawals", &[]).await
    }

    async fn transfers(&self) -> Result<Vec<Transfer>, CollectError> {
        self.paged("/api/v2/transfers", &[]).await
    }

    async fn liquidity_provisions(
        &self,
        market: &str,
    ) -> Result<Vec<LiquidityProvision>, CollectError> {
        self.paged(
            "/api/v2/liquidity/provisions",
            &[("marketId", market.to_string())],
        )
        .await
    }

    async fn stake_links(&self, party: &str) -> Result<Vec<StakeLink>, CollectError> {
        self.paged("/api/v2/stake/links", &[("partyId", party.to_string())])
            .await
    }
}
