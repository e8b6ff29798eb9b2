//! HTTP client against a served fake read-model API: cursor pagination
//! flattening, singleton/scalar endpoints and HTTP error mapping.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use reconciler::{CollectError, DatanodeClient, HttpDatanodeClient};
use types::prelude::*;

fn sample_accounts() -> Vec<Value> {
    ["alice", "bob", "carol"]
        .iter()
        .map(|owner| {
            serde_json::to_value(Account {
                owner: owner.to_string(),
                market: "mkt-1".into(),
                asset: "usd".into(),
                kind: AccountKind::General,
                balance: "100".into(),
            })
            .unwrap()
        })
        .collect()
}

fn sample_links() -> Vec<StakeLink> {
    vec![
        StakeLink {
            id: "sl1".into(),
            party: "alice".into(),
            kind: StakeLinkKind::Link,
            amount: "5".into(),
            timestamp: 0,
            status: StakeLinkStatus::Accepted,
        },
        StakeLink {
            id: "sl2".into(),
            party: "bob".into(),
            kind: StakeLinkKind::Unlink,
            amount: "2".into(),
            timestamp: 0,
            status: StakeLinkStatus::Accepted,
        },
    ]
}

/// Connection-style page over a canned record list. The cursor is the
/// index of the last record served.
fn page(records: &[Value], params: &HashMap<String, String>) -> Value {
    let first: usize = params
        .get("first")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);
    let start: usize = params
        .get("after")
        .and_then(|v| v.parse::<usize>().ok())
        .map(|i| i + 1)
        .unwrap_or(0);

    let slice: Vec<Value> = records.iter().skip(start).take(first).cloned().collect();
    let end = start + slice.len();
    let edges: Vec<Value> = slice
        .iter()
        .enumerate()
        .map(|(i, node)| json!({"node": node, "cursor": (start + i).to_string()}))
        .collect();

    json!({
        "edges": edges,
        "pageInfo": {
            "hasNextPage": end < records.len(),
            "endCursor": if end == 0 { String::new() } else { (end - 1).to_string() },
        }
    })
}

async fn serve_fake() -> String {
    let app = Router::new()
        .route(
            "/api/v2/accounts",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(page(&sample_accounts(), &params))
            }),
        )
        .route(
            "/api/v2/stake/links",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let party = params.get("partyId").cloned().unwrap_or_default();
                let records: Vec<Value> = sample_links()
                    .into_iter()
                    .filter(|link| link.party == party)
                    .map(|link| serde_json::to_value(link).unwrap())
                    .collect();
                Json(page(&records, &params))
            }),
        )
        .route("/api/v2/epoch", get(|| async { Json(Value::Null) }))
        .route(
            "/api/v2/time",
            get(|| async { Json(json!({"timestamp": 1_700_000_000_000_001_000i64})) }),
        )
        .route(
            "/api/v2/markets",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

#[tokio::test]
async fn paged_results_are_flattened() {
    let addr = serve_fake().await;
    let client = HttpDatanodeClient::new(&addr).unwrap().with_page_size(2);

    let accounts = client.accounts().await.unwrap();
    assert_eq!(accounts.len(), 3, "two pages flattened into one list");
    assert_eq!(accounts[0].owner, "alice");
    assert_eq!(accounts[2].owner, "carol");
}

#[tokio::test]
async fn keyed_fanout_query_passes_parameter() {
    let addr = serve_fake().await;
    let client = HttpDatanodeClient::new(&addr).unwrap();

    let links = client.stake_links("bob").await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, "sl2");

    let none = client.stake_links("nobody").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn null_singleton_maps_to_none() {
    let addr = serve_fake().await;
    let client = HttpDatanodeClient::new(&addr).unwrap();

    assert!(client.epoch().await.unwrap().is_none());
}

#[tokio::test]
async fn scalar_time_endpoint() {
    let addr = serve_fake().await;
    let client = HttpDatanodeClient::new(&addr).unwrap();

    assert_eq!(
        client.current_time().await.unwrap(),
        1_700_000_000_000_001_000
    );
}

#[tokio::test]
async fn http_failure_maps_to_status_error() {
    let addr = serve_fake().await;
    let client = HttpDatanodeClient::new(&addr).unwrap();

    match client.markets().await {
        Err(CollectError::Status { path, status }) => {
            assert_eq!(path, "/api/v2/markets");
            assert_eq!(status, 500);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
