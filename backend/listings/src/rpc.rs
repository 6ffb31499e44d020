//! Fullnode JSON-RPC client: `sui_getObject` and `suix_getOwnedObjects`.
//!
//! Every failure (connection, HTTP status, JSON-RPC error object, malformed
//! envelope) is reported once as [`ListingError::QueryFailed`]. Retrying is
//! left to the caller.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{ListingError, Result};
use crate::types::{Address, ObjectId};

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// One page of `suix_getOwnedObjects`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedObjectsPage {
    pub data: Vec<OwnedObject>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct OwnedObject {
    pub data: Option<ObjectRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: String,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Send one JSON-RPC request and return its `result`.
///
/// A missing `result` comes back as `Value::Null`.
pub async fn call(client: &Client, rpc_url: &str, method: &str, params: Value) -> Result<Value> {
    let response = client
        .post(rpc_url)
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ListingError::QueryFailed(format!(
            "{method} returned HTTP {status}"
        )));
    }

    let body: RpcResponse = response.json().await?;
    if let Some(err) = body.error {
        return Err(ListingError::QueryFailed(format!(
            "{method} RPC error {}: {}",
            err.code, err.message
        )));
    }

    debug!("{method} answered");
    Ok(body.result.unwrap_or(Value::Null))
}

/// Fetch an object with its Move content.
pub async fn get_object(client: &Client, rpc_url: &str, id: &ObjectId) -> Result<Value> {
    call(client, rpc_url, "sui_getObject", object_params(id)).await
}

/// Fetch one page of objects of `struct_type` owned by `owner`.
pub async fn get_owned_objects(
    client: &Client,
    rpc_url: &str,
    owner: &Address,
    struct_type: &str,
    cursor: Option<&str>,
    limit: usize,
) -> Result<OwnedObjectsPage> {
    let result = call(
        client,
        rpc_url,
        "suix_getOwnedObjects",
        owned_params(owner, struct_type, cursor, limit),
    )
    .await?;

    serde_json::from_value(result).map_err(|e| {
        ListingError::QueryFailed(format!("Unexpected suix_getOwnedObjects result: {e}"))
    })
}

fn object_params(id: &ObjectId) -> Value {
    json!([
        id.to_string(),
        { "showContent": true, "showOwner": true }
    ])
}

fn owned_params(owner: &Address, struct_type: &str, cursor: Option<&str>, limit: usize) -> Value {
    json!([
        owner.to_string(),
        {
            "filter": { "StructType": struct_type },
            "options": { "showContent": false }
        },
        cursor,
        limit
    ])
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
