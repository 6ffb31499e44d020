//! Listing queries: read-only lookups of property objects on the ledger.

use reqwest::Client;
use tracing::{debug, warn};

use crate::call::CallEncoder;
use crate::decode::decode_object;
use crate::errors::{ListingError, Result};
use crate::rpc;
use crate::types::{Address, ListingRecord, ObjectId};

/// Reads property objects from a fullnode.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    client: Client,
    rpc_url: String,
    struct_type: String,
    page_size: usize,
}

impl ListingQuery {
    pub fn new(
        client: Client,
        rpc_url: impl Into<String>,
        encoder: &CallEncoder,
        page_size: usize,
    ) -> Self {
        ListingQuery {
            client,
            rpc_url: rpc_url.into(),
            struct_type: encoder.property_struct_type(),
            page_size: page_size.max(1),
        }
    }

    /// Ids of every property object owned by `owner`.
    ///
    /// Follows the fullnode's pagination until the last page.
    pub async fn by_owner(&self, owner: &Address) -> Result<Vec<ObjectId>> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = rpc::get_owned_objects(
                &self.client,
                &self.rpc_url,
                owner,
                &self.struct_type,
                cursor.as_deref(),
                self.page_size,
            )
            .await?;

            let page_was_empty = page.data.is_empty();
            for entry in page.data {
                let Some(object) = entry.data else { continue };
                match object.object_id.parse() {
                    Ok(id) => ids.push(id),
                    Err(e) => warn!("Skipping owned object with bad id: {e}"),
                }
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => {
                    // A node that claims more pages must move forward.
                    if page_was_empty || cursor.as_deref() == Some(next.as_str()) {
                        return Err(ListingError::QueryFailed(format!(
                            "suix_getOwnedObjects did not advance past cursor {next}"
                        )));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!("{owner} owns {} properties", ids.len());
        Ok(ids)
    }

    /// The property stored under `id`, or `None` when no such object exists.
    pub async fn by_id(&self, id: &ObjectId) -> Result<Option<ListingRecord>> {
        let response = rpc::get_object(&self.client, &self.rpc_url, id).await?;
        Ok(decode_object(*id, Some(&response))?.into_option())
    }

    /// Whether the property can be rented. Unknown properties are unavailable.
    pub async fn is_available(&self, id: &ObjectId) -> Result<bool> {
        Ok(self
            .by_id(id)
            .await?
            .map(|record| record.is_available)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    fn offline_query() -> ListingQuery {
        let encoder = CallEncoder::new("0x1".parse().unwrap());
        ListingQuery::new(Client::new(), "http://127.0.0.1:1", &encoder, 50)
    }

    /// Serve canned JSON-RPC results on a local port and return its URL.
    async fn spawn_fullnode(answer: fn(&str, &Value) -> Value) -> String {
        let app = Router::new().route(
            "/",
            post(move |Json(req): Json<Value>| async move {
                let method = req["method"].as_str().unwrap_or_default().to_string();
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": answer(&method, &req["params"]),
                }))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn query_at(url: String, page_size: usize) -> ListingQuery {
        let encoder = CallEncoder::new("0x1".parse().unwrap());
        ListingQuery::new(Client::new(), url, &encoder, page_size)
    }

    #[tokio::test]
    async fn by_id_without_fields_is_none() {
        let url = spawn_fullnode(|_, _| json!({ "data": { "objectId": "0x9", "content": null } })).await;
        let id: ObjectId = "0x9".parse().unwrap();

        let query = query_at(url, 50);
        assert_eq!(query.by_id(&id).await.unwrap(), None);
        assert!(!query.is_available(&id).await.unwrap());
    }

    #[tokio::test]
    async fn by_id_decodes_property() {
        let url = spawn_fullnode(|_, params| {
            json!({
                "data": {
                    "objectId": params[0],
                    "content": {
                        "dataType": "moveObject",
                        "fields": {
                            "title": "Two bedroom, Kilimani",
                            "location": "Kilimani",
                            "price": "8500000",
                            "bedrooms": 2,
                            "bathrooms": 2,
                            "parking": 1,
                            "property_type": "apartment",
                            "description": "",
                            "landlord": "0xabc",
                            "is_available": true,
                            "created_at": "1704067200000"
                        }
                    }
                }
            })
        })
        .await;
        let id: ObjectId = "0x9".parse().unwrap();

        let query = query_at(url, 50);
        let record = query.by_id(&id).await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.listing.bedrooms, 2);
        assert!(query.is_available(&id).await.unwrap());
    }

    #[tokio::test]
    async fn by_owner_follows_pages() {
        let url = spawn_fullnode(|method, params| {
            assert_eq!(method, "suix_getOwnedObjects");
            if params[2].is_null() {
                json!({
                    "data": [{ "data": { "objectId": "0x1" } }, { "data": { "objectId": "0x2" } }],
                    "nextCursor": "0x2",
                    "hasNextPage": true
                })
            } else {
                json!({
                    "data": [{ "data": { "objectId": "0x3" } }, { "error": { "code": "deleted" } }],
                    "nextCursor": "0x3",
                    "hasNextPage": false
                })
            }
        })
        .await;
        let owner: Address = "0xabc".parse().unwrap();

        let ids = query_at(url, 2).by_owner(&owner).await.unwrap();
        let expected: Vec<ObjectId> = ["0x1", "0x2", "0x3"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn by_owner_fails_when_cursor_repeats() {
        let url = spawn_fullnode(|_, _| {
            json!({
                "data": [{ "data": { "objectId": "0x1" } }],
                "nextCursor": "0x1",
                "hasNextPage": true
            })
        })
        .await;
        let owner: Address = "0xabc".parse().unwrap();

        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            query_at(url, 1).by_owner(&owner),
        )
        .await
        .expect("by_owner must stop on a stuck cursor");
        assert!(matches!(outcome, Err(ListingError::QueryFailed(msg)) if msg.contains("0x1")));
    }

    #[tokio::test]
    async fn by_owner_fails_on_empty_page_with_more_pages() {
        let url = spawn_fullnode(|_, params| {
            let cursor = if params[2].is_null() { "c1" } else { "c2" };
            json!({ "data": [], "nextCursor": cursor, "hasNextPage": true })
        })
        .await;
        let owner: Address = "0xabc".parse().unwrap();

        assert!(matches!(
            query_at(url, 50).by_owner(&owner).await,
            Err(ListingError::QueryFailed(_))
        ));
    }

    #[tokio::test]
    async fn owner_without_listings_is_empty() {
        let url = spawn_fullnode(|_, _| json!({ "data": [], "nextCursor": null, "hasNextPage": false })).await;
        let owner: Address = "0xabc".parse().unwrap();
        assert!(query_at(url, 50).by_owner(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn by_owner_reports_transport_failure() {
        let owner: Address = "0xabc".parse().unwrap();
        assert!(matches!(
            offline_query().by_owner(&owner).await,
            Err(ListingError::QueryFailed(_))
        ));
    }

    #[tokio::test]
    async fn by_id_reports_transport_failure() {
        let id: ObjectId = "0x9".parse().unwrap();
        assert!(matches!(
            offline_query().by_id(&id).await,
            Err(ListingError::QueryFailed(_))
        ));
        assert!(offline_query().is_available(&id).await.is_err());
    }

    #[test]
    fn struct_type_comes_from_package() {
        let query = offline_query();
        assert!(query.struct_type.ends_with("::property::Property"));
        assert_eq!(query.page_size, 50);
    }
}
