//! Property service: the single entry point UI code talks to.
//!
//! Writes go validate → encode → submit through the session; reads go to
//! [`ListingQuery`]. The service keeps no state of its own beyond the
//! startup configuration it was built with.

use reqwest::Client;
use tracing::info;

use crate::call::{CallEncoder, MoveCall};
use crate::config::Config;
use crate::errors::Result;
use crate::query::ListingQuery;
use crate::session::Session;
use crate::types::{Address, ListingRecord, ListingRequest, ObjectId, SubmissionResult};

#[derive(Clone)]
pub struct PropertyService {
    encoder: CallEncoder,
    session: Session,
    query: ListingQuery,
}

impl PropertyService {
    pub fn new(encoder: CallEncoder, session: Session, query: ListingQuery) -> Self {
        PropertyService {
            encoder,
            session,
            query,
        }
    }

    /// Wire the service to the configured package and network.
    pub fn from_config(config: &Config, client: Client, session: Session) -> Self {
        let encoder = CallEncoder::new(config.package_id);
        let query = ListingQuery::new(
            client,
            config.rpc_url(),
            &encoder,
            config.owned_objects_page_size,
        );
        Self::new(encoder, session, query)
    }

    pub fn encoder(&self) -> &CallEncoder {
        &self.encoder
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    // ─── Writes ───────────────────────────────────────────

    /// List a new property. The ledger assigns its object id.
    pub async fn create_property(&self, request: &ListingRequest) -> Result<SubmissionResult> {
        let call = self.encoder.create_property(request)?;
        self.submit(call).await
    }

    pub async fn update_availability(
        &self,
        property: ObjectId,
        is_available: bool,
    ) -> Result<SubmissionResult> {
        self.submit(self.encoder.update_availability(property, is_available))
            .await
    }

    pub async fn rent_property(&self, property: ObjectId, tenant: Address) -> Result<SubmissionResult> {
        self.submit(self.encoder.rent_property(property, tenant)).await
    }

    async fn submit(&self, call: MoveCall) -> Result<SubmissionResult> {
        let result = self.session.submit(&call).await?;
        info!(
            "{} submitted (tx {}...)",
            call.target.function.as_str(),
            result.short()
        );
        Ok(result)
    }

    // ─── Reads ────────────────────────────────────────────

    pub async fn property(&self, id: &ObjectId) -> Result<Option<ListingRecord>> {
        self.query.by_id(id).await
    }

    pub async fn properties_by_owner(&self, owner: &Address) -> Result<Vec<ObjectId>> {
        self.query.by_owner(owner).await
    }

    pub async fn is_available(&self, id: &ObjectId) -> Result<bool> {
        self.query.is_available(id).await
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
