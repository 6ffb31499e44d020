//! Axum REST API handlers.
//!
//! Reads are answered from the ledger. Writes are never signed here: the
//! `/calls/*` routes return the unsigned call for the browser wallet to
//! execute.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::ListingError;
use crate::service::PropertyService;
use crate::types::{Address, ListingRecord, ListingRequest, ObjectId};

#[derive(Clone)]
pub struct ApiState {
    pub service: PropertyService,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub package_id: String,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub id: ObjectId,
    pub is_available: bool,
}

#[derive(Serialize)]
pub struct OwnerPropertiesResponse {
    pub owner: Address,
    pub count: usize,
    pub property_ids: Vec<ObjectId>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct AvailabilityCallRequest {
    pub property_id: String,
    pub is_available: bool,
}

#[derive(Deserialize)]
pub struct RentCallRequest {
    pub property_id: String,
    pub tenant: String,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/properties/:id", get(get_property))
        .route("/properties/:id/availability", get(get_availability))
        .route("/owners/:address/properties", get(get_owner_properties))
        .route("/calls/create", post(build_create_call))
        .route("/calls/availability", post(build_availability_call))
        .route("/calls/rent", post(build_rent_call))
        .with_state(state)
}

fn error_response(err: ListingError) -> Response {
    let status = match &err {
        ListingError::Validation(_) => StatusCode::BAD_REQUEST,
        ListingError::DecodeFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ListingError::QueryFailed(_) | ListingError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
        ListingError::NoSignerConnected => StatusCode::UNAUTHORIZED,
        ListingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Unwrap a JSON body, answering malformed ones like any other validation error.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error_response(ListingError::Validation(rejection.body_text())))
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        package_id: state.service.encoder().package_id().to_string(),
    })
}

/// `GET /properties/:id`
pub async fn get_property(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    let id: ObjectId = match id.parse() {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state.service.property(&id).await {
        Ok(Some(record)) => (StatusCode::OK, Json::<ListingRecord>(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Property {id} not found"),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /properties/:id/availability`
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    let id: ObjectId = match id.parse() {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state.service.is_available(&id).await {
        Ok(is_available) => Json(AvailabilityResponse { id, is_available }).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /owners/:address/properties`
pub async fn get_owner_properties(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    let owner: Address = match address.parse() {
        Ok(owner) => owner,
        Err(e) => return error_response(e),
    };

    match state.service.properties_by_owner(&owner).await {
        Ok(property_ids) => Json(OwnerPropertiesResponse {
            owner,
            count: property_ids.len(),
            property_ids,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /calls/create`
///
/// Validates the listing and returns the unsigned `create_property` call.
pub async fn build_create_call(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ListingRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.service.encoder().create_property(&request) {
        Ok(call) => Json(call).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /calls/availability`
pub async fn build_availability_call(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AvailabilityCallRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };

    match body.property_id.parse() {
        Ok(id) => Json(
            state
                .service
                .encoder()
                .update_availability(id, body.is_available),
        )
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /calls/rent`
pub async fn build_rent_call(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<RentCallRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };

    let parsed = body
        .property_id
        .parse::<ObjectId>()
        .and_then(|id| Ok((id, body.tenant.parse::<Address>()?)));

    match parsed {
        Ok((id, tenant)) => Json(state.service.encoder().rent_property(id, tenant)).into_response(),
        Err(e) => error_response(e),
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
