/// HTTP Interface
///
/// axum surface of the bidding engine:
/// - `POST /api/bids` - bid submission
/// - `GET /api/auctions/:id` - listing detail with derived bid state
/// - `GET /api/auctions/:id/bids` - bid history
/// - `GET /ws` - realtime bid updates
/// - `GET /health`, `GET /metrics` - observability
///
/// Authentication lives in an upstream gateway; it forwards the verified
/// identity as `x-user-id`, `x-user-name` and `x-user-role` headers. The
/// engine enforces the bidder-role requirement but never verifies
/// credentials itself.

pub mod ws;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::application::services::ListingOverview;
use crate::application::BiddingService;
use crate::domain::bid::{BidderIdentity, UserRole};
use crate::infrastructure::realtime::BidHub;
use crate::infrastructure::storage::{InMemoryBidLedger, InMemoryListingStore};
use crate::shared::error::BidError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{PlaceBidRequest, PlaceBidResponse};

/// Concrete service wiring used by the standalone server.
pub type AppService = BiddingService<InMemoryListingStore, InMemoryBidLedger>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppService>,
    pub hub: Arc<BidHub>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/bids", post(place_bid))
        .route("/api/auctions/:listing_id", get(get_auction))
        .route("/api/auctions/:listing_id/bids", get(get_auction_bids))
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Rejection for missing or malformed gateway identity headers.
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BidderIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
        };

        let id = header("x-user-id")
            .and_then(|value| value.parse::<u64>().ok())
            .ok_or(IdentityRejection)?;
        let display_name = header("x-user-name").ok_or(IdentityRejection)?.to_string();
        let role = header("x-user-role")
            .and_then(|value| value.parse::<UserRole>().ok())
            .ok_or(IdentityRejection)?;

        Ok(BidderIdentity {
            id,
            display_name,
            role,
        })
    }
}

async fn place_bid(
    State(state): State<AppState>,
    bidder: BidderIdentity,
    Json(request): Json<PlaceBidRequest>,
) -> Response {
    match state
        .service
        .submit_bid(&bidder, request.listing_id, request.amount)
        .await
    {
        Ok(accepted) => (
            StatusCode::CREATED,
            Json(PlaceBidResponse {
                accepted: true,
                amount: Some(accepted.amount),
                current_high_bid: Some(accepted.new_high_bid),
                total_bids: Some(accepted.total_bids),
                reason: None,
                next_valid_bids: None,
            }),
        )
            .into_response(),
        Err(rejection) => rejection_response(rejection),
    }
}

/// Maps a rejection onto its HTTP status and retry context.
fn rejection_response(rejection: BidError) -> Response {
    let status = match &rejection {
        BidError::InvalidAmount
        | BidError::BidTooLow { .. }
        | BidError::InvalidIncrement { .. }
        | BidError::ListingNotBiddable => StatusCode::BAD_REQUEST,
        BidError::ListingNotFound => StatusCode::NOT_FOUND,
        BidError::Forbidden => StatusCode::FORBIDDEN,
        BidError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let next_valid_bids = match &rejection {
        BidError::InvalidIncrement { next_valid, .. } => Some(*next_valid),
        _ => None,
    };

    let body = PlaceBidResponse {
        accepted: false,
        amount: None,
        current_high_bid: rejection.current_high_bid(),
        total_bids: None,
        reason: Some(rejection.to_string()),
        next_valid_bids,
    };

    (status, Json(body)).into_response()
}

async fn get_auction(State(state): State<AppState>, Path(listing_id): Path<u64>) -> Response {
    match state.service.listing_overview(listing_id) {
        Ok(Some(overview)) => (StatusCode::OK, Json(auction_json(&overview))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "auction not found" })),
        )
            .into_response(),
        Err(error) => rejection_response(error),
    }
}

async fn get_auction_bids(State(state): State<AppState>, Path(listing_id): Path<u64>) -> Response {
    match state.service.listing_overview(listing_id) {
        Ok(Some(overview)) => (
            StatusCode::OK,
            Json(json!({ "bids": overview.bids, "total": overview.total_bids })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "auction not found" })),
        )
            .into_response(),
        Err(error) => rejection_response(error),
    }
}

fn auction_json(overview: &ListingOverview) -> serde_json::Value {
    json!({
        "listing": overview.listing,
        "currentBid": overview.current_bid,
        "totalBids": overview.total_bids,
        "bids": overview.bids,
    })
}

async fn health() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

async fn metrics() -> Response {
    (StatusCode::OK, METRICS.export()).into_response()
}
