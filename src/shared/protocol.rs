/// Wire Protocol - Bid Submission and Live Update Messages
///
/// JSON shapes exchanged with clients. Field names are camelCase on the
/// wire; the realtime channel tags client frames with `op` and server
/// frames with `event`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bid submission request body (`POST /api/bids`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub listing_id: u64,
    pub amount: Decimal,
}

/// Bid submission response body
///
/// On rejection, `currentHighBid` and `nextValidBids` give the caller
/// enough to re-offer a corrected amount without re-fetching the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_high_bid: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bids: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_valid_bids: Option<[Decimal; 2]>,
}

/// Live event pushed to every subscriber of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidUpdate {
    pub listing_id: u64,
    /// Amount of the accepted bid.
    pub amount: Decimal,
    /// New current high bid (equals `amount` for an accepted bid).
    pub current_bid: Decimal,
    pub total_bids: u64,
    /// Display name with the middle redacted, e.g. "Ra**sh".
    pub masked_bidder_name: String,
    /// Unix epoch milliseconds.
    pub bid_time: u64,
}

/// Frames a viewer sends on the realtime channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Subscribe { listing_id: u64 },
    #[serde(rename_all = "camelCase")]
    Unsubscribe { listing_id: u64 },
}

/// Frames the server pushes on the realtime channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerMessage {
    BidUpdate(BidUpdate),
    #[serde(rename_all = "camelCase")]
    Subscribed { listing_id: u64 },
    #[serde(rename_all = "camelCase")]
    Unsubscribed { listing_id: u64 },
    Error { message: String },
}
