/// Shared utilities and types used across all layers
///
/// This module contains:
/// - Wire protocol definitions (bid requests, responses, live events)
/// - Error taxonomy
/// - Prometheus metrics registry
/// - Timestamp helpers

pub mod error;
pub mod metrics;
pub mod protocol;
pub mod timestamp;

// Re-export commonly used types
pub use error::{BidError, StorageError};
pub use protocol::{BidUpdate, ClientMessage, PlaceBidRequest, PlaceBidResponse, ServerMessage};
pub use timestamp::now_millis;
