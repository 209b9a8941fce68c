/// Live Update Fan-out
///
/// In-memory publish/subscribe keyed by listing id. Best-effort delivery:
/// no persistence, no redelivery after disconnect.

pub mod hub;

pub use hub::{BidHub, Subscription};
