/// Storage Seams - Listing Store and Bid Ledger
///
/// Trait abstractions over the durable collaborators. The commit
/// coordinator is generic over these traits; the in-memory
/// implementations back the standalone server and the test suite.
///
/// ## Write policy
/// Only the bid commit coordinator appends to the ledger. Every other
/// collaborator (HTTP reads, dashboards) is a reader.
///
/// Calls are synchronous: the coordinator invokes them inside its
/// per-listing critical section, which must contain no await points.

pub mod memory;

use crate::domain::{Bid, Listing};
use crate::shared::error::StorageError;
use rust_decimal::Decimal;

/// Read-only access to vehicle listings.
pub trait ListingStore: Send + Sync {
    /// Fetches a listing by id; `Ok(None)` when the id is unknown.
    fn get_listing(&self, listing_id: u64) -> Result<Option<Listing>, StorageError>;
}

/// Append-only record of every accepted bid.
pub trait BidLedger: Send + Sync {
    /// Appends an accepted bid and returns its ledger id.
    fn append_bid(
        &self,
        listing_id: u64,
        bidder_id: u64,
        amount: Decimal,
        timestamp: u64,
    ) -> Result<u64, StorageError>;

    /// Highest accepted amount for a listing; `Ok(None)` when no bids exist.
    fn current_high_bid(&self, listing_id: u64) -> Result<Option<Decimal>, StorageError>;

    /// Number of accepted bids for a listing.
    fn count_bids(&self, listing_id: u64) -> Result<u64, StorageError>;

    /// Full bid history for a listing, descending by amount.
    fn list_bids(&self, listing_id: u64) -> Result<Vec<Bid>, StorageError>;
}

// Re-export the reference implementations
pub use memory::{InMemoryBidLedger, InMemoryListingStore};
