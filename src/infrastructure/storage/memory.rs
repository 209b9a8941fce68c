/// In-memory Listing Store and Bid Ledger
///
/// Reference implementations backing the standalone server and the test
/// suite. The locks here only guard map integrity; read-validate-append
/// atomicity comes from the coordinator's per-listing section.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use super::{BidLedger, ListingStore};
use crate::domain::{Bid, Listing, ListingStatus};
use crate::shared::error::StorageError;

/// Listing records keyed by id.
#[derive(Default)]
pub struct InMemoryListingStore {
    listings: RwLock<HashMap<u64, Listing>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a listing.
    ///
    /// Listing creation belongs to the external listing-management
    /// collaborator; this is exposed for bootstrap and tests.
    pub fn upsert(&self, listing: Listing) {
        self.listings.write().insert(listing.id, listing);
    }

    /// Applies an admin lifecycle transition. Returns false for unknown ids.
    pub fn set_status(&self, listing_id: u64, status: ListingStatus) -> bool {
        match self.listings.write().get_mut(&listing_id) {
            Some(listing) => {
                listing.status = status;
                true
            }
            None => false,
        }
    }
}

impl ListingStore for InMemoryListingStore {
    fn get_listing(&self, listing_id: u64) -> Result<Option<Listing>, StorageError> {
        Ok(self.listings.read().get(&listing_id).cloned())
    }
}

/// Append-only bid log, grouped per listing in insertion order.
pub struct InMemoryBidLedger {
    bids: RwLock<HashMap<u64, Vec<Bid>>>,
    next_bid_id: AtomicU64,
}

impl InMemoryBidLedger {
    pub fn new() -> Self {
        Self {
            bids: RwLock::new(HashMap::new()),
            next_bid_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryBidLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BidLedger for InMemoryBidLedger {
    fn append_bid(
        &self,
        listing_id: u64,
        bidder_id: u64,
        amount: Decimal,
        timestamp: u64,
    ) -> Result<u64, StorageError> {
        let id = self.next_bid_id.fetch_add(1, Ordering::Relaxed);
        self.bids.write().entry(listing_id).or_default().push(Bid {
            id,
            listing_id,
            bidder_id,
            amount,
            timestamp,
        });
        Ok(id)
    }

    fn current_high_bid(&self, listing_id: u64) -> Result<Option<Decimal>, StorageError> {
        Ok(self
            .bids
            .read()
            .get(&listing_id)
            .and_then(|bids| bids.iter().map(|bid| bid.amount).max()))
    }

    fn count_bids(&self, listing_id: u64) -> Result<u64, StorageError> {
        Ok(self
            .bids
            .read()
            .get(&listing_id)
            .map_or(0, |bids| bids.len() as u64))
    }

    fn list_bids(&self, listing_id: u64) -> Result<Vec<Bid>, StorageError> {
        let mut bids = self
            .bids
            .read()
            .get(&listing_id)
            .cloned()
            .unwrap_or_default();
        bids.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(bids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn listing(id: u64, status: ListingStatus) -> Listing {
        Listing {
            id,
            office_id: 10,
            title: format!("Vehicle {id}"),
            description: String::new(),
            starting_price: dec("350000"),
            bid_increment: Decimal::ZERO,
            status,
            created_at: 0,
        }
    }

    #[test]
    fn test_store_round_trip_and_status_transition() {
        let store = InMemoryListingStore::new();
        store.upsert(listing(1, ListingStatus::Pending));

        let fetched = store.get_listing(1).unwrap().unwrap();
        assert_eq!(fetched.status, ListingStatus::Pending);

        assert!(store.set_status(1, ListingStatus::Approved));
        let fetched = store.get_listing(1).unwrap().unwrap();
        assert_eq!(fetched.status, ListingStatus::Approved);

        assert!(!store.set_status(99, ListingStatus::Approved));
        assert!(store.get_listing(99).unwrap().is_none());
    }

    #[test]
    fn test_ledger_ids_strictly_increase() {
        let ledger = InMemoryBidLedger::new();
        let first = ledger.append_bid(1, 100, dec("355000"), 1).unwrap();
        let second = ledger.append_bid(1, 101, dec("360000"), 2).unwrap();
        let third = ledger.append_bid(2, 100, dec("500"), 3).unwrap();

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_high_bid_and_count_per_listing() {
        let ledger = InMemoryBidLedger::new();
        assert_eq!(ledger.current_high_bid(1).unwrap(), None);
        assert_eq!(ledger.count_bids(1).unwrap(), 0);

        ledger.append_bid(1, 100, dec("355000"), 1).unwrap();
        ledger.append_bid(1, 101, dec("360000"), 2).unwrap();
        ledger.append_bid(2, 102, dec("9999999.99"), 3).unwrap();

        assert_eq!(ledger.current_high_bid(1).unwrap(), Some(dec("360000")));
        assert_eq!(ledger.count_bids(1).unwrap(), 2);
        assert_eq!(ledger.current_high_bid(2).unwrap(), Some(dec("9999999.99")));
    }

    #[test]
    fn test_history_is_descending_by_amount() {
        let ledger = InMemoryBidLedger::new();
        ledger.append_bid(1, 100, dec("355000"), 1).unwrap();
        ledger.append_bid(1, 101, dec("370000"), 2).unwrap();
        ledger.append_bid(1, 102, dec("360000"), 3).unwrap();

        let history = ledger.list_bids(1).unwrap();
        let amounts: Vec<_> = history.iter().map(|bid| bid.amount).collect();
        assert_eq!(amounts, vec![dec("370000"), dec("360000"), dec("355000")]);
    }
}
