/// Bidding Service - Per-listing Bid Commit Coordinator
///
/// The single write authority for the bid ledger. Serializes
/// read-validate-append per listing so no two concurrent submissions can
/// both win against a stale view of the price, while submissions for
/// different listings run fully in parallel.
///
/// ## Commit protocol
/// 1. Reject non-bidder roles before touching any lock
/// 2. Acquire the listing's section: a lazily-created `tokio::sync::Mutex`
///    keyed by listing id (tokio's mutex is FIFO-fair, so waiters cannot
///    starve)
/// 3. Inside the section: load the listing, read the current high bid,
///    validate, append, count - with no await points, so an entered
///    section always runs to completion
/// 4. Drop the guard, then fan the event out; publishing never holds the
///    lock and never blocks
///
/// A submission abandoned while still waiting for the section has no side
/// effects. Two bids of equal amount can never both win: the second one
/// reads the first as the current high bid and fails `BidTooLow`.
///
/// ## Failure semantics
/// A ledger error aborts the submission with `Storage(..)`: nothing is
/// published and the high-bid view is untouched. The append is the commit
/// point; the bid count is read before it so no fallible call runs after
/// the ledger has changed.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::domain::bid::{mask_display_name, Bid, BidderIdentity, UserRole};
use crate::domain::listing::Listing;
use crate::domain::validation::validate_bid;
use crate::infrastructure::realtime::BidHub;
use crate::infrastructure::storage::{BidLedger, ListingStore};
use crate::shared::error::BidError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::BidUpdate;
use crate::shared::timestamp::now_millis;

/// Successful bid submission
#[derive(Debug, Clone, PartialEq)]
pub struct BidAccepted {
    pub bid_id: u64,
    pub amount: Decimal,
    pub new_high_bid: Decimal,
    pub total_bids: u64,
    /// Unix epoch milliseconds.
    pub timestamp: u64,
}

/// Listing read model: the listing plus its derived bid state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingOverview {
    pub listing: Listing,
    /// Highest accepted amount, or the starting price when no bids exist.
    pub current_bid: Decimal,
    pub total_bids: u64,
    /// Descending by amount.
    pub bids: Vec<Bid>,
}

/// Lock table keyed by listing id.
///
/// Entries are created on first contact and never removed: a stable mutex
/// identity per listing is what makes the section exclusive, and the set
/// of listings stays small.
#[derive(Default)]
struct ListingLocks {
    inner: parking_lot::Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl ListingLocks {
    fn for_listing(&self, listing_id: u64) -> Arc<Mutex<()>> {
        self.inner.lock().entry(listing_id).or_default().clone()
    }
}

/// Bid commit coordinator, generic over its storage backends.
pub struct BiddingService<S, L> {
    listings: Arc<S>,
    ledger: Arc<L>,
    hub: Arc<BidHub>,
    locks: ListingLocks,
}

impl<S: ListingStore, L: BidLedger> BiddingService<S, L> {
    pub fn new(listings: Arc<S>, ledger: Arc<L>, hub: Arc<BidHub>) -> Self {
        Self {
            listings,
            ledger,
            hub,
            locks: ListingLocks::default(),
        }
    }

    pub fn hub(&self) -> &Arc<BidHub> {
        &self.hub
    }

    /// Submits a bid on behalf of an authenticated bidder.
    ///
    /// May suspend while waiting for the listing's section; entry order is
    /// the order bids are evaluated against the current high bid.
    ///
    /// # Returns
    /// * `Ok(BidAccepted)` with the new high bid and total count
    /// * `Err(BidError)` naming the rejection; validation rejections carry
    ///   the context needed to re-offer a corrected amount
    pub async fn submit_bid(
        &self,
        bidder: &BidderIdentity,
        listing_id: u64,
        amount: Decimal,
    ) -> Result<BidAccepted, BidError> {
        if bidder.role != UserRole::Bidder {
            METRICS.bids_total.with_label_values(&["forbidden"]).inc();
            return Err(BidError::Forbidden);
        }

        let section = self.locks.for_listing(listing_id);
        let timer = METRICS.bid_commit_duration.start_timer();
        let result = {
            let _guard = section.lock().await;
            self.commit_bid(bidder.id, listing_id, amount)
        };
        timer.observe_duration();

        match result {
            Ok(accepted) => {
                METRICS.bids_total.with_label_values(&["accepted"]).inc();
                let update = BidUpdate {
                    listing_id,
                    amount: accepted.amount,
                    current_bid: accepted.new_high_bid,
                    total_bids: accepted.total_bids,
                    masked_bidder_name: mask_display_name(&bidder.display_name),
                    bid_time: accepted.timestamp,
                };
                // The guard is gone; fan-out is fire-and-forget.
                let delivered = self.hub.publish(listing_id, update);
                debug!(
                    listing_id,
                    bid_id = accepted.bid_id,
                    amount = %accepted.amount,
                    total_bids = accepted.total_bids,
                    delivered,
                    "bid accepted"
                );
                Ok(accepted)
            }
            Err(BidError::Storage(storage)) => {
                METRICS
                    .bids_total
                    .with_label_values(&["storage_error"])
                    .inc();
                error!(listing_id, error = %storage, "bid commit failed in storage");
                Err(BidError::Storage(storage))
            }
            Err(rejection) => {
                METRICS.bids_total.with_label_values(&["rejected"]).inc();
                debug!(listing_id, reason = %rejection, "bid rejected");
                Err(rejection)
            }
        }
    }

    /// The serialized section: consistent read, validate, append.
    ///
    /// Synchronous on purpose - no await point may separate the high-bid
    /// read from the append that depends on it.
    fn commit_bid(
        &self,
        bidder_id: u64,
        listing_id: u64,
        amount: Decimal,
    ) -> Result<BidAccepted, BidError> {
        let listing = self
            .listings
            .get_listing(listing_id)?
            .ok_or(BidError::ListingNotFound)?;

        let current_high = self
            .ledger
            .current_high_bid(listing_id)?
            .unwrap_or(listing.starting_price);
        let prior_bids = self.ledger.count_bids(listing_id)?;

        validate_bid(&listing, current_high, amount)?;

        let timestamp = now_millis();
        let bid_id = self
            .ledger
            .append_bid(listing_id, bidder_id, amount, timestamp)?;

        Ok(BidAccepted {
            bid_id,
            amount,
            new_high_bid: amount,
            total_bids: prior_bids + 1,
            timestamp,
        })
    }

    /// Read model for the auction detail endpoints.
    ///
    /// Runs outside the commit section: readers never contend with
    /// writers, they just see the ledger as of some recent commit.
    pub fn listing_overview(&self, listing_id: u64) -> Result<Option<ListingOverview>, BidError> {
        let Some(listing) = self.listings.get_listing(listing_id)? else {
            return Ok(None);
        };
        let bids = self.ledger.list_bids(listing_id)?;
        let current_bid = bids
            .first()
            .map(|bid| bid.amount)
            .unwrap_or(listing.starting_price);
        Ok(Some(ListingOverview {
            current_bid,
            total_bids: bids.len() as u64,
            bids,
            listing,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingStatus;
    use crate::infrastructure::storage::{InMemoryBidLedger, InMemoryListingStore};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bidder(id: u64, name: &str) -> BidderIdentity {
        BidderIdentity {
            id,
            display_name: name.to_string(),
            role: UserRole::Bidder,
        }
    }

    fn listing(id: u64, starting: &str, step: &str, status: ListingStatus) -> Listing {
        Listing {
            id,
            office_id: 1,
            title: format!("Vehicle {id}"),
            description: String::new(),
            starting_price: dec(starting),
            bid_increment: dec(step),
            status,
            created_at: 0,
        }
    }

    fn service(
        listings: Vec<Listing>,
    ) -> BiddingService<InMemoryListingStore, InMemoryBidLedger> {
        let store = Arc::new(InMemoryListingStore::new());
        for entry in listings {
            store.upsert(entry);
        }
        BiddingService::new(
            store,
            Arc::new(InMemoryBidLedger::new()),
            Arc::new(BidHub::new()),
        )
    }

    #[tokio::test]
    async fn test_first_bid_beats_starting_price() {
        let service = service(vec![listing(1, "350000", "0", ListingStatus::Approved)]);

        let result = service
            .submit_bid(&bidder(100, "Rajesh"), 1, dec("350000"))
            .await;
        assert_eq!(
            result.unwrap_err(),
            BidError::BidTooLow {
                current_high_bid: dec("350000")
            }
        );

        let accepted = service
            .submit_bid(&bidder(100, "Rajesh"), 1, dec("355000"))
            .await
            .unwrap();
        assert_eq!(accepted.new_high_bid, dec("355000"));
        assert_eq!(accepted.total_bids, 1);
    }

    #[tokio::test]
    async fn test_unknown_listing_is_not_found() {
        let service = service(vec![]);
        let result = service.submit_bid(&bidder(100, "Rajesh"), 9, dec("100")).await;
        assert_eq!(result.unwrap_err(), BidError::ListingNotFound);
    }

    #[tokio::test]
    async fn test_non_bidder_roles_are_forbidden() {
        let service = service(vec![listing(1, "350000", "0", ListingStatus::Approved)]);
        for role in [UserRole::Admin, UserRole::Office] {
            let identity = BidderIdentity {
                id: 1,
                display_name: "Staff".to_string(),
                role,
            };
            let result = service.submit_bid(&identity, 1, dec("400000")).await;
            assert_eq!(result.unwrap_err(), BidError::Forbidden);
        }
    }

    #[tokio::test]
    async fn test_overview_tracks_accepted_bids() {
        let service = service(vec![listing(1, "350000", "0", ListingStatus::Approved)]);

        let overview = service.listing_overview(1).unwrap().unwrap();
        assert_eq!(overview.current_bid, dec("350000"));
        assert_eq!(overview.total_bids, 0);

        service
            .submit_bid(&bidder(100, "Rajesh"), 1, dec("355000"))
            .await
            .unwrap();
        service
            .submit_bid(&bidder(101, "Priya"), 1, dec("360000"))
            .await
            .unwrap();

        let overview = service.listing_overview(1).unwrap().unwrap();
        assert_eq!(overview.current_bid, dec("360000"));
        assert_eq!(overview.total_bids, 2);
        assert_eq!(overview.bids[0].bidder_id, 101);

        assert!(service.listing_overview(9).unwrap().is_none());
    }
}
