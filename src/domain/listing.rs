/// Vehicle listings and their lifecycle
///
/// Listings are owned by the external listing-management collaborator; the
/// bidding engine only reads them. Status transitions (admin approval or
/// rejection) happen outside the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

/// A vehicle put up for auction by a finance office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    /// Finance office that listed the vehicle.
    pub office_id: u64,
    pub title: String,
    pub description: String,
    /// Opening price; the floor the first bid must beat.
    pub starting_price: Decimal,
    /// Zero allows any raise; a positive step requires bids to land on
    /// exact multiples above the current high bid.
    pub bid_increment: Decimal,
    pub status: ListingStatus,
    /// Unix epoch milliseconds.
    pub created_at: u64,
}

impl Listing {
    /// Only approved listings accept bids.
    pub fn is_biddable(&self) -> bool {
        self.status == ListingStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(status: ListingStatus) -> Listing {
        Listing {
            id: 1,
            office_id: 10,
            title: "2019 Maruti Swift VXi".to_string(),
            description: String::new(),
            starting_price: "350000".parse().unwrap(),
            bid_increment: "5000".parse().unwrap(),
            status,
            created_at: 0,
        }
    }

    #[test]
    fn test_only_approved_is_biddable() {
        assert!(listing(ListingStatus::Approved).is_biddable());
        assert!(!listing(ListingStatus::Pending).is_biddable());
        assert!(!listing(ListingStatus::Rejected).is_biddable());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let value = serde_json::to_value(ListingStatus::Approved).unwrap();
        assert_eq!(value, "approved");
    }
}
