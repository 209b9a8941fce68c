/// Error taxonomy for the bidding engine
///
/// Validation rejections (`InvalidAmount`, `BidTooLow`, `InvalidIncrement`,
/// `ListingNotBiddable`) are expected outcomes and carry enough context for
/// a client to re-offer a corrected amount without re-fetching listing
/// state. `Storage` is the only variant logged server-side as an error and
/// the only one a caller may retry verbatim.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure reported by a listing store or bid ledger backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage backend failure: {0}")]
pub struct StorageError(pub String);

/// Why a bid submission was turned down.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BidError {
    /// Amount is not a positive value with at most two decimal places
    #[error("bid amount must be a positive value with at most two decimal places")]
    InvalidAmount,

    /// Amount does not beat the current high bid
    #[error("bid must be higher than the current price: {current_high_bid}")]
    BidTooLow { current_high_bid: Decimal },

    /// Amount does not land on the listing's increment grid
    #[error("bid must exceed {current_high_bid} by a multiple of {increment}")]
    InvalidIncrement {
        increment: Decimal,
        current_high_bid: Decimal,
        /// The next two amounts that would be accepted.
        next_valid: [Decimal; 2],
    },

    /// Listing exists but is pending or rejected
    #[error("listing is not open for bidding")]
    ListingNotBiddable,

    /// Listing id is unknown
    #[error("listing not found")]
    ListingNotFound,

    /// Caller does not hold the bidder role
    #[error("only bidder accounts may place bids")]
    Forbidden,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BidError {
    /// Current high bid to echo back to the caller, when the rejection
    /// carries one.
    pub fn current_high_bid(&self) -> Option<Decimal> {
        match self {
            BidError::BidTooLow { current_high_bid }
            | BidError::InvalidIncrement {
                current_high_bid, ..
            } => Some(*current_high_bid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_too_low_message_carries_price() {
        let err = BidError::BidTooLow {
            current_high_bid: dec("85000.50"),
        };
        assert!(err.to_string().contains("85000.50"));
        assert_eq!(err.current_high_bid(), Some(dec("85000.50")));
    }

    #[test]
    fn test_increment_message_names_the_step() {
        let err = BidError::InvalidIncrement {
            increment: dec("500"),
            current_high_bid: dec("10000"),
            next_valid: [dec("10500"), dec("11000")],
        };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.current_high_bid(), Some(dec("10000")));
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: BidError = StorageError("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "storage backend failure: connection reset");
        assert_eq!(err.current_high_bid(), None);
    }
}
