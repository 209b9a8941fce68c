/// Bid Validator - Pure Accept/Reject Decision
///
/// Decides whether a proposed amount beats a listing's current high bid
/// under the listing's increment policy. No clock, no storage, no side
/// effects: every rejection is reproducible from its inputs.
///
/// ## Validation Rules
/// - Listing must be approved
/// - Amount must be positive with at most two decimal places
/// - Amount must be strictly greater than the current high bid
/// - With a positive increment step, the raise must be an exact multiple
///   of that step
///
/// All comparisons run on `Decimal`; the exact-multiple check would be
/// unreliable on binary floats.
///
/// ## Usage
/// ```rust,ignore
/// use auction_engine::domain::validate_bid;
///
/// match validate_bid(&listing, current_high_bid, amount) {
///     Ok(()) => println!("bid beats the current price"),
///     Err(e) => println!("rejected: {e}"),
/// }
/// ```

use crate::domain::listing::Listing;
use crate::shared::error::BidError;
use rust_decimal::Decimal;

/// Maximum fractional digits a bid amount may carry.
const MAX_AMOUNT_SCALE: u32 = 2;

/// Validates a proposed bid against a listing's current state.
///
/// # Arguments
/// * `listing` - the listing being bid on
/// * `current_high_bid` - highest accepted amount, or the starting price
///   when no bids exist
/// * `amount` - the proposed bid amount
///
/// # Returns
/// * `Ok(())` if the bid would become the new high bid
/// * `Err(BidError)` naming the first rule the bid breaks
pub fn validate_bid(
    listing: &Listing,
    current_high_bid: Decimal,
    amount: Decimal,
) -> Result<(), BidError> {
    if !listing.is_biddable() {
        return Err(BidError::ListingNotBiddable);
    }

    if amount <= Decimal::ZERO || amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(BidError::InvalidAmount);
    }

    if amount <= current_high_bid {
        return Err(BidError::BidTooLow { current_high_bid });
    }

    let step = listing.bid_increment;
    if step > Decimal::ZERO {
        let raise = amount - current_high_bid;
        if !(raise % step).is_zero() {
            return Err(BidError::InvalidIncrement {
                increment: step,
                current_high_bid,
                next_valid: [current_high_bid + step, current_high_bid + step + step],
            });
        }
    }

    Ok(())
}
