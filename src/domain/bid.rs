/// Accepted bids and bidder identity
///
/// A `Bid` is created exactly once by the commit coordinator and never
/// mutated afterwards. Identity arrives pre-authenticated from the auth
/// collaborator; the engine only checks the role.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An accepted bid, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Ledger-assigned id, strictly increasing in insertion order.
    pub id: u64,
    pub listing_id: u64,
    pub bidder_id: u64,
    pub amount: Decimal,
    /// Unix epoch milliseconds.
    pub timestamp: u64,
}

/// Role carried by an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Office,
    Bidder,
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "office" => Ok(UserRole::Office),
            // The account service historically calls bidder accounts "user".
            "bidder" | "user" => Ok(UserRole::Bidder),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated identity supplied by the auth collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct BidderIdentity {
    pub id: u64,
    pub display_name: String,
    pub role: UserRole,
}

/// Redacts the middle of a display name for broadcast payloads.
///
/// The first two and last two characters stay visible; names of four or
/// fewer characters keep only their first character. Presentation only -
/// the ledger keeps the full identity for audit.
pub fn mask_display_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 4 {
        let first: String = chars.first().map(|c| c.to_string()).unwrap_or_default();
        return format!("{first}***");
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    let masked = "*".repeat(chars.len() - 4);
    format!("{head}{masked}{tail}")
}
