/// Application services

pub mod bidding_service;

pub use bidding_service::{BidAccepted, BiddingService, ListingOverview};
