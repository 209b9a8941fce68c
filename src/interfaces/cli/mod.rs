/// CLI Interface Module
///
/// Entry point for the standalone bidding server.
///
/// ## Responsibilities
/// - Parse command-line arguments
/// - Initialize logging
/// - Wire storage, the commit coordinator and the fan-out hub
/// - Serve the HTTP + WebSocket surface

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;

use crate::application::BiddingService;
use crate::domain::{Listing, ListingStatus};
use crate::infrastructure::realtime::BidHub;
use crate::infrastructure::storage::{InMemoryBidLedger, InMemoryListingStore};
use crate::interfaces::http::{self, AppState};
use crate::shared::timestamp::now_millis;

/// Bidding server command-line configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "auction-engine")]
#[command(version = "0.1.0")]
#[command(about = "Real-time vehicle auction bidding engine", long_about = None)]
pub struct CliConfig {
    /// Listen address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Listen port
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Log level
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Seed a few approved demo listings at startup
    #[arg(long, default_value_t = false)]
    pub seed_demo: bool,

    /// Print the configuration without starting the server
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Runs the CLI application.
///
/// Parses command-line arguments, wires the engine together and serves
/// until the process is stopped.
pub async fn run() {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    tracing::info!(?config, "auction bidding engine starting");

    if config.dry_run {
        println!("{config:#?}");
        return;
    }

    let listings = Arc::new(InMemoryListingStore::new());
    let ledger = Arc::new(InMemoryBidLedger::new());
    if config.seed_demo {
        seed_demo_listings(&listings);
    }

    let hub = Arc::new(BidHub::new());
    let service = Arc::new(BiddingService::new(listings, ledger, hub.clone()));
    let app = http::router(AppState { service, hub });

    let addr = SocketAddr::new(config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%addr, %error, "failed to bind listen address");
            return;
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(%error, "server terminated");
    }
}

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// A handful of approved listings for local experimentation.
fn seed_demo_listings(listings: &InMemoryListingStore) {
    let now = now_millis();
    let demo = [
        (
            1,
            "2019 Maruti Swift VXi",
            "Repossessed hatchback, single owner",
            "350000",
            "5000",
        ),
        (
            2,
            "2021 Hyundai Creta SX",
            "Flood-recovered SUV, fully serviced",
            "820000",
            "10000",
        ),
        (
            3,
            "2017 Honda City VX",
            "Finance default seizure, clean papers",
            "540000",
            "0",
        ),
    ];
    for (id, title, description, price, step) in demo {
        listings.upsert(Listing {
            id,
            office_id: 100 + id,
            title: title.to_string(),
            description: description.to_string(),
            starting_price: price.parse().unwrap_or_default(),
            bid_increment: step.parse().unwrap_or_default(),
            status: ListingStatus::Approved,
            created_at: now,
        });
    }
    tracing::info!(count = demo.len(), "seeded demo listings");
}
