/// Micro-benchmarks for the bid hot paths: validation and fan-out.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use auction_engine::domain::{validate_bid, Listing, ListingStatus};
use auction_engine::infrastructure::realtime::BidHub;
use auction_engine::shared::protocol::BidUpdate;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn approved_listing(increment: &str) -> Listing {
    Listing {
        id: 1,
        office_id: 10,
        title: "2021 Hyundai Creta SX".to_string(),
        description: String::new(),
        starting_price: dec("10000"),
        bid_increment: dec(increment),
        status: ListingStatus::Approved,
        created_at: 0,
    }
}

fn bench_validate(c: &mut Criterion) {
    let free_raise = approved_listing("0");
    let stepped = approved_listing("500");
    let high = dec("812500");
    let amount = dec("813000");

    c.bench_function("validate_free_raise", |b| {
        b.iter(|| validate_bid(black_box(&free_raise), black_box(high), black_box(amount)))
    });

    c.bench_function("validate_increment_grid", |b| {
        b.iter(|| validate_bid(black_box(&stepped), black_box(high), black_box(amount)))
    });
}

fn bench_fanout(c: &mut Criterion) {
    let hub = BidHub::new();
    let mut subscriptions: Vec<_> = (0..64).map(|_| hub.subscribe(1)).collect();
    let update = BidUpdate {
        listing_id: 1,
        amount: dec("813000"),
        current_bid: dec("813000"),
        total_bids: 42,
        masked_bidder_name: "Ra**sh".to_string(),
        bid_time: 1_772_000_000_000,
    };

    c.bench_function("publish_to_64_subscribers", |b| {
        b.iter(|| {
            black_box(hub.publish(1, update.clone()));
            // Drain so the unbounded channels do not grow across iterations.
            for subscription in subscriptions.iter_mut() {
                while subscription.try_recv().is_some() {}
            }
        })
    });
}

criterion_group!(benches, bench_validate, bench_fanout);
criterion_main!(benches);
