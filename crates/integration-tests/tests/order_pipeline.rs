//! Cart, order and revenue types working together across crates.
//!
//! These run without a database or servers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{TimeZone, Utc};

use chowline_core::cart::{Cart, CartLine};
use chowline_core::revenue::{Period, completed_revenue, range_start, recent_buckets};
use chowline_core::{OrderStatus, Price, ProductId};
use chowline_db::models::{CustomerDetails, NewOrder, StatusCounts};
use chowline_integration_tests::order;

fn line(id: i32, name: &str, price: i64, quantity: u32) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Some(Price::from_units(price)),
        quantity,
    }
}

#[test]
fn test_checkout_total_matches_cart_total() {
    let mut cart = Cart::new();
    cart.add(line(1, "Jollof Rice", 1000, 1));
    cart.add(line(2, "Zobo", 500, 1));
    cart.add(line(1, "Jollof Rice", 1000, 1));

    let order = NewOrder {
        user_id: None,
        customer: CustomerDetails {
            name: "Ada".to_string(),
            phone: "+2348000000000".to_string(),
            address: "12 Allen Avenue".to_string(),
        },
        lines: cart.lines().to_vec(),
    };

    assert_eq!(cart.total(), Price::from_units(2500));
    assert_eq!(order.total(), cart.total());
}

#[test]
fn test_checkout_uses_current_prices_not_cart_snapshots() {
    let mut cart = Cart::new();
    cart.add(line(1, "Suya", 1200, 2));

    // Price went up after the item was added; checkout re-reads it.
    let repriced: Vec<CartLine> = cart
        .lines()
        .iter()
        .map(|l| CartLine {
            unit_price: Some(Price::from_units(1500)),
            ..l.clone()
        })
        .collect();
    let order = NewOrder {
        user_id: None,
        customer: CustomerDetails::default(),
        lines: repriced,
    };

    assert_eq!(cart.total(), Price::from_units(2400));
    assert_eq!(order.total(), Price::from_units(3000));
}

#[test]
fn test_only_completed_orders_count_as_revenue() {
    let at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let orders = vec![
        order(1, 2500, OrderStatus::Completed, at),
        order(2, 9000, OrderStatus::Pending, at),
        order(3, 4000, OrderStatus::Cancelled, at),
        order(4, 1500, OrderStatus::Completed, at),
    ];

    assert_eq!(completed_revenue(&orders), Price::from_units(4000));

    let mut counts = StatusCounts::default();
    for o in &orders {
        counts.record(o.status, 1);
    }
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.total(), 4);
}

#[test]
fn test_daily_report_over_database_rows() {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
    let orders = vec![
        order(1, 1000, OrderStatus::Completed, Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()),
        order(2, 2000, OrderStatus::Completed, Utc.with_ymd_and_hms(2026, 3, 8, 23, 59, 0).unwrap()),
        order(3, 5000, OrderStatus::Pending, Utc.with_ymd_and_hms(2026, 3, 8, 10, 0, 0).unwrap()),
        // Outside the window
        order(4, 7000, OrderStatus::Completed, Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()),
    ];

    let since = range_start(Period::Day, 3, now);
    assert_eq!(since, Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap());

    let in_range: Vec<_> = orders.into_iter().filter(|o| o.created_at >= since).collect();
    let buckets = recent_buckets(&in_range, Period::Day, 3, now);

    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].label, "2026-03-08");
    assert_eq!(buckets[0].revenue, Price::from_units(2000));
    assert_eq!(buckets[1].revenue, Price::ZERO);
    assert_eq!(buckets[2].revenue, Price::from_units(1000));
    assert_eq!(buckets[2].orders, 1);
}

#[test]
fn test_status_changes_move_revenue() {
    let at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut placed = order(1, 3000, OrderStatus::Pending, at);
    assert_eq!(completed_revenue([&placed]), Price::ZERO);

    assert!(placed.status.can_transition_to(OrderStatus::Completed));
    placed.status = OrderStatus::Completed;
    assert_eq!(completed_revenue([&placed]), Price::from_units(3000));

    // Refund
    assert!(placed.status.can_transition_to(OrderStatus::Cancelled));
    placed.status = OrderStatus::Cancelled;
    assert_eq!(completed_revenue([&placed]), Price::ZERO);
    assert!(!placed.status.can_transition_to(OrderStatus::Completed));
}
