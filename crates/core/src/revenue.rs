//! Revenue aggregation by time bucket.
//!
//! Orders are grouped by the UTC day, ISO week (Monday start) or calendar
//! month of the time they were placed. Only completed orders count as
//! revenue; pending and cancelled orders are skipped regardless of when they
//! were placed.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OrderStatus, Price};

/// Error returned when parsing a [`Period`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid period: {0} (expected day, week or month)")]
pub struct ParsePeriodError(String);

/// Bucket size for revenue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl std::str::FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// Anything that can be counted as revenue.
pub trait RevenueSource {
    /// Current order status. Only [`OrderStatus::Completed`] counts.
    fn status(&self) -> OrderStatus;
    /// Amount charged.
    fn amount(&self) -> Price;
    /// When the order was placed.
    fn placed_at(&self) -> DateTime<Utc>;
}

/// Revenue for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// First day of the bucket.
    pub start: NaiveDate,
    /// Human-readable label (`2026-10-18`, `2026-W42`, `2026-10`).
    pub label: String,
    /// Sum of completed order totals.
    pub revenue: Price,
    /// Number of completed orders.
    pub orders: u32,
}

/// The date that starts the bucket containing `ts`.
#[must_use]
pub fn bucket_start(ts: DateTime<Utc>, period: Period) -> NaiveDate {
    let date = ts.date_naive();
    match period {
        Period::Day => date,
        Period::Week => {
            let offset = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(offset)).unwrap_or(date)
        }
        Period::Month => date.with_day(1).unwrap_or(date),
    }
}

/// Label for the bucket starting at `start`.
#[must_use]
pub fn bucket_label(start: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => start.format("%Y-%m-%d").to_string(),
        Period::Week => {
            let week = start.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Period::Month => start.format("%Y-%m").to_string(),
    }
}

/// Start of the bucket immediately before the one starting at `start`.
fn previous_start(start: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Day => start.checked_sub_days(Days::new(1)),
        Period::Week => start.checked_sub_days(Days::new(7)),
        Period::Month => start.checked_sub_months(Months::new(1)),
    }
}

/// Sum of totals over completed orders.
pub fn completed_revenue<'a, T, I>(orders: I) -> Price
where
    T: RevenueSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    orders
        .into_iter()
        .filter(|o| o.status() == OrderStatus::Completed)
        .map(|o| o.amount())
        .sum()
}

/// Group completed orders into buckets, ascending by bucket start.
///
/// Only buckets that contain at least one completed order are returned.
pub fn bucket_revenue<'a, T, I>(orders: I, period: Period) -> Vec<RevenueBucket>
where
    T: RevenueSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sums: BTreeMap<NaiveDate, (Price, u32)> = BTreeMap::new();

    for order in orders {
        if order.status() != OrderStatus::Completed {
            continue;
        }
        let entry = sums
            .entry(bucket_start(order.placed_at(), period))
            .or_insert((Price::ZERO, 0));
        entry.0 += order.amount();
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(start, (revenue, orders))| RevenueBucket {
            start,
            label: bucket_label(start, period),
            revenue,
            orders,
        })
        .collect()
}

/// Start dates of the `count` consecutive buckets ending with the bucket
/// containing `now`, ascending.
#[must_use]
pub fn recent_bucket_starts(period: Period, count: usize, now: DateTime<Utc>) -> Vec<NaiveDate> {
    let mut starts = Vec::with_capacity(count);
    let mut cursor = Some(bucket_start(now, period));

    while starts.len() < count {
        let Some(start) = cursor else { break };
        starts.push(start);
        cursor = previous_start(start, period);
    }

    starts.reverse();
    starts
}

/// Earliest instant covered by [`recent_buckets`] for the same arguments.
///
/// Use this to bound the query that loads orders for a report.
#[must_use]
pub fn range_start(period: Period, count: usize, now: DateTime<Utc>) -> DateTime<Utc> {
    recent_bucket_starts(period, count.max(1), now)
        .first()
        .map_or(now, |d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Exactly `count` consecutive buckets ending with the bucket containing
/// `now`. Buckets without completed orders are zero-filled; orders outside
/// the window are ignored.
pub fn recent_buckets<'a, T, I>(
    orders: I,
    period: Period,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<RevenueBucket>
where
    T: RevenueSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sums: BTreeMap<NaiveDate, (Price, u32)> = recent_bucket_starts(period, count, now)
        .into_iter()
        .map(|start| (start, (Price::ZERO, 0)))
        .collect();

    for order in orders {
        if order.status() != OrderStatus::Completed {
            continue;
        }
        if let Some(entry) = sums.get_mut(&bucket_start(order.placed_at(), period)) {
            entry.0 += order.amount();
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(start, (revenue, orders))| RevenueBucket {
            start,
            label: bucket_label(start, period),
            revenue,
            orders,
        })
        .collect()
}
