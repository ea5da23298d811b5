//! Canonical monthly APY series.
//!
//! The chart endpoint returns daily (or irregular) samples in arbitrary order,
//! sometimes with duplicate months or missing rates. Charting wants exactly one
//! point per calendar month over the trailing 12 months. The collapse rules:
//!
//! - samples older than `now - 12 calendar months` are dropped (no upper
//!   bound is applied; a future-dated sample stays in)
//! - within a month, the first sample *in input order* wins — not the one
//!   closest to the 1st. Callers feeding unsorted data get order-sensitive
//!   selection, and that is the documented policy, not an accident.
//! - a missing rate becomes `0.0` rather than dropping the month
//! - a sample whose timestamp does not parse is skipped; one bad record must
//!   not blank the chart
//!
//! `now` is a parameter rather than a clock read so the transform is a pure
//! function and the window is explicit: re-running later with the same raw
//! data can legitimately drop the oldest month.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Utc};

use crate::domain::{MonthlySample, RawSample};

/// Maximum number of points in the canonical series.
const MAX_MONTHS: usize = 12;

/// Collapse `raw` into the canonical monthly series relative to `now`.
///
/// The result is a fresh vector, ascending by timestamp, with at most 12
/// entries and at most one entry per (year, month).
pub fn build_monthly_series(raw: &[RawSample], now: DateTime<Utc>) -> Vec<MonthlySample> {
    let window_start = now
        .checked_sub_months(Months::new(12))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut seen_months: HashSet<(i32, u32)> = HashSet::new();
    let mut retained: Vec<(DateTime<Utc>, MonthlySample)> = Vec::new();

    for sample in raw {
        let Some(instant) = parse_timestamp(&sample.timestamp) else {
            continue;
        };
        if instant < window_start {
            continue;
        }
        if seen_months.insert((instant.year(), instant.month())) {
            retained.push((
                instant,
                MonthlySample {
                    timestamp: sample.timestamp.clone(),
                    apy: sample.apy.unwrap_or(0.0),
                },
            ));
        }
    }

    retained.sort_by_key(|(instant, _)| *instant);

    // A mid-month `now` makes the window span 13 partial calendar months
    // (both end months can carry samples). The series is capped at 12 by
    // dropping the oldest entries.
    let mut out: Vec<MonthlySample> = retained.into_iter().map(|(_, sample)| sample).collect();
    if out.len() > MAX_MONTHS {
        out.drain(..out.len() - MAX_MONTHS);
    }
    out
}

/// Parse a chart timestamp.
///
/// The API emits RFC 3339 instants (`2024-03-01T00:00:00.000Z`); plain
/// `YYYY-MM-DD` dates are also accepted and read as midnight UTC. Anything
/// else is treated as malformed and the sample is skipped by the caller.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: &str, apy: Option<f64>) -> RawSample {
        RawSample {
            timestamp: ts.to_string(),
            apy,
        }
    }

    fn now(ts: &str) -> DateTime<Utc> {
        parse_timestamp(ts).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(build_monthly_series(&[], now("2024-03-01")).is_empty());
    }

    #[test]
    fn first_listed_sample_wins_within_a_month() {
        // January has two samples; the first *listed* one wins even though the
        // second is closer to the 1st of the month.
        let raw = vec![
            sample("2024-01-15", Some(5.0)),
            sample("2024-01-02", Some(7.0)),
            sample("2024-02-10", Some(6.0)),
        ];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timestamp, "2024-01-15");
        assert_eq!(out[0].apy, 5.0);
        assert_eq!(out[1].timestamp, "2024-02-10");
        assert_eq!(out[1].apy, 6.0);
    }

    #[test]
    fn samples_before_the_window_are_dropped() {
        // 13 months back is out; exactly 12 months back is in.
        let raw = vec![
            sample("2023-02-01", Some(1.0)),
            sample("2023-03-01", Some(2.0)),
        ];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp, "2023-03-01");
    }

    #[test]
    fn missing_rate_defaults_to_zero() {
        let raw = vec![sample("2024-01-05", None)];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].apy, 0.0);
    }

    #[test]
    fn malformed_timestamp_skips_only_that_sample() {
        let raw = vec![
            sample("not-a-date", Some(9.0)),
            sample("2024-02-10", Some(6.0)),
        ];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].apy, 6.0);
    }

    #[test]
    fn output_is_sorted_even_when_input_is_not() {
        let raw = vec![
            sample("2024-02-10T00:00:00.000Z", Some(6.0)),
            sample("2023-11-20", Some(3.0)),
            sample("2024-01-15", Some(5.0)),
        ];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        let stamps: Vec<&str> = out.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec!["2023-11-20", "2024-01-15", "2024-02-10T00:00:00.000Z"]
        );
    }

    #[test]
    fn at_most_twelve_months_and_no_duplicate_month_keys() {
        // Daily samples across 14 months, several per month.
        let mut raw = Vec::new();
        for year in [2023, 2024] {
            for month in 1..=12 {
                for day in [3, 17, 25] {
                    raw.push(sample(&format!("{year}-{month:02}-{day:02}"), Some(1.0)));
                }
            }
        }
        let out = build_monthly_series(&raw, now("2024-06-15"));
        assert!(out.len() <= 12, "got {} entries", out.len());

        let mut keys = HashSet::new();
        for s in &out {
            let instant = parse_timestamp(&s.timestamp).unwrap();
            assert!(
                keys.insert((instant.year(), instant.month())),
                "duplicate month {}",
                s.timestamp
            );
        }

        // Ascending timestamps.
        let instants: Vec<_> = out
            .iter()
            .map(|s| parse_timestamp(&s.timestamp).unwrap())
            .collect();
        assert!(instants.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn future_samples_are_not_excluded() {
        // No upper bound: a sample after `now` stays in and sorts last.
        let raw = vec![
            sample("2024-02-10", Some(6.0)),
            sample("2024-04-01", Some(8.0)),
        ];
        let out = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].timestamp, "2024-04-01");
    }

    #[test]
    fn advancing_now_drops_the_oldest_month() {
        let raw = vec![
            sample("2023-04-10", Some(1.0)),
            sample("2024-02-10", Some(6.0)),
        ];
        let before = build_monthly_series(&raw, now("2024-03-01"));
        assert_eq!(before.len(), 2);

        // One month later the April 2023 sample falls out of the window.
        let after = build_monthly_series(&raw, now("2024-04-15"));
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].timestamp, "2024-02-10");
    }

    #[test]
    fn parse_timestamp_accepts_api_shapes() {
        assert!(parse_timestamp("2024-03-01T00:00:00.000Z").is_some());
        assert!(parse_timestamp("2024-03-01T12:30:00Z").is_some());
        assert!(parse_timestamp("2024-03-01T12:30:00.5").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("03/01/2024").is_none());
    }
}
