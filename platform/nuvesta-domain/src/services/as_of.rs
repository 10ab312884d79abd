//! As-of (last known value) matching of a requested calendar date against a
//! daily price series.
//!
//! Price series only carry observations for trading days, so a requested date
//! that falls on a weekend or holiday resolves to the most recent observation
//! on or before it. Every "no match" case (empty series, unparseable date,
//! date before the first observation) is `None`, never an error.

use crate::value_objects::price_point::PricePoint;
use crate::value_objects::trade_date::{midnight_utc_millis, parse_trade_date};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub point: PricePoint,
    /// True when the matched observation falls on the requested date itself.
    pub exact_match: bool,
}

impl MatchResult {
    /// Date of the observation actually used.
    pub fn settlement_date(&self) -> Option<NaiveDate> {
        self.point.utc_date()
    }
}

/// Returns a copy of `series` sorted ascending by time. The sort is stable, so
/// equal timestamps keep their received order.
pub fn sort_by_time(series: &[PricePoint]) -> Vec<PricePoint> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|point| point.time);
    sorted
}

pub fn match_as_of(series: &[PricePoint], target: Option<NaiveDate>) -> Option<MatchResult> {
    let target = target?;
    if series.is_empty() {
        return None;
    }
    scan_sorted(&sort_by_time(series), target)
}

pub fn match_as_of_str(series: &[PricePoint], target: &str) -> Option<MatchResult> {
    match_as_of(series, parse_trade_date(target))
}

fn scan_sorted(sorted: &[PricePoint], target: NaiveDate) -> Option<MatchResult> {
    let target_time = midnight_utc_millis(target);
    let point = sorted.iter().rev().find(|point| point.time <= target_time)?;
    Some(MatchResult {
        point: *point,
        exact_match: point.utc_date() == Some(target),
    })
}

/// A price series sorted once on construction, so repeated lookups for
/// different dates do not re-sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSeries {
    points: Vec<PricePoint>,
}

impl SortedSeries {
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.time);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().and_then(PricePoint::utc_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().and_then(PricePoint::utc_date)
    }

    pub fn as_of(&self, target: Option<NaiveDate>) -> Option<MatchResult> {
        scan_sorted(&self.points, target?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    // 2024-01-04 has no observation.
    fn sample_series() -> Vec<PricePoint> {
        vec![
            PricePoint::on_date(ymd(2024, 1, 5), 101.0),
            PricePoint::on_date(ymd(2024, 1, 2), 100.0),
            PricePoint::on_date(ymd(2024, 1, 3), 102.0),
        ]
    }

    #[test]
    fn gap_day_resolves_to_previous_trading_day() {
        let result = match_as_of_str(&sample_series(), "2024-01-04").expect("match");
        assert_eq!(result.point, PricePoint::on_date(ymd(2024, 1, 3), 102.0));
        assert!(!result.exact_match);
        assert_eq!(result.settlement_date(), Some(ymd(2024, 1, 3)));
    }

    #[test]
    fn trading_day_is_an_exact_match() {
        let result = match_as_of_str(&sample_series(), "2024-01-03").expect("match");
        assert_eq!(result.point, PricePoint::on_date(ymd(2024, 1, 3), 102.0));
        assert!(result.exact_match);
    }

    #[test]
    fn date_before_history_has_no_match() {
        assert!(match_as_of_str(&sample_series(), "2024-01-01").is_none());
    }

    #[test]
    fn date_after_history_uses_latest_point() {
        let result = match_as_of_str(&sample_series(), "2024-01-10").expect("match");
        assert_eq!(result.point, PricePoint::on_date(ymd(2024, 1, 5), 101.0));
        assert!(!result.exact_match);
    }

    #[test]
    fn empty_series_and_bad_dates_have_no_match() {
        assert!(match_as_of_str(&[], "2024-01-03").is_none());
        assert!(match_as_of(&sample_series(), None).is_none());
        assert!(match_as_of_str(&sample_series(), "").is_none());
        assert!(match_as_of_str(&sample_series(), "03/01/2024").is_none());
    }

    #[test]
    fn intraday_stamp_after_midnight_is_not_visible_that_day() {
        let series = vec![
            PricePoint::on_date(ymd(2024, 1, 2), 100.0),
            PricePoint::new(PricePoint::on_date(ymd(2024, 1, 3), 0.0).time + 3_600_000, 102.0),
        ];
        let result = match_as_of(&series, Some(ymd(2024, 1, 3))).expect("match");
        assert!((result.point.price - 100.0).abs() < 1e-9);
        assert!(!result.exact_match);
    }

    #[test]
    fn equal_timestamps_prefer_the_last_received() {
        let day = ymd(2024, 1, 2);
        let series = vec![PricePoint::on_date(day, 1.0), PricePoint::on_date(day, 2.0)];
        let result = match_as_of(&series, Some(day)).expect("match");
        assert!((result.point.price - 2.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_series_matches_free_function() {
        let series = SortedSeries::from_unsorted(sample_series());
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(ymd(2024, 1, 2)));
        assert_eq!(series.last_date(), Some(ymd(2024, 1, 5)));
        for day in 1..=10 {
            let target = Some(ymd(2024, 1, day));
            assert_eq!(series.as_of(target), match_as_of(&sample_series(), target));
        }
        assert!(SortedSeries::default().as_of(Some(ymd(2024, 1, 3))).is_none());
        assert!(SortedSeries::default().first_date().is_none());
    }
}
