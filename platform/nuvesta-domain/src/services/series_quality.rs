use crate::services::as_of::sort_by_time;
use crate::value_objects::price_point::PricePoint;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SeriesQualityReport {
    pub points: usize,
    pub duplicate_dates: usize,
    pub out_of_order: usize,
    pub invalid_price: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub first_duplicate: Option<i64>,
    pub first_out_of_order: Option<i64>,
    pub first_invalid_price: Option<i64>,
    pub max_gap_days: Option<i64>,
}

/// Out-of-order and invalid prices are counted in received order; duplicate
/// calendar dates and gaps are counted in time order.
pub fn quality_from_points(points: &[PricePoint]) -> SeriesQualityReport {
    let mut report = SeriesQualityReport {
        points: points.len(),
        ..SeriesQualityReport::default()
    };
    if points.is_empty() {
        return report;
    }

    let mut last_ts: Option<i64> = None;
    for point in points {
        if !point.has_valid_price() {
            report.invalid_price += 1;
            if report.first_invalid_price.is_none() {
                report.first_invalid_price = Some(point.time);
            }
        }
        if let Some(prev) = last_ts {
            if point.time < prev {
                report.out_of_order += 1;
                if report.first_out_of_order.is_none() {
                    report.first_out_of_order = Some(point.time);
                }
            }
        }
        last_ts = Some(point.time);
    }

    let sorted = sort_by_time(points);
    report.first_timestamp = sorted.first().map(|p| p.time);
    report.last_timestamp = sorted.last().map(|p| p.time);

    let mut prev_date: Option<NaiveDate> = None;
    let mut max_gap: Option<i64> = None;
    for point in &sorted {
        let Some(date) = point.utc_date() else {
            continue;
        };
        if let Some(prev) = prev_date {
            if date == prev {
                report.duplicate_dates += 1;
                if report.first_duplicate.is_none() {
                    report.first_duplicate = Some(point.time);
                }
            } else {
                let gap = (date - prev).num_days();
                max_gap = Some(max_gap.map_or(gap, |current| current.max(gap)));
            }
        }
        prev_date = Some(date);
    }

    report.max_gap_days = max_gap;
    report
}
