use crate::services::as_of::sort_by_time;
use crate::value_objects::price_point::PricePoint;
use crate::value_objects::trade_date::format_trade_date;
use serde::Serialize;

pub const DEFAULT_MAX_CHART_POINTS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: i64,
    pub price: f64,
    pub date_label: String,
}

/// Keeps every `ceil(len / max_points)`-th element starting with the first, so
/// the output never exceeds `max_points`.
pub fn downsample_to_max<T: Clone>(data: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 {
        return Vec::new();
    }
    if data.len() <= max_points {
        return data.to_vec();
    }
    let step = data.len().div_ceil(max_points);
    data.iter().step_by(step).cloned().collect()
}

pub fn chart_points(series: &[PricePoint], max_points: usize) -> Vec<ChartPoint> {
    downsample_to_max(&sort_by_time(series), max_points)
        .into_iter()
        .map(|point| ChartPoint {
            time: point.time,
            price: point.price,
            date_label: point.utc_date().map(format_trade_date).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn short_input_is_returned_unchanged() {
        let data = vec![1, 2, 3];
        assert_eq!(downsample_to_max(&data, 3), data);
        assert_eq!(downsample_to_max(&data, 500), data);
        assert!(downsample_to_max::<i32>(&[], 10).is_empty());
        assert!(downsample_to_max(&data, 0).is_empty());
    }

    #[test]
    fn long_input_keeps_every_step_th_element() {
        let data: Vec<usize> = (0..1_001).collect();
        let sampled = downsample_to_max(&data, 500);
        // step = ceil(1001 / 500) = 3
        assert_eq!(sampled.len(), 334);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[1], 3);
        assert_eq!(*sampled.last().expect("last"), 999);
    }

    #[test]
    fn chart_points_are_sorted_and_labelled() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).expect("date");
        let series = vec![
            PricePoint::on_date(day(5), 11.0),
            PricePoint::on_date(day(4), 10.0),
        ];
        let points = chart_points(&series, DEFAULT_MAX_CHART_POINTS);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date_label, "2024-03-04");
        assert_eq!(points[1].date_label, "2024-03-05");
        assert!((points[1].price - 11.0).abs() < 1e-9);
    }
}
