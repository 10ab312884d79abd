use crate::value_objects::trade_date::{midnight_utc_millis, utc_date_of_millis};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed closing price. `time` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }

    /// Observation stamped at UTC midnight of `date`, the way the market-data
    /// service stamps daily closes.
    pub fn on_date(date: NaiveDate, price: f64) -> Self {
        Self::new(midnight_utc_millis(date), price)
    }

    pub fn utc_date(&self) -> Option<NaiveDate> {
        utc_date_of_millis(self.time)
    }

    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::PricePoint;
    use chrono::NaiveDate;

    #[test]
    fn deserializes_wire_shape() {
        let points: Vec<PricePoint> =
            serde_json::from_str(r#"[{"time":1704153600000,"price":100.25}]"#).expect("json");
        assert_eq!(points.len(), 1);
        assert_eq!(
            points[0].utc_date(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert!((points[0].price - 100.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        assert!(PricePoint::new(0, 0.0).has_valid_price());
        assert!(!PricePoint::new(0, -0.01).has_valid_price());
        assert!(!PricePoint::new(0, f64::NAN).has_valid_price());
        assert!(!PricePoint::new(0, f64::INFINITY).has_valid_price());
    }
}
