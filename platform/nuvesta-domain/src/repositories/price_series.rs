use crate::value_objects::price_point::PricePoint;
use crate::value_objects::trade_date::midnight_utc_millis;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeriesQuery {
    pub symbol: String,
    /// Only observations strictly after this date.
    pub from: Option<NaiveDate>,
    /// Ask the source to sync missing history before answering.
    pub autofetch: bool,
}

impl PriceSeriesQuery {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            from: None,
            autofetch: true,
        }
    }

    /// Intraday stamps on `from` itself are excluded along with its midnight.
    pub fn admits(&self, point: &PricePoint) -> bool {
        let Some(from) = self.from else {
            return true;
        };
        from.succ_opt()
            .is_some_and(|next| point.time >= midnight_utc_millis(next))
    }
}

pub trait PriceSeriesProvider {
    fn load_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String>;

    /// The series as the source holds it, before any sorting, deduplication
    /// or dropping of unusable prices. Used for quality reporting.
    fn load_raw_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        self.load_series(query)
    }
}

/// Provider over series already held in memory, keyed by upper-cased symbol.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSeriesProvider {
    series: BTreeMap<String, Vec<PricePoint>>,
}

impl InMemoryPriceSeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.series.insert(symbol.trim().to_uppercase(), points);
        self
    }
}

impl PriceSeriesProvider for InMemoryPriceSeriesProvider {
    fn load_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        let key = query.symbol.trim().to_uppercase();
        let points = self
            .series
            .get(&key)
            .ok_or_else(|| format!("unknown symbol: {}", query.symbol))?;
        Ok(points.iter().filter(|p| query.admits(p)).copied().collect())
    }
}
