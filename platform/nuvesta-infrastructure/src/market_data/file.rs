use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use nuvesta_domain::repositories::price_series::{PriceSeriesProvider, PriceSeriesQuery};
use nuvesta_domain::services::series_quality::{quality_from_points, SeriesQualityReport};
use nuvesta_domain::value_objects::price_point::PricePoint;
use nuvesta_domain::value_objects::trade_date::{midnight_utc_millis, parse_trade_date};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct PriceRecord {
    pub date: String,
    pub price: f64,
}

/// Loads a `date,price` CSV. Rows with unusable prices are dropped, and a later
/// row with the same timestamp replaces an earlier one. The report describes
/// the file as read, before cleaning.
pub fn load_csv(path: &Path) -> Result<(Vec<PricePoint>, SeriesQualityReport), String> {
    let raw = read_csv_rows(path)?;
    let report = quality_from_points(&raw);

    let mut by_time: BTreeMap<i64, PricePoint> = BTreeMap::new();
    for point in raw.into_iter().filter(PricePoint::has_valid_price) {
        by_time.insert(point.time, point);
    }
    Ok((by_time.into_values().collect(), report))
}

/// Every row in file order, unsorted and uncleaned.
pub fn read_csv_rows(path: &Path) -> Result<Vec<PricePoint>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open price CSV {}: {}", path.display(), err))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize::<PriceRecord>() {
        let record = result.map_err(|err| format!("failed to parse CSV row: {}", err))?;
        let time = parse_timestamp(&record.date)?;
        rows.push(PricePoint::new(time, record.price));
    }
    Ok(rows)
}

fn parse_timestamp(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if let Some(date) = parse_trade_date(trimmed) {
        return Ok(midnight_utc_millis(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        let dt: DateTime<Utc> = Utc.from_utc_datetime(&naive);
        return Ok(dt.timestamp_millis());
    }
    if let Ok(millis) = trimmed.parse::<i64>() {
        return Ok(millis);
    }

    Err(format!("unsupported date format: {}", value))
}

/// Reads `{SYMBOL}.csv` from a directory, or a single CSV file for every
/// symbol when `path` points at a file.
#[derive(Debug, Clone)]
pub struct CsvPriceSeriesProvider {
    path: PathBuf,
}

impl CsvPriceSeriesProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn resolve_path(&self, symbol: &str) -> Result<PathBuf, String> {
        let symbol = symbol.trim();
        if symbol.is_empty()
            || symbol.contains(['/', '\\'])
            || symbol.contains("..")
        {
            return Err(format!("invalid symbol for CSV lookup: {symbol:?}"));
        }
        if self.path.is_dir() {
            Ok(self.path.join(format!("{}.csv", symbol.to_uppercase())))
        } else {
            Ok(self.path.clone())
        }
    }
}

impl PriceSeriesProvider for CsvPriceSeriesProvider {
    fn load_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        let path = self.resolve_path(&query.symbol)?;
        let _span = tracing::info_span!(
            "infra.prices.load_csv",
            symbol = %query.symbol,
            path = %path.display()
        )
        .entered();

        let start = Instant::now();
        let result = load_csv(&path);
        let result_label = if result.is_ok() { "ok" } else { "err" };
        metrics::counter!(
            "nuvesta.infra.prices.requests_total",
            "source" => "csv",
            "result" => result_label
        )
        .increment(1);
        metrics::histogram!("nuvesta.infra.prices.call_ms", "source" => "csv")
            .record(start.elapsed().as_millis() as f64);

        let (points, report) = result?;
        if report.invalid_price > 0 || report.duplicate_dates > 0 {
            tracing::warn!(
                invalid_price = report.invalid_price,
                duplicate_dates = report.duplicate_dates,
                "price CSV contained unusable rows"
            );
        }
        Ok(points.into_iter().filter(|p| query.admits(p)).collect())
    }

    fn load_raw_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        let path = self.resolve_path(&query.symbol)?;
        let _span = tracing::info_span!(
            "infra.prices.read_csv_rows",
            symbol = %query.symbol,
            path = %path.display()
        )
        .entered();
        let rows = read_csv_rows(&path)?;
        Ok(rows.into_iter().filter(|p| query.admits(p)).collect())
    }
}
