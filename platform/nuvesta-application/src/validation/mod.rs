use crate::config::ValidationConfig;
use nuvesta_domain::repositories::price_series::{PriceSeriesProvider, PriceSeriesQuery};
use nuvesta_domain::services::series_quality::{quality_from_points, SeriesQualityReport};
use nuvesta_domain::value_objects::trade_date::{format_trade_date, utc_date_of_millis};
use std::time::Instant;
use tracing::info_span;

pub fn validate_series(
    provider: &dyn PriceSeriesProvider,
    symbol: &str,
    limits: &ValidationConfig,
    strict: bool,
    autofetch: bool,
) -> Result<serde_json::Value, String> {
    let _span = info_span!("validate", symbol = %symbol, strict = strict).entered();

    let stage_start = Instant::now();
    let points = provider.load_raw_series(&PriceSeriesQuery {
        symbol: symbol.to_string(),
        from: None,
        autofetch,
    })?;
    metrics::histogram!("nuvesta.validate.load_series_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    let report = quality_from_points(&points);
    let violations = limit_violations(&report, limits);
    for violation in &violations {
        tracing::warn!(violation = %violation, "price series quality limit exceeded");
    }

    if strict && !violations.is_empty() {
        return Err(format!(
            "price series for {symbol} failed validation: {}",
            violations.join("; ")
        ));
    }

    Ok(serde_json::json!({
        "symbol": symbol,
        "strict": strict,
        "first_date": report.first_timestamp.and_then(utc_date_of_millis).map(format_trade_date),
        "last_date": report.last_timestamp.and_then(utc_date_of_millis).map(format_trade_date),
        "quality": report,
        "violations": violations,
    }))
}

fn limit_violations(report: &SeriesQualityReport, limits: &ValidationConfig) -> Vec<String> {
    let checks = [
        ("duplicate_dates", report.duplicate_dates, limits.max_duplicate_dates),
        ("out_of_order", report.out_of_order, limits.max_out_of_order),
        ("invalid_price", report.invalid_price, limits.max_invalid_price),
    ];
    checks
        .into_iter()
        .filter_map(|(name, count, limit)| {
            let limit = limit?;
            (count > limit).then(|| format!("{name}={count} exceeds max {limit}"))
        })
        .collect()
}
