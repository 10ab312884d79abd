use chrono::NaiveDate;
use nuvesta_domain::repositories::price_series::{PriceSeriesProvider, PriceSeriesQuery};
use nuvesta_domain::services::chart::{chart_points, ChartPoint};
use serde::Serialize;
use std::time::Instant;
use tracing::info_span;

#[derive(Debug, Clone, Serialize)]
pub struct PriceChart {
    pub symbol: String,
    pub source_points: usize,
    pub points: Vec<ChartPoint>,
}

pub fn build_price_chart(
    provider: &dyn PriceSeriesProvider,
    symbol: &str,
    from: Option<NaiveDate>,
    max_points: usize,
    autofetch: bool,
) -> Result<PriceChart, String> {
    let _span = info_span!("chart", symbol = %symbol, max_points = max_points).entered();

    if max_points == 0 {
        return Err("max_points must be > 0".to_string());
    }

    let stage_start = Instant::now();
    let series = provider.load_series(&PriceSeriesQuery {
        symbol: symbol.to_string(),
        from,
        autofetch,
    })?;
    let points = chart_points(&series, max_points);
    metrics::histogram!("nuvesta.chart.build_ms").record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("nuvesta.chart.points").set(points.len() as f64);

    Ok(PriceChart {
        symbol: symbol.to_string(),
        source_points: series.len(),
        points,
    })
}
