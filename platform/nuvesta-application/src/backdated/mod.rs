use chrono::NaiveDate;
use nuvesta_domain::repositories::price_series::{PriceSeriesProvider, PriceSeriesQuery};
use nuvesta_domain::services::as_of::{MatchResult, SortedSeries};
use nuvesta_domain::services::purchase::{parse_share_count, quote, QuoteOutcome};
use nuvesta_domain::value_objects::trade_date::parse_trade_date;
use serde::Serialize;
use std::time::Instant;
use tracing::info_span;

#[derive(Debug, Clone)]
pub struct BackdatedQuoteRequest {
    pub symbol: String,
    /// `YYYY-MM-DD`; `None` means the latest trading day in the series.
    pub date: Option<String>,
    pub shares: String,
    pub autofetch: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackdatedQuoteReport {
    pub symbol: String,
    pub observations: usize,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    pub matched: Option<MatchResult>,
    pub outcome: QuoteOutcome,
    pub advisory: Option<String>,
    pub confirmation: Option<String>,
}

pub fn quote_backdated_purchase(
    provider: &dyn PriceSeriesProvider,
    request: &BackdatedQuoteRequest,
) -> Result<BackdatedQuoteReport, String> {
    let _span = info_span!(
        "quote",
        symbol = %request.symbol,
        date = request.date.as_deref().unwrap_or("latest"),
        shares = %request.shares
    )
    .entered();

    let stage_start = Instant::now();
    let points = provider.load_series(&PriceSeriesQuery {
        symbol: request.symbol.clone(),
        from: None,
        autofetch: request.autofetch,
    })?;
    metrics::histogram!("nuvesta.quote.load_series_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    let series = SortedSeries::from_unsorted(points);
    let requested_date = match request.date.as_deref() {
        Some(raw) => parse_trade_date(raw),
        None => series.last_date(),
    };
    if request.date.is_some() && requested_date.is_none() {
        tracing::debug!("requested date is not a YYYY-MM-DD calendar date");
    }

    let matched = series.as_of(requested_date);
    let outcome = quote(
        requested_date,
        matched.as_ref(),
        parse_share_count(&request.shares),
    );
    metrics::counter!("nuvesta.quote.outcome_total", "outcome" => outcome.label()).increment(1);
    tracing::info!(
        observations = series.len(),
        outcome = outcome.label(),
        exact_match = ?matched.map(|m| m.exact_match),
        "backdated quote computed"
    );

    Ok(BackdatedQuoteReport {
        symbol: request.symbol.clone(),
        observations: series.len(),
        earliest_date: series.first_date(),
        latest_date: series.last_date(),
        matched,
        advisory: outcome.advisory(),
        confirmation: outcome.quote().map(|q| q.confirmation()),
        outcome,
    })
}
