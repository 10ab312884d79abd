use crate::services::as_of::MatchResult;
use crate::value_objects::trade_date::format_trade_date;
use chrono::NaiveDate;
use serde::Serialize;

pub const NO_DATA_MESSAGE: &str =
    "No historical price data is available for the selected date yet.";

/// Share counts may be fractional but must be finite and strictly positive.
pub fn parse_share_count(value: &str) -> Option<f64> {
    let shares: f64 = value.trim().parse().ok()?;
    is_valid_share_count(shares).then_some(shares)
}

fn is_valid_share_count(shares: f64) -> bool {
    shares.is_finite() && shares > 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseQuote {
    pub requested_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub closing_price: f64,
    pub shares: f64,
    pub total_cost: f64,
    pub exact_match: bool,
}

impl PurchaseQuote {
    pub fn advisory(&self) -> Option<String> {
        inexact_match_advisory(self.requested_date, self.settlement_date, self.exact_match)
    }

    pub fn confirmation(&self) -> String {
        let context = if self.settlement_date == self.requested_date {
            format_trade_date(self.settlement_date)
        } else {
            format!(
                "{} (last trading day before {})",
                format_trade_date(self.settlement_date),
                format_trade_date(self.requested_date)
            )
        };
        format!(
            "Mock purchase saved: {:.4} shares on {} for {} total.",
            self.shares,
            context,
            format_amount(self.total_cost)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    /// Nothing on or before the requested date, or no usable date at all.
    NoData { requested_date: Option<NaiveDate> },
    /// A price exists but the share count cannot be used, so no cost is shown.
    InvalidShares {
        requested_date: NaiveDate,
        settlement_date: NaiveDate,
        closing_price: f64,
        exact_match: bool,
    },
    Quoted(PurchaseQuote),
}

impl QuoteOutcome {
    pub fn is_quoted(&self) -> bool {
        matches!(self, QuoteOutcome::Quoted(_))
    }

    pub fn quote(&self) -> Option<&PurchaseQuote> {
        match self {
            QuoteOutcome::Quoted(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuoteOutcome::NoData { .. } => "no_data",
            QuoteOutcome::InvalidShares { .. } => "invalid_shares",
            QuoteOutcome::Quoted(_) => "quoted",
        }
    }

    pub fn advisory(&self) -> Option<String> {
        match self {
            QuoteOutcome::NoData { .. } => Some(NO_DATA_MESSAGE.to_string()),
            QuoteOutcome::InvalidShares {
                requested_date,
                settlement_date,
                exact_match,
                ..
            } => inexact_match_advisory(*requested_date, *settlement_date, *exact_match),
            QuoteOutcome::Quoted(quote) => quote.advisory(),
        }
    }
}

fn inexact_match_advisory(
    requested: NaiveDate,
    settlement: NaiveDate,
    exact_match: bool,
) -> Option<String> {
    if exact_match {
        return None;
    }
    Some(format!(
        "No data for {}; using {}, the most recent trading day.",
        format_trade_date(requested),
        format_trade_date(settlement)
    ))
}

/// Prices a backdated purchase. The match signal is checked before any cost
/// is computed.
pub fn quote(
    requested_date: Option<NaiveDate>,
    matched: Option<&MatchResult>,
    shares: Option<f64>,
) -> QuoteOutcome {
    let Some(requested_date) = requested_date else {
        return QuoteOutcome::NoData {
            requested_date: None,
        };
    };
    let Some((matched, settlement_date)) =
        matched.and_then(|m| m.settlement_date().map(|date| (m, date)))
    else {
        return QuoteOutcome::NoData {
            requested_date: Some(requested_date),
        };
    };

    let closing_price = matched.point.price;
    match shares.filter(|s| is_valid_share_count(*s)) {
        Some(shares) => QuoteOutcome::Quoted(PurchaseQuote {
            requested_date,
            settlement_date,
            closing_price,
            shares,
            total_cost: shares * closing_price,
            exact_match: matched.exact_match,
        }),
        None => QuoteOutcome::InvalidShares {
            requested_date,
            settlement_date,
            closing_price,
            exact_match: matched.exact_match,
        },
    }
}

/// Two fraction digits with `,` thousands grouping.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 && fixed != "0.00" {
        grouped.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}
