use nuvesta_application::backdated::{quote_backdated_purchase, BackdatedQuoteRequest};
use nuvesta_domain::services::purchase::{format_amount, QuoteOutcome};
use nuvesta_domain::value_objects::trade_date::format_trade_date;
use std::path::PathBuf;

pub(super) fn run_quote(
    config_path: PathBuf,
    symbol: String,
    date: Option<String>,
    shares: Option<String>,
    json: bool,
) -> Result<(), String> {
    let config = nuvesta_application::config::load_config(&config_path)?;
    super::common::print_config_summary("quote", &config, json);

    let provider = crate::infra::build_price_provider(&config)?;
    let request = BackdatedQuoteRequest {
        symbol: symbol.trim().to_uppercase(),
        date,
        shares: shares.unwrap_or_else(|| config.default_shares().to_string()),
        autofetch: config.autofetch(),
    };
    let report = quote_backdated_purchase(provider.as_ref(), &request)?;

    if json {
        println!("{}", super::common::to_pretty_json(&report)?);
        return Ok(());
    }

    match &report.outcome {
        // The no-data message is the advisory.
        QuoteOutcome::NoData { .. } => {}
        QuoteOutcome::InvalidShares {
            settlement_date,
            closing_price,
            ..
        } => {
            println!(
                "{} closing price on {}: {}",
                report.symbol,
                format_trade_date(*settlement_date),
                format_amount(*closing_price)
            );
            println!("shares must be a number greater than zero");
        }
        QuoteOutcome::Quoted(quote) => {
            println!(
                "{} closing price on {}: {}",
                report.symbol,
                format_trade_date(quote.settlement_date),
                format_amount(quote.closing_price)
            );
            println!("total cost: {}", format_amount(quote.total_cost));
        }
    }
    if let Some(advisory) = &report.advisory {
        println!("{advisory}");
    }
    if let Some(confirmation) = &report.confirmation {
        println!("{confirmation}");
    }
    Ok(())
}
