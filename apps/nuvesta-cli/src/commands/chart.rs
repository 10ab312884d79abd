use nuvesta_application::charting::build_price_chart;
use nuvesta_domain::services::purchase::format_amount;
use nuvesta_domain::value_objects::trade_date::parse_trade_date;
use std::path::PathBuf;

pub(super) fn run_chart(
    config_path: PathBuf,
    symbol: String,
    from: Option<String>,
    max_points: Option<usize>,
    json: bool,
) -> Result<(), String> {
    let config = nuvesta_application::config::load_config(&config_path)?;
    super::common::print_config_summary("chart", &config, json);

    let from = match from.as_deref() {
        Some(raw) => Some(
            parse_trade_date(raw).ok_or_else(|| format!("invalid --from date (YYYY-MM-DD): {raw}"))?,
        ),
        None => None,
    };

    let provider = crate::infra::build_price_provider(&config)?;
    let chart = build_price_chart(
        provider.as_ref(),
        &symbol.trim().to_uppercase(),
        from,
        max_points.unwrap_or_else(|| config.chart_max_points()),
        config.autofetch(),
    )?;

    if json {
        println!("{}", super::common::to_pretty_json(&chart)?);
        return Ok(());
    }

    println!(
        "{}: {} of {} points",
        chart.symbol,
        chart.points.len(),
        chart.source_points
    );
    for point in &chart.points {
        println!("{}  {}", point.date_label, format_amount(point.price));
    }
    Ok(())
}
