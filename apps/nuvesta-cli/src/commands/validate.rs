use nuvesta_application::validation::validate_series;
use std::path::PathBuf;

pub(super) fn run_validate(config_path: PathBuf, symbol: String, strict: bool) -> Result<(), String> {
    let config = nuvesta_application::config::load_config(&config_path)?;
    super::common::print_config_summary("validate", &config, true);

    let provider = crate::infra::build_price_provider(&config)?;
    let report = validate_series(
        provider.as_ref(),
        &symbol.trim().to_uppercase(),
        &config.validation_limits(),
        strict,
        config.autofetch(),
    )?;

    println!("{}", super::common::to_pretty_json(&report)?);
    Ok(())
}
