use nuvesta_application::config::{Config, ProviderKind, DEFAULT_RETRIES, DEFAULT_TIMEOUT_MS};
use nuvesta_domain::repositories::price_series::PriceSeriesProvider;
use nuvesta_infrastructure::market_data::{CsvPriceSeriesProvider, HttpPriceSeriesProvider};
use std::env;

pub fn build_price_provider(config: &Config) -> Result<Box<dyn PriceSeriesProvider>, String> {
    match config.provider.kind {
        ProviderKind::Http => {
            let base_url = resolve_base_url(config)?;
            let provider = HttpPriceSeriesProvider::new(
                base_url.clone(),
                config.provider.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
                config.provider.retries.unwrap_or(DEFAULT_RETRIES),
            )
            .map_err(|err| format!("failed to init price client (url={base_url}): {err}"))?;
            Ok(Box::new(provider))
        }
        ProviderKind::Csv => {
            let path = config
                .provider
                .csv_path
                .as_deref()
                .ok_or_else(|| "missing provider.csv_path in config".to_string())?;
            Ok(Box::new(CsvPriceSeriesProvider::new(path)))
        }
    }
}

fn resolve_base_url(config: &Config) -> Result<String, String> {
    match config.provider.base_url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        _ => env::var("NUVESTA_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                "missing provider.base_url in config and env NUVESTA_API_BASE is not set"
                    .to_string()
            }),
    }
}
