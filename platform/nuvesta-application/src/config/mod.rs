use nuvesta_domain::services::chart::DEFAULT_MAX_CHART_POINTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_SHARES: f64 = 1.0;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Http,
    Csv,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderConfig,
    pub chart: Option<ChartConfig>,
    pub purchase: Option<PurchaseConfig>,
    pub validation: Option<ValidationConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    pub csv_path: Option<String>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub autofetch: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    pub max_points: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PurchaseConfig {
    pub default_shares: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    pub max_duplicate_dates: Option<usize>,
    pub max_out_of_order: Option<usize>,
    pub max_invalid_price: Option<usize>,
}

impl Config {
    pub fn chart_max_points(&self) -> usize {
        self.chart
            .as_ref()
            .and_then(|chart| chart.max_points)
            .unwrap_or(DEFAULT_MAX_CHART_POINTS)
    }

    pub fn default_shares(&self) -> f64 {
        self.purchase
            .as_ref()
            .and_then(|purchase| purchase.default_shares)
            .unwrap_or(DEFAULT_SHARES)
    }

    pub fn autofetch(&self) -> bool {
        self.provider.autofetch.unwrap_or(true)
    }

    pub fn validation_limits(&self) -> ValidationConfig {
        self.validation.clone().unwrap_or_default()
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    check_config(&config)
        .map_err(|err| format!("invalid config {}: {}", path.display(), err))?;
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}

pub fn check_config(config: &Config) -> Result<(), String> {
    // provider.base_url may come from env at wiring time; csv_path may not.
    if config.provider.kind == ProviderKind::Csv {
        let has_path = config
            .provider
            .csv_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty());
        if !has_path {
            return Err("provider.csv_path is required when provider.kind = \"csv\"".to_string());
        }
    }

    if config.provider.timeout_ms == Some(0) {
        return Err("provider.timeout_ms must be > 0".to_string());
    }
    if config.chart_max_points() == 0 {
        return Err("chart.max_points must be > 0".to_string());
    }
    let shares = config.default_shares();
    if !shares.is_finite() || shares <= 0.0 {
        return Err("purchase.default_shares must be finite and > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_config(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
[provider]
kind = "http"
base_url = "http://localhost:8080"
timeout_ms = 2000
retries = 1
autofetch = false

[chart]
max_points = 250

[purchase]
default_shares = 1.5

[validation]
max_duplicate_dates = 0
max_out_of_order = 3
"#,
        );
        assert_eq!(config.provider.kind, ProviderKind::Http);
        assert_eq!(config.chart_max_points(), 250);
        assert!((config.default_shares() - 1.5).abs() < 1e-9);
        assert!(!config.autofetch());
        assert_eq!(config.validation_limits().max_out_of_order, Some(3));
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
[provider]
kind = "csv"
csv_path = "data/prices"
"#,
        );
        assert_eq!(config.chart_max_points(), DEFAULT_MAX_CHART_POINTS);
        assert!((config.default_shares() - DEFAULT_SHARES).abs() < 1e-9);
        assert!(config.autofetch());
        assert!(config.validation_limits().max_invalid_price.is_none());
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let err = toml::from_str::<Config>(
            r#"
[provider]
kind = "http"
base_url = "http://localhost:8080"
api_key = "nope"
"#,
        )
        .expect_err("unknown field");
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn check_config_requires_csv_path_for_csv_kind() {
        let http = parse_config("[provider]\nkind = \"http\"\n");
        assert!(check_config(&http).is_ok());

        let csv = parse_config("[provider]\nkind = \"csv\"\ncsv_path = \" \"\n");
        assert!(check_config(&csv).expect_err("no path").contains("csv_path"));
    }

    #[test]
    fn check_config_rejects_bad_limits() {
        let config = parse_config(
            "[provider]\nkind = \"csv\"\ncsv_path = \"x.csv\"\n[purchase]\ndefault_shares = 0.0\n",
        );
        assert!(check_config(&config)
            .expect_err("zero shares")
            .contains("default_shares"));

        let config = parse_config(
            "[provider]\nkind = \"csv\"\ncsv_path = \"x.csv\"\n[chart]\nmax_points = 0\n",
        );
        assert!(check_config(&config)
            .expect_err("zero points")
            .contains("max_points"));
    }

    #[test]
    fn config_round_trips_through_pretty_toml() {
        let config = parse_config("[provider]\nkind = \"csv\"\ncsv_path = \"x.csv\"\n");
        let rendered = to_toml_pretty(&config).expect("toml");
        let reparsed = parse_config(&rendered);
        assert_eq!(reparsed.provider.csv_path.as_deref(), Some("x.csv"));
    }

    #[test]
    fn sample_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/sample.toml");
        let (config, source) = load_config_with_source(&path).expect("sample config");
        assert_eq!(config.provider.kind, ProviderKind::Http);
        assert_eq!(config.validation_limits().max_invalid_price, Some(0));
        assert!(source.contains("[provider]"));
    }

    #[test]
    fn load_config_missing_file_returns_error() {
        let path = Path::new("/tmp/nuvesta-missing-config.toml");
        let err = load_config(path).expect_err("expected load to fail");
        assert!(err.contains("failed to read config"));
    }
}
