use nuvesta_application::config::{Config, ProviderKind};

pub(super) fn print_config_summary(command: &str, config: &Config, json: bool) {
    let source = match config.provider.kind {
        ProviderKind::Http => format!(
            "http base_url={}",
            config
                .provider
                .base_url
                .as_deref()
                .unwrap_or("$NUVESTA_API_BASE")
        ),
        ProviderKind::Csv => format!(
            "csv path={}",
            config.provider.csv_path.as_deref().unwrap_or("?")
        ),
    };
    // JSON mode keeps stdout machine-readable.
    if json {
        tracing::info!(command, source = %source, "nuvesta cli");
    } else {
        eprintln!("nuvesta cli: {command} ({source}, autofetch={})", config.autofetch());
    }
}

pub(super) fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("failed to render JSON: {err}"))
}
