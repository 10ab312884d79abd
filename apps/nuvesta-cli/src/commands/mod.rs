mod chart;
mod common;
mod quote;
mod validate;

use std::path::PathBuf;

pub enum Command {
    Quote {
        config: PathBuf,
        symbol: String,
        date: Option<String>,
        shares: Option<String>,
        json: bool,
    },
    Chart {
        config: PathBuf,
        symbol: String,
        from: Option<String>,
        max_points: Option<usize>,
        json: bool,
    },
    Validate {
        config: PathBuf,
        symbol: String,
        strict: bool,
    },
}

pub fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Quote {
            config,
            symbol,
            date,
            shares,
            json,
        } => quote::run_quote(config, symbol, date, shares, json),
        Command::Chart {
            config,
            symbol,
            from,
            max_points,
            json,
        } => chart::run_chart(config, symbol, from, max_points, json),
        Command::Validate {
            config,
            symbol,
            strict,
        } => validate::run_validate(config, symbol, strict),
    }
}
