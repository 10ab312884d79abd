mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand};
use commands::Command;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nuvesta")]
#[command(about = "Nuvesta backdated pricing CLI", version, arg_required_else_help = true)]
#[command(
    after_help = "Examples:\n  nuvesta quote --config configs/sample.toml --symbol AAPL --date 2024-01-04 --shares 2.5\n  nuvesta chart --config configs/sample.toml --symbol AAPL --max-points 200 --json\n  nuvesta validate --config configs/sample.toml --symbol AAPL --strict\n"
)]
struct Cli {
    /// Log filter (overridden by env NUVESTA_LOG).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Log format: text | json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
    /// Expose Prometheus metrics on host:port.
    #[arg(long, global = true)]
    metrics_addr: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Price a backdated purchase at the last close on or before --date.
    Quote {
        #[arg(long, env = "NUVESTA_CONFIG")]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Purchase date (YYYY-MM-DD). Defaults to the latest trading day.
        #[arg(long)]
        date: Option<String>,
        /// Shares to buy, decimals allowed. Defaults to purchase.default_shares.
        #[arg(long)]
        shares: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the price history downsampled for charting.
    Chart {
        #[arg(long, env = "NUVESTA_CONFIG")]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Only observations strictly after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        max_points: Option<usize>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Report price-series data quality.
    Validate {
        #[arg(long, env = "NUVESTA_CONFIG")]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init_tracing(&cli.log_level, &cli.log_format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let command = match cli.command {
        CliCommand::Quote {
            config,
            symbol,
            date,
            shares,
            json,
        } => Command::Quote {
            config,
            symbol,
            date,
            shares,
            json,
        },
        CliCommand::Chart {
            config,
            symbol,
            from,
            max_points,
            json,
        } => Command::Chart {
            config,
            symbol,
            from,
            max_points,
            json,
        },
        CliCommand::Validate {
            config,
            symbol,
            strict,
        } => Command::Validate {
            config,
            symbol,
            strict,
        },
    };

    if let Err(err) = commands::run(command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
