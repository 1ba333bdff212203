use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, warn};

use tax_cli::app;
use tax_cli::config::AppConfig;
use tax_cli::form::CalculatorForm;
use tax_cli::logging;
use tax_cli::state::{CalculatorScreen, ScreenState};
use tax_core::Currency;
use tax_core::services::Session;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Monthly income tax calculator.
///
/// Converts foreign-currency income to lari at the National Bank of Georgia
/// rate for the income date and prints the tax owed.
#[derive(Debug, Parser)]
#[command(name = "tax-calculator", version)]
struct Cli {
    /// Monthly income, in `--currency`. Commas are accepted as thousands separators.
    #[arg(long)]
    income: String,

    /// Tax rate in percent, e.g. `20`.
    #[arg(long)]
    percent: String,

    /// Currency the income was received in.
    #[arg(long, default_value = "USD", value_parser = parse_currency)]
    currency: Currency,

    /// Date the income was received (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// ID token of the signed-in user. Enables the server message and
    /// recording of calculations.
    #[arg(long)]
    token: Option<String>,

    /// Config file. Defaults to `tax-calculator.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend, overriding `storage.backend`.
    #[arg(long)]
    backend: Option<String>,

    /// Storage connection string, overriding the configured one.
    /// For SQLite this is a file path (e.g. `taxes.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `tax_core=trace`. `RUST_LOG` takes precedence.
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_currency(s: &str) -> Result<Currency, String> {
    Currency::parse(s).ok_or_else(|| {
        let known: Vec<_> = Currency::all().iter().map(Currency::as_str).collect();
        format!("unknown currency '{s}'; expected one of {}", known.join(", "))
    })
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    if !logging::env_filter_set() {
        logging::set_log_level(logging::resolve_level(
            cli.log_level.as_deref(),
            config.logging.level.as_deref(),
        ))?;
    }
    if let Some(file) = &config.logging.file {
        logging::enable_file_logging(file)?;
    }

    let session = Session::from_token(cli.token);

    let mut screen = CalculatorScreen::new(CalculatorForm::new(
        cli.date.unwrap_or_else(|| Local::now().date_naive()),
    ));
    screen.set_currency(cli.currency);
    screen.set_income(cli.income);
    screen.set_percent(cli.percent);

    if let Some(client) = app::build_message_client(&config) {
        screen.load_server_message(&session, &client).await;
    }
    if let Some(message) = screen.server_message() {
        println!("{message}");
    }

    if !screen.can_invoke() {
        eprintln!("Enter a positive income and tax percent to calculate.");
        return Ok(ExitCode::from(2));
    }

    let db_config = config.db_config(
        cli.backend.as_deref(),
        cli.db.as_deref(),
        session.token().map(str::to_string),
    )?;

    debug!("using {} storage", db_config.backend);
    let registry = app::build_registry();
    let sink = match app::open_sink(&registry, &db_config, &session).await {
        Ok(sink) => sink,
        Err(error) => {
            warn!(?error, "calculations will not be recorded");
            None
        }
    };

    let service = app::build_tax_service(&config, sink);
    let recording = screen
        .submit(&service, &session)
        .await
        .context("calculation could not start")?;

    let code = match screen.state() {
        ScreenState::Result(result) => {
            println!("{result}");
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Calculation failed; check the log and try again.");
            ExitCode::FAILURE
        }
    };

    if let Some(handle) = recording {
        logging::log_task_error(
            "record calculation",
            handle.await.map_err(anyhow::Error::from),
        );
    }

    Ok(code)
}
