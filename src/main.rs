//! WAGERLOG — local sports wager ledger
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the ledger, runs one command (or the web form) and closes the
//! ledger on the way out.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;
use tracing::info;

use wagerlog::config::{self, AppConfig};
use wagerlog::dashboard::{self, DashboardState};
use wagerlog::ledger::Ledger;
use wagerlog::report;
use wagerlog::storage::SqliteLedger;
use wagerlog::types::WagerForm;

const CHART_WIDTH: usize = 40;

/// Log sports wagers and track profit/loss.
#[derive(Parser)]
#[command(name = "wagerlog", version, about = "Log sports wagers and track profit/loss")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,

    /// Database file (overrides config and WAGERLOG_DB)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a settled wager
    Add {
        /// Sport (Football, Basketball, Hockey, Baseball or any label)
        #[arg(long)]
        sport: Option<String>,
        /// Amount staked
        #[arg(long)]
        stake: String,
        /// Decimal odds (greater than 1)
        #[arg(long)]
        odds: String,
        /// Win or Loss
        #[arg(long)]
        outcome: String,
        /// Bet type (Moneyline, Total, Spread or any label)
        #[arg(long)]
        bet_type: Option<String>,
    },

    /// Show win/loss totals and win percentage
    Stats,

    /// List every wager with its profit
    History,

    /// Bar chart of total stake by bet type
    Chart,

    /// Delete every wager
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Run the local web form
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(&cli.config)?;

    init_logging(&cfg);

    let db_path = cli.db.clone().unwrap_or_else(|| cfg.database_path());
    let ledger = Ledger::new(Box::new(SqliteLedger::open(&db_path).await?));

    match cli.command {
        Commands::Serve { port } => {
            let mut addr = cfg.dashboard_addr()?;
            if let Some(port) = port {
                addr.set_port(port);
            }
            let state = Arc::new(DashboardState::new(ledger, &cfg.form));
            let result = dashboard::serve(state.clone(), addr, shutdown_signal()).await;
            state.ledger.close().await;
            result
        }
        command => {
            let result = run_command(command, &ledger, &cfg).await;
            ledger.close().await;
            result
        }
    }
}

/// Run a single non-server command against an open ledger.
async fn run_command(command: Commands, ledger: &Ledger, cfg: &AppConfig) -> Result<()> {
    let currency = cfg.form.currency_symbol.as_str();

    match command {
        Commands::Add { sport, stake, odds, outcome, bet_type } => {
            let form = WagerForm {
                sport: sport.unwrap_or_else(|| cfg.form.default_sport.clone()),
                stake,
                odds,
                outcome,
                bet_type: bet_type.unwrap_or_else(|| cfg.form.default_bet_type.clone()),
            };
            let wager = ledger.add(&form).await?;
            println!("Added {} bet on {}", wager.record.bet_type, wager.record.sport);
        }
        Commands::Stats => match ledger.summary().await? {
            Some(summary) => println!("{}", report::format_summary(&summary, currency)),
            None => println!("{}", report::NO_STATS),
        },
        Commands::History => match ledger.history().await? {
            Some(history) => {
                let color = std::io::stdout().is_terminal();
                println!("{}", report::format_history(&history, currency, color));
            }
            None => println!("{}", report::NO_HISTORY),
        },
        Commands::Chart => match ledger.totals_by_bet_type().await? {
            Some(totals) => println!("{}", report::format_bar_chart(&totals, currency, CHART_WIDTH)),
            None => println!("{}", report::NO_CHART),
        },
        Commands::Clear { yes } => {
            if !yes && !confirm("Are you sure you want to clear all bet data?")? {
                println!("Nothing was cleared.");
                return Ok(());
            }
            let removed = ledger.clear().await?;
            info!(removed, "Clear requested from CLI");
            println!("All bet data has been cleared.");
        }
        Commands::Serve { .. } => bail!("serve is handled by main"),
    }

    Ok(())
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber. Logs go to stderr.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wagerlog={}", cfg.logging.level)));

    let json_logging = std::env::var("WAGERLOG_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
