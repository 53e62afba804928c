//! PARLAY: daily best-hit-rate parlay builder
//!
//! Entry point. Loads configuration, initialises structured logging and
//! dispatches the `generate`, `history` and `run` commands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use parlay::config::AppConfig;
use parlay::dashboard::{self, DashboardState};
use parlay::data::odds_api::OddsApiClient;
use parlay::data::MarketDataSource;
use parlay::engine::builder::today;
use parlay::engine::cycle::{run_generation, GenerationReport};
use parlay::engine::ParlayEngine;
use parlay::history::{format_history, format_parlays};
use parlay::storage::ParlayStore;

#[derive(Debug, Parser)]
#[command(name = "parlay", version, about = "Build one high-hit-rate parlay per sportsbook per day")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build today's parlays for every configured bookmaker and save them.
    Generate,
    /// Show the most recent saved parlays.
    History {
        /// How many records to show (defaults to `history.limit`).
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Generate on a fixed interval (and serve the dashboard) until Ctrl+C.
    Run,
}

/// Everything a command needs, built once from config.
struct App {
    cfg: AppConfig,
    store: ParlayStore,
    engine: Arc<ParlayEngine>,
}

impl App {
    async fn new(cfg: AppConfig) -> Result<Self> {
        let store = ParlayStore::connect(&cfg.storage.database_url).await?;
        let engine = Arc::new(ParlayEngine::new(
            Arc::from(cfg.estimator.build()),
            cfg.selection,
        ));
        Ok(Self { cfg, store, engine })
    }

    fn source(&self) -> Result<Arc<dyn MarketDataSource>> {
        let key = self.cfg.odds_api_key()?;
        Ok(Arc::new(OddsApiClient::new(key, &self.cfg.odds_api)?))
    }

    async fn generate(&self, source: &dyn MarketDataSource) -> Result<GenerationReport> {
        run_generation(
            source,
            &self.engine,
            Some(&self.store),
            &self.cfg.odds_api.sports,
            &self.cfg.odds_api.bookmakers,
            today(),
        )
        .await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;

    init_logging();

    info!(
        max_legs = cfg.selection.max_legs,
        min_odds = cfg.selection.min_combined_decimal_odds,
        estimator = ?cfg.estimator.kind,
        bookmakers = ?cfg.odds_api.bookmakers,
        "PARLAY starting up"
    );

    let app = App::new(cfg).await?;

    match cli.command {
        Command::Generate => {
            let source = app.source()?;
            let report = app.generate(source.as_ref()).await?;
            println!("{}", render_report(&report));
        }
        Command::History { limit } => {
            let limit = limit.unwrap_or(app.cfg.history.limit);
            let records = app.store.recent(limit).await?;
            println!("{}", format_history(&records));
        }
        Command::Run => run_scheduled(&app).await?,
    }

    Ok(())
}

fn render_report(report: &GenerationReport) -> String {
    format_parlays(report.records().into_iter().map(|r| &r.result))
}

/// Generate every `schedule.interval_hours` until Ctrl+C.
async fn run_scheduled(app: &App) -> Result<()> {
    let source = app.source()?;

    if app.cfg.dashboard.enabled {
        let state = Arc::new(DashboardState::new(
            app.store.clone(),
            app.engine.clone(),
            source.clone(),
            app.cfg.odds_api.sports.clone(),
            app.cfg.odds_api.bookmakers.clone(),
            app.cfg.history.limit,
        ));
        dashboard::spawn_dashboard(state, app.cfg.dashboard.port).await?;
    }

    let period = Duration::from_secs(app.cfg.schedule.interval_hours * 3600);
    let mut interval = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_hours = app.cfg.schedule.interval_hours,
        "Entering schedule loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match app.generate(source.as_ref()).await {
                    Ok(report) => info!("\n{}", render_report(&report)),
                    Err(e) => error!(error = %e, "Generation failed, retrying next interval"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("PARLAY shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parlay=info"));

    let json_logging = std::env::var("PARLAY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
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
