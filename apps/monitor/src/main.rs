//! Train fare monitor.
//!
//! Periodically checks configured routes for fares below a threshold,
//! persists every observation, and sends a text alert at most once per
//! (travel date, route, train) per dedup window.

mod config;

use clap::Parser;
use config::AppConfig;
use farewatch_alerts::{LogNotifier, Notifier, SmsConfig, SmsNotifier};
use farewatch_engine::MonitoringCycle;
use farewatch_source::{SessionOptions, SimulatedSource};
use farewatch_store::Store;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Fare monitor CLI.
#[derive(Parser, Debug)]
#[command(name = "farewatch")]
#[command(about = "Train fare monitor with SMS alerts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Run continuously at the configured interval (default: one cycle)
    #[arg(short, long, default_value_t = false)]
    monitor: bool,

    /// Price threshold in dollars (overrides config)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Minutes between cycles (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Travel dates to cover per cycle (overrides config)
    #[arg(long)]
    dates: Option<usize>,

    /// Database URL (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Show the source session instead of running it headless
    #[arg(long, default_value_t = false)]
    no_headless: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);
    let _ = dotenvy::dotenv();

    let mut app_config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %args.config.display(), error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };
    if let Some(threshold) = args.threshold {
        app_config.threshold_usd = threshold;
    }
    if let Some(interval) = args.interval {
        app_config.check_interval_minutes = interval;
    }
    if let Some(dates) = args.dates {
        app_config.dates_per_cycle = dates;
    }
    if let Some(database) = args.database {
        app_config.database_url = database;
    }
    if args.no_headless {
        app_config.headless = false;
    }

    let monitor_config = match app_config.to_monitor_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(
        threshold = %monitor_config.threshold,
        routes = monitor_config.routes.len(),
        dates = monitor_config.dates_per_cycle,
        "configuration loaded"
    );

    let store = match Store::connect(&app_config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!(url = %app_config.database_url, error = %e, "failed to open database");
            std::process::exit(1);
        }
    };

    let notifier: Box<dyn Notifier> = match SmsConfig::from_env() {
        Some(sms) => {
            info!("sms transport configured");
            Box::new(SmsNotifier::new(sms))
        }
        None => {
            warn!("sms transport not configured, alerts will only be logged");
            Box::new(LogNotifier)
        }
    };

    let headless = monitor_config.headless;
    let source = SimulatedSource::new(SessionOptions { headless });

    let mut cycle = MonitoringCycle::new(monitor_config, store, source, notifier);

    let shutdown = cycle.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, finishing current check");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    if args.monitor {
        cycle.run_forever().await;
    } else if let Err(e) = cycle.run_once().await {
        error!(error = %e, "monitoring cycle failed");
        std::process::exit(1);
    }
}
