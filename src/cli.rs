//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::coords::resolve_coords_for_state;
use crate::domain::error::MandiError;
use crate::domain::filters::get_available_filters;
use crate::domain::intelligence::{SharedDataPort, market_intelligence};
use crate::domain::pagination::{DEFAULT_PAGE_SIZE, get_market_records, validate_page};
use crate::domain::series::validate_days;
use crate::domain::settings::{
    DEFAULT_COMMODITY, DEFAULT_DAYS, DEFAULT_LISTEN, DEFAULT_REGION, RequestDefaults, Settings,
};
use crate::domain::signal_config::SignalConfig;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "mandisignal",
    about = "Mandi price signals and trade recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// INI config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Dataset directory, overrides [data] dir
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price card, signals and recommendation for one market
    Intelligence {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        commodity: Option<String>,
        #[arg(long)]
        days: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Paged price records, most recent first
    Records {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        commodity: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Available states, districts and commodities
    Filters {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
    },
    /// Representative coordinates for a region
    Coords {
        #[arg(long)]
        region: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        listen: Option<String>,
    },
}

/// Structured diagnostics go to stderr; `MANDI_LOG_FORMAT=json` switches
/// to JSON lines. Level comes from `RUST_LOG`, default `info`.
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let json = std::env::var("MANDI_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("warning: logging already initialised: {e}");
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Intelligence {
            source,
            region,
            commodity,
            days,
            json,
        } => run_intelligence(&source, region, commodity, days, json),
        Command::Records {
            source,
            region,
            commodity,
            page,
            page_size,
            json,
        } => run_records(&source, region, commodity, page, page_size, json),
        Command::Filters { source, json } => run_filters(&source, json),
        Command::Coords { region } => run_coords(&region),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { source, listen } => run_serve(&source, listen),
    }
}

fn report(err: MandiError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, MandiError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn build_signal_config(config: &dyn ConfigPort) -> SignalConfig {
    let defaults = SignalConfig::default();
    SignalConfig {
        momentum_threshold: config.get_double(
            "signals",
            "momentum_threshold",
            defaults.momentum_threshold,
        ),
        volatility_low: config.get_double("signals", "volatility_low", defaults.volatility_low),
        volatility_high: config.get_double("signals", "volatility_high", defaults.volatility_high),
    }
}

/// Validate `config` and resolve it into settings.
pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, MandiError> {
    validate_config(config)?;

    let string_or = |section: &str, key: &str, default: &str| {
        config
            .get_string(section, key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    Ok(Settings {
        data_dir: PathBuf::from(string_or("data", "dir", "data")),
        preload: config.get_bool("data", "preload", false),
        signals: build_signal_config(config),
        defaults: RequestDefaults {
            region: string_or("defaults", "region", DEFAULT_REGION),
            commodity: string_or("defaults", "commodity", DEFAULT_COMMODITY),
            days: config.get_int("defaults", "days", DEFAULT_DAYS as i64) as usize,
            page_size: config.get_int("defaults", "page_size", DEFAULT_PAGE_SIZE as i64) as usize,
        },
        listen: string_or("web", "listen", DEFAULT_LISTEN),
    })
}

pub fn resolve_settings(source: &SourceArgs) -> Result<Settings, MandiError> {
    let config = load_config(source.config.as_ref())?;
    let mut settings = build_settings(&config)?;
    if let Some(dir) = &source.data_dir {
        settings.data_dir = dir.clone();
    }
    Ok(settings)
}

fn open_store(settings: &Settings) -> SharedDataPort {
    Arc::new(CsvAdapter::new(settings.data_dir.clone()))
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to encode output: {e}");
            ExitCode::from(1)
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, MandiError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(MandiError::from)
}

fn run_intelligence(
    source: &SourceArgs,
    region: Option<String>,
    commodity: Option<String>,
    days: Option<usize>,
    json: bool,
) -> ExitCode {
    let settings = match resolve_settings(source) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    let region = region.unwrap_or_else(|| settings.defaults.region.clone());
    let commodity = commodity.unwrap_or_else(|| settings.defaults.commodity.clone());
    let days = match validate_days(days.unwrap_or(settings.defaults.days)) {
        Ok(d) => d,
        Err(e) => return report(e),
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => return report(e),
    };
    let port = open_store(&settings);
    let intel = match rt.block_on(market_intelligence(
        port,
        &region,
        &commodity,
        days,
        &settings.signals,
    )) {
        Ok(i) => i,
        Err(e) => return report(e),
    };

    let summary = intel.summary();
    if json {
        return print_json(&summary);
    }

    println!("=== {} / {} ({} days) ===", summary.commodity, summary.region, days);
    match (&summary.date, summary.modal_price) {
        (Some(date), Some(modal)) => {
            println!(
                "Latest:        {} at {} (modal {:.2}, range {:.2}-{:.2})",
                date,
                summary.market.as_deref().unwrap_or("-"),
                modal,
                summary.min_price.unwrap_or_default(),
                summary.max_price.unwrap_or_default(),
            );
        }
        _ => println!("Latest:        no records"),
    }
    println!("Trend:         {}", summary.trend);
    println!("Buyer signal:  {}", summary.buyer_signal);
    println!("Risk level:    {}", summary.risk_level);
    println!(
        "Momentum:      {} ({:+.2}%)",
        summary.momentum, summary.price_change_pct
    );
    println!(
        "Recommendation: {} ({}% confidence)",
        summary.recommendation, summary.confidence
    );
    println!("  {}", summary.reason);

    if let Some(chart) = &summary.chart {
        println!("\nPrice series:");
        for point in chart {
            println!("  {}  {:>10.2}", point.date, point.price);
        }
    }
    ExitCode::SUCCESS
}

fn run_records(
    source: &SourceArgs,
    region: Option<String>,
    commodity: Option<String>,
    page: usize,
    page_size: Option<usize>,
    json: bool,
) -> ExitCode {
    let settings = match resolve_settings(source) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    let region = region.unwrap_or_else(|| settings.defaults.region.clone());
    let commodity = commodity.unwrap_or_else(|| settings.defaults.commodity.clone());
    let (page, page_size) =
        match validate_page(page, page_size.unwrap_or(settings.defaults.page_size)) {
            Ok(p) => p,
            Err(e) => return report(e),
        };

    let port = open_store(&settings);
    let result = match get_market_records(port.as_ref(), &region, &commodity, page, page_size) {
        Ok(r) => r,
        Err(e) => return report(e),
    };

    if json {
        return print_json(&result);
    }

    for rec in &result.records {
        println!(
            "{}  {:<20} {:>10.2} {:>10.2} {:>10.2}  {}",
            rec.date,
            rec.market,
            rec.min_price,
            rec.max_price,
            rec.modal_price,
            rec.arrivals
                .map(|a| format!("{a:.2}"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    eprintln!(
        "Page {} of {} ({} records total)",
        result.page, result.total_pages, result.total
    );
    ExitCode::SUCCESS
}

fn run_filters(source: &SourceArgs, json: bool) -> ExitCode {
    let settings = match resolve_settings(source) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    let port = open_store(&settings);
    let catalog = match get_available_filters(port.as_ref()) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    if json {
        return print_json(&catalog);
    }

    if catalog.is_empty() {
        eprintln!("No datasets found in {}", settings.data_dir.display());
        return ExitCode::SUCCESS;
    }
    for (state, districts) in &catalog.states {
        let districts: Vec<&str> = districts.iter().map(String::as_str).collect();
        println!("{}: {}", state, districts.join(", "));
    }
    println!(
        "\nCommodities: {}",
        catalog
            .commodities
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    ExitCode::SUCCESS
}

fn run_coords(region: &str) -> ExitCode {
    let coords = resolve_coords_for_state(region);
    println!("{:.4},{:.4}", coords.lat, coords.lon);
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(Some(config_path)) {
        Ok(c) => c,
        Err(e) => return report(e),
    };
    let settings = match build_settings(&config) {
        Ok(s) => s,
        Err(e) => return report(e),
    };

    eprintln!("Data directory:     {}", settings.data_dir.display());
    eprintln!(
        "Momentum threshold: {:.2}%",
        settings.signals.momentum_threshold * 100.0
    );
    eprintln!(
        "Volatility bands:   <{:.2} Low, >={:.2} High",
        settings.signals.volatility_low, settings.signals.volatility_high
    );
    eprintln!(
        "Defaults:           {} / {} / {} days / {} per page",
        settings.defaults.region,
        settings.defaults.commodity,
        settings.defaults.days,
        settings.defaults.page_size
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_serve(source: &SourceArgs, listen: Option<String>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;

        let mut settings = match resolve_settings(source) {
            Ok(s) => s,
            Err(e) => return report(e),
        };
        if let Some(listen) = listen {
            settings.listen = listen;
        }
        let addr: SocketAddr = match settings.listen.parse() {
            Ok(a) => a,
            Err(_) => {
                return report(MandiError::invalid_request(format!(
                    "'{}' is not a socket address",
                    settings.listen
                )));
            }
        };

        let rt = match runtime() {
            Ok(rt) => rt,
            Err(e) => return report(e),
        };

        let data_port = open_store(&settings);
        if settings.preload {
            match get_available_filters(data_port.as_ref()) {
                Ok(catalog) => tracing::info!(
                    states = catalog.states.len(),
                    commodities = catalog.commodities.len(),
                    "datasets preloaded"
                ),
                Err(e) => return report(e),
            }
        }

        let state = AppState {
            data_port,
            settings,
        };
        let router = build_router(state);

        let served = rt.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "listening");
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(MandiError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (source, listen);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
