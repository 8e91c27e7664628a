use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use core_types::{Candle, HorizonKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Fractal terminal backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Build(args) => handle_build(args).await,
        Commands::Validate(args) => handle_validate(args).await,
        Commands::Sample(args) => handle_sample(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Pattern-analog research terminal for BTC: focus packs over HTTP or on the
/// command line.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Build one focus pack and print it as JSON.
    Build(BuildArgs),
    /// Check the distribution length contract for every horizon.
    Validate(ValidateArgs),
    /// Write a synthetic BTC candle fixture for local use.
    Sample(SampleArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Parser)]
struct BuildArgs {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// The symbol to build for (only "BTC" is supported).
    #[arg(long, default_value = "BTC")]
    symbol: String,

    /// The focus horizon (7d, 14d, 30d, 90d, 180d, 365d).
    #[arg(long, default_value = "30d")]
    focus: String,
}

#[derive(Parser)]
struct ValidateArgs {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(long, default_value = "BTC")]
    symbol: String,
}

#[derive(Parser)]
struct SampleArgs {
    /// Where to write the fixture.
    #[arg(long, default_value = "data/btc_daily.json")]
    out: PathBuf,

    /// How many daily candles to generate.
    #[arg(long, default_value_t = 1500)]
    days: usize,

    /// Seed for a reproducible series.
    #[arg(long)]
    seed: Option<u64>,

    /// Price of the first candle.
    #[arg(long, default_value_t = 30_000.0)]
    start_price: f64,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = configuration::load_settings(&args.config)?;
    let state = web_server::build_state(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(addr, state).await
}

async fn handle_build(args: BuildArgs) -> anyhow::Result<()> {
    let config = configuration::load_settings(&args.config)?;
    let state = web_server::build_state(&config)?;

    let focus: HorizonKey = args.focus.parse().map_err(|_| {
        anyhow::anyhow!(
            "invalid horizon '{}' (valid: {})",
            args.focus,
            HorizonKey::valid_keys().join(", ")
        )
    })?;

    let pack = state.builder.build(&args.symbol, focus).await?;
    println!("{}", serde_json::to_string_pretty(&pack)?);
    Ok(())
}

async fn handle_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let config = configuration::load_settings(&args.config)?;
    let state = web_server::build_state(&config)?;

    let report = state.builder.validate(&args.symbol).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.ok {
        anyhow::bail!("{}", report.message);
    }
    Ok(())
}

/// Generates a geometric random walk with occasional trend flips, enough
/// like real BTC history that the matcher finds non-trivial analogs.
fn handle_sample(args: SampleArgs) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start_ts = Utc::now() - Duration::days(args.days as i64);
    let mut close = args.start_price;
    let mut drift: f64 = 0.0005;
    let mut candles = Vec::with_capacity(args.days);

    for i in 0..args.days {
        // Flip the regime every so often so phases and drawdowns show up.
        if rng.gen_bool(0.01) {
            drift = -drift;
        }
        let open = close;
        let ret = drift + rng.gen_range(-0.035..0.035);
        close = (open * (1.0 + ret)).max(1.0);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

        candles.push(Candle {
            timestamp: start_ts + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(5_000.0..50_000.0),
        });
    }

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.out, serde_json::to_string(&candles)?)?;
    tracing::info!(
        candles = candles.len(),
        path = %args.out.display(),
        "Wrote synthetic candle fixture."
    );
    Ok(())
}
