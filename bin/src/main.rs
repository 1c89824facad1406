//! tickroll CLI - streaming tick-to-OHLC candle aggregator.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tickroll_lib::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tickroll")]
#[command(about = "Streaming tick-to-OHLC candle aggregator", long_about = None)]
#[command(version)]
struct Cli {
    /// Symbols to simulate ticks for (comma-separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "AAPL,SBER,NVDA,TSLA"
    )]
    symbols: Vec<String>,

    /// Delay between tick batches, in milliseconds
    #[arg(long, default_value = "500")]
    delay_ms: u64,

    /// Standard deviation of one random-walk price step
    #[arg(long, default_value = "10.0")]
    factor: f64,

    /// Starting price for every symbol
    #[arg(long, default_value = "100.0")]
    start_price: f64,

    /// Directory the per-period candle logs are appended in
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Capacity of the channels between pipeline stages
    #[arg(long, default_value = "64")]
    capacity: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Irreversible for the rest of the process lifetime; every stage
    // and the generator observe it cooperatively.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, shutting down");
                cancel.cancel();
            }
        });
    }

    let config = GeneratorConfig {
        symbols: cli.symbols,
        start_price: cli.start_price,
        factor: cli.factor,
        delay: Duration::from_millis(cli.delay_ms),
        channel_capacity: cli.capacity,
    };
    tracing::info!(symbols = ?config.symbols, delay_ms = cli.delay_ms, "starting price generator");
    let ticks = PriceGenerator::new(config).spawn(cancel.clone());

    let sink = CsvSink::new(cli.out_dir);
    let mut pipeline = Pipeline::spawn(ticks, sink, &cancel, cli.capacity)?;

    // Drain the terminal 10-minute stream; the loop ends once the
    // pipeline has wound down after cancellation.
    while let Some(candle) = pipeline.recv().await {
        tracing::info!(
            symbol = %candle.symbol,
            period = %candle.period,
            window = %candle.window_start,
            open = candle.open,
            high = candle.high,
            low = candle.low,
            close = candle.close,
            "candle"
        );
    }
    pipeline.join().await;

    tracing::info!("exit");
    Ok(())
}
