//! Random-walk price generator.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tickroll_types::Tick;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Price floor for generated ticks; the walk never goes below this.
const PRICE_FLOOR: f64 = 0.01;

/// Configuration for the synthetic price generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Symbols to emit ticks for.
    pub symbols: Vec<String>,
    /// Starting price for every symbol's walk.
    pub start_price: f64,
    /// Standard deviation of one random-walk step.
    pub factor: f64,
    /// Delay between tick batches (one tick per symbol per batch).
    pub delay: Duration,
    /// Capacity of the outbound tick channel.
    pub channel_capacity: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string(), "SBER".to_string()],
            start_price: 100.0,
            factor: 10.0,
            delay: Duration::from_millis(500),
            channel_capacity: 64,
        }
    }
}

/// Gaussian random-walk price simulator.
///
/// Each interval it emits one tick per configured symbol, stepping
/// every symbol's price independently. Runs as its own task; stops
/// when cancelled or when the receiving side is dropped.
#[derive(Debug)]
pub struct PriceGenerator {
    config: GeneratorConfig,
    step: Normal<f64>,
    prices: HashMap<String, f64>,
}

impl PriceGenerator {
    /// Creates a generator from the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let prices = config
            .symbols
            .iter()
            .map(|symbol| (symbol.clone(), config.start_price))
            .collect();
        // Sanitized to a finite, positive std dev, so construction
        // cannot fail.
        let sigma = config.factor.abs().max(f64::EPSILON);
        let step = Normal::new(0.0, sigma).expect("finite non-negative std dev");
        Self {
            config,
            step,
            prices,
        }
    }

    /// Spawns the generator task and returns the tick receiver.
    pub fn spawn(mut self, cancel: CancellationToken) -> mpsc::Receiver<Tick> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let delay = self.config.delay.max(Duration::from_millis(1));
            let mut ticker = tokio::time::interval(delay);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        for tick in self.next_batch(&mut rng) {
                            tokio::select! {
                                _ = cancel.cancelled() => return,
                                sent = tx.send(tick) => {
                                    if sent.is_err() {
                                        // Downstream hung up.
                                        return;
                                    }
                                }
                            }
                        }
                    }
                }
            }
            tracing::debug!("tick source stopped");
        });

        rx
    }

    /// Steps every symbol's walk once, producing one tick each.
    fn next_batch(&mut self, rng: &mut impl Rng) -> Vec<Tick> {
        let now = Utc::now();
        self.config
            .symbols
            .iter()
            .map(|symbol| {
                let price = self
                    .prices
                    .entry(symbol.clone())
                    .or_insert(self.config.start_price);
                *price = (*price + self.step.sample(rng)).max(PRICE_FLOOR);
                Tick::new(symbol.clone(), *price, now)
            })
            .collect()
    }
}
