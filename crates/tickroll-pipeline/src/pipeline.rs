//! Pipeline composition over bounded channels.

use tickroll_aggregate::{RollupStage, WatermarkStage};
use tickroll_sink::CandleSink;
use tickroll_types::{Candle, Period, Result, Tick};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default capacity of the channels between stages.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// The composed three-stage aggregation pipeline.
///
/// Owns the terminal 10-minute candle receiver and the stage task
/// handles. The pipeline winds down when the tick input closes or the
/// cancellation token fires; either way every stage closes its output
/// and the terminal receiver drains to `None`.
#[derive(Debug)]
pub struct Pipeline {
    candles: mpsc::Receiver<Candle>,
    tasks: Vec<JoinHandle<()>>,
}

impl Pipeline {
    /// Spawns the three chained stage tasks over the given tick input.
    ///
    /// Every stage appends each candle it emits to `sink` before
    /// forwarding it downstream; the only suspension points in a stage
    /// are the channel receive and send, so a slow consumer
    /// back-pressures the whole chain.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a roll-up stage cannot be
    /// constructed; nothing is spawned in that case.
    pub fn spawn<S>(
        ticks: mpsc::Receiver<Tick>,
        sink: S,
        cancel: &CancellationToken,
        capacity: usize,
    ) -> Result<Self>
    where
        S: CandleSink + Clone + 'static,
    {
        // Validate the whole chain before spawning anything.
        let mut base = WatermarkStage::new(Period::Minute1);
        let mut to_2m = RollupStage::new(Period::Minute2)?;
        let mut to_10m = RollupStage::new(Period::Minute10)?;
        let capacity = capacity.max(1);

        let (candles_1m, base_task) = spawn_stage(
            ticks,
            move |tick| base.process(tick),
            sink.clone(),
            cancel.clone(),
            capacity,
        );
        let (candles_2m, rollup_2m_task) = spawn_stage(
            candles_1m,
            move |candle| to_2m.process(candle).into_iter().collect(),
            sink.clone(),
            cancel.clone(),
            capacity,
        );
        let (candles_10m, rollup_10m_task) = spawn_stage(
            candles_2m,
            move |candle| to_10m.process(candle).into_iter().collect(),
            sink,
            cancel.clone(),
            capacity,
        );

        Ok(Self {
            candles: candles_10m,
            tasks: vec![base_task, rollup_2m_task, rollup_10m_task],
        })
    }

    /// Receives the next terminal (10-minute) candle, or `None` once
    /// the pipeline has wound down.
    pub async fn recv(&mut self) -> Option<Candle> {
        self.candles.recv().await
    }

    /// Waits for every stage task to finish.
    pub async fn join(self) {
        drop(self.candles);
        for joined in futures::future::join_all(self.tasks).await {
            if let Err(error) = joined {
                tracing::error!(%error, "stage task panicked");
            }
        }
    }
}

/// Runs one aggregation stage as a task.
///
/// The stage consumes records from `input`, persists every completed
/// candle through the sink (a write failure is logged and does not
/// suppress downstream emission), and sends it on the returned
/// channel. The task ends when the input closes, the downstream
/// receiver drops, or cancellation fires; un-flushed windows are
/// abandoned, not force-flushed.
fn spawn_stage<I, F, S>(
    mut input: mpsc::Receiver<I>,
    mut step: F,
    sink: S,
    cancel: CancellationToken,
    capacity: usize,
) -> (mpsc::Receiver<Candle>, JoinHandle<()>)
where
    I: Send + 'static,
    F: FnMut(&I) -> Vec<Candle> + Send + 'static,
    S: CandleSink + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);

    let task = tokio::spawn(async move {
        loop {
            let record = tokio::select! {
                _ = cancel.cancelled() => break,
                received = input.recv() => match received {
                    Some(record) => record,
                    None => break,
                },
            };

            for candle in step(&record) {
                if let Err(error) = sink.append(&candle) {
                    tracing::warn!(
                        symbol = %candle.symbol,
                        period = %candle.period,
                        %error,
                        "failed to persist candle"
                    );
                }
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    sent = tx.send(candle) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    });

    (rx, task)
}
