#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code so a bad catalogue or config is reported,
// not panicked on. Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use rand::Rng;
use simulator::{
    BroadcastSink, RecordedTick, Simulation, catalogue::sample_pod, config::SimConfig,
};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How many ticks a slow consumer may fall behind before it starts skipping.
const SINK_CAPACITY: usize = 256;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match SimConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let seed = config.seed.unwrap_or_else(|| {
        let seed = rand::rng().random::<u64>();
        tracing::info!("POD_SIM_SEED not set, using seed {seed}");
        seed
    });

    tracing::info!(
        "Loaded configuration: duration_ms={}, random_mode={}, seed={}, channels={:?}",
        config.duration_ms,
        config.random_mode,
        seed,
        config.channels
    );

    let pod = sample_pod();
    let simulation = match Simulation::new(&pod, config.run_options(seed)) {
        Ok(simulation) => simulation,
        Err(e) => {
            tracing::error!("Failed to build simulation: {e}");
            std::process::exit(1);
        }
    };

    let (sink, receiver) = BroadcastSink::new(SINK_CAPACITY);
    let consumer = tokio::spawn(consume(receiver));

    // The run is CPU-bound; keep it off the async workers. The sink is moved
    // in and dropped when the run ends, which closes the consumer's channel.
    let series = tokio::task::spawn_blocking(move || simulation.run_with_sink(&sink))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Simulation task failed: {e}");
            std::process::exit(1);
        });

    let delivered = consumer.await.unwrap_or_else(|e| {
        tracing::error!("Consumer task failed: {e}");
        0
    });

    tracing::info!(
        "Run complete: {} ticks recorded, {} delivered, checksum {:08x}",
        series.len(),
        delivered,
        series.checksum()
    );
    if let Some(last) = series.last() {
        for (channel, value) in last.snapshot.iter() {
            tracing::info!("  {channel} = {value:.3}");
        }
    }
}

/// Drain ticks until the sink is dropped. Returns how many were received.
async fn consume(mut receiver: broadcast::Receiver<RecordedTick>) -> u64 {
    let mut received = 0;
    loop {
        match receiver.recv().await {
            Ok(tick) => {
                received += 1;
                tracing::debug!(
                    "tick {}: fired {:?}, {} channels",
                    tick.time,
                    tick.fired,
                    tick.snapshot.len()
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("consumer fell behind, skipped {skipped} ticks");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("sink closed");
                return received;
            }
        }
    }
}
