//! Simulation runs.
//!
//! A [`Simulation`] owns everything one run needs: the scheduler, the
//! channel store, the noise model, one update model per sensor type and the
//! recorded series. The catalogue is only borrowed while the run is built,
//! so any number of runs can be built from the same catalogue.
//!
//! # Life of a tick
//!
//! 1. The scheduler yields the next time and the sensor types due at it.
//! 2. Every due type is updated from the same pre-tick snapshot.
//! 3. Their readings are merged into a fresh snapshot; types that did not
//!    fire carry their previous values forward.
//! 4. The store's snapshot is replaced and the tick is appended to the
//!    series.
//!
//! # Usage
//!
//! ```
//! use simulator::{RunOptions, Simulation, catalogue::sample_pod};
//!
//! let pod = sample_pod();
//! let options = RunOptions::new(2_000).with_seed(7);
//! let series = Simulation::new(&pod, options)?.run();
//! assert!(!series.is_empty());
//! # Ok::<(), simulator::SimulationError>(())
//! ```

// Each recorded tick keeps its own copy of the snapshot
#![allow(clippy::disallowed_methods)]

use rand::Rng;
use rand::rngs::StdRng;

use crate::catalogue::Catalogue;
use crate::error::SimulationResult;
use crate::noise::NoiseModel;
use crate::scheduler::Scheduler;
use crate::sensors::{self, InitialReport, ModelKind, MotionProfile, SensorModel};
use crate::series::{RecordedSeries, RecordedTick};
use crate::sink::{ReadingSink, SinkError};
use crate::snapshot::{ChannelStore, Readings, Snapshot};
use crate::time::SimTime;

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Simulated run length. Ticks due after this are not produced.
    pub duration_ms: u64,
    /// Sample every channel independently instead of using the per-type
    /// update models.
    pub random_mode: bool,
    /// Allow-list of channel names to simulate. `None` simulates every
    /// continuous channel.
    pub channels: Option<Vec<String>>,
    /// Seed for all randomness in the run.
    pub seed: u64,
    pub motion: MotionProfile,
}

impl RunOptions {
    /// Model-based run of `duration_ms` with seed 0.
    #[must_use]
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            random_mode: false,
            channels: None,
            seed: 0,
            motion: MotionProfile::default(),
        }
    }

    #[must_use]
    pub const fn with_random_mode(mut self, random_mode: bool) -> Self {
        self.random_mode = random_mode;
        self
    }

    #[must_use]
    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = Some(channels);
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_motion_profile(mut self, motion: MotionProfile) -> Self {
        self.motion = motion;
        self
    }
}

/// A sensor type and its update model. Indices match scheduler clocks.
#[derive(Debug, Clone)]
struct SensorRuntime {
    sensor_type: String,
    model: SensorModel,
}

/// One simulation run.
#[derive(Debug)]
pub struct Simulation<R = StdRng> {
    sensors: Vec<SensorRuntime>,
    scheduler: Scheduler,
    store: ChannelStore,
    initial: Snapshot,
    report: InitialReport,
    noise: NoiseModel<R>,
    series: RecordedSeries,
    random_mode: bool,
}

impl Simulation<StdRng> {
    /// Build a run seeded from `options.seed`.
    ///
    /// # Errors
    ///
    /// Fails before any tick runs if a simulated channel has missing or
    /// inverted limits, a sensor type has a zero sampling period, or a
    /// velocity channel would start at zero.
    pub fn new(catalogue: &Catalogue, options: RunOptions) -> SimulationResult<Self> {
        let noise = NoiseModel::seeded(options.seed);
        Self::with_noise(catalogue, options, noise)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a run drawing all randomness from `noise`. `options.seed` is
    /// ignored.
    ///
    /// # Errors
    ///
    /// See [`Simulation::new`].
    pub fn with_noise(
        catalogue: &Catalogue,
        options: RunOptions,
        mut noise: NoiseModel<R>,
    ) -> SimulationResult<Self> {
        let groups = catalogue.groups(options.channels.as_deref());
        if groups.is_empty() {
            tracing::warn!("no continuous channels selected, the run will record nothing");
        }

        let mut runtimes = Vec::with_capacity(groups.len());
        let mut clocks = Vec::with_capacity(groups.len());
        let mut initial = Readings::new();
        let mut report = InitialReport::default();
        for group in &groups {
            let channels = sensors::channels_of(group)?;
            let readings = sensors::initial_readings(&channels, &mut noise, &mut report)?;
            let kind = if options.random_mode {
                ModelKind::Independent
            } else {
                ModelKind::for_sensor_type(group.sensor_type())
            };
            let model = SensorModel::new(
                kind,
                group.sampling_period_ms(),
                channels,
                &readings,
                &options.motion,
            );

            tracing::debug!(
                "sensor type '{}': {} channels, {} sensors, every {}ms, {:?} model",
                group.sensor_type(),
                group.channels().len(),
                group.quantity(),
                group.sampling_period_ms(),
                kind
            );

            initial.extend(readings);
            clocks.push((group.sensor_type().to_string(), group.sampling_period_ms()));
            runtimes.push(SensorRuntime {
                sensor_type: group.sensor_type().to_string(),
                model,
            });
        }

        let scheduler = Scheduler::new(clocks, SimTime::from_millis(options.duration_ms))?;
        let initial = Snapshot::new(initial);
        if !report.is_clean() {
            tracing::warn!(
                "{} unrecognised channels started at random values, {} starting values were clamped",
                report.unrecognised.len(),
                report.clamped.len()
            );
        }

        tracing::info!(
            "simulation ready: {} sensor types, {} channels, {}ms, {} mode",
            runtimes.len(),
            initial.len(),
            options.duration_ms,
            if options.random_mode { "random" } else { "model" }
        );

        Ok(Self {
            sensors: runtimes,
            scheduler,
            store: ChannelStore::new(initial.clone()),
            initial,
            report,
            noise,
            series: RecordedSeries::new(),
            random_mode: options.random_mode,
        })
    }

    /// Run one tick and return what it recorded.
    ///
    /// Returns `None` once the run duration is exhausted. Ticks recorded so
    /// far remain available through [`Simulation::series`].
    pub fn step(&mut self) -> Option<&RecordedTick> {
        let tick = self.scheduler.next_tick()?;
        let current = self.store.get();

        let mut fired = Vec::with_capacity(tick.due.len());
        let mut batches = Vec::with_capacity(tick.due.len());
        for &index in &tick.due {
            let sensor = &mut self.sensors[index];
            batches.push(sensor.model.update(current, tick.time, &mut self.noise));
            fired.push(sensor.sensor_type.clone());
        }

        let next = current.with_readings(&batches);
        self.store.replace(next.clone());

        tracing::debug!("tick {}: fired {:?}", tick.time, fired);
        self.series.push(RecordedTick {
            time: tick.time,
            fired,
            snapshot: next,
        });
        self.series.last()
    }

    /// Run to completion.
    #[must_use]
    pub fn run(mut self) -> RecordedSeries {
        while self.step().is_some() {}
        self.finish()
    }

    /// Run to completion, handing each tick to `sink` as it is recorded.
    ///
    /// Sink failures are logged and otherwise ignored.
    #[must_use]
    pub fn run_with_sink(mut self, sink: &dyn ReadingSink) -> RecordedSeries {
        let mut undelivered = 0u64;
        while let Some(tick) = self.step() {
            if let Err(e) = sink.publish(tick) {
                undelivered += 1;
                match e {
                    SinkError::NoReceivers => {
                        tracing::debug!("tick {} not delivered: {e}", tick.time);
                    }
                    SinkError::Rejected(_) => {
                        tracing::warn!("tick {} not delivered: {e}", tick.time);
                    }
                }
            }
        }
        if undelivered > 0 {
            tracing::warn!("{undelivered} ticks were not delivered to the sink");
        }
        self.finish()
    }

    fn finish(self) -> RecordedSeries {
        tracing::info!(
            "simulation finished: {} ticks, last at {}",
            self.series.len(),
            self.series.last().map_or(SimTime::ZERO, |tick| tick.time)
        );
        self.series
    }

    /// The snapshot the run started from.
    #[must_use]
    pub const fn initial_snapshot(&self) -> &Snapshot {
        &self.initial
    }

    /// Channels that did not start from their nominal value.
    #[must_use]
    pub const fn initial_report(&self) -> &InitialReport {
        &self.report
    }

    /// The snapshot after the latest tick.
    #[must_use]
    pub const fn current(&self) -> &Snapshot {
        self.store.get()
    }

    #[must_use]
    pub const fn series(&self) -> &RecordedSeries {
        &self.series
    }

    /// Stop early and keep the ticks recorded so far.
    #[must_use]
    pub fn into_series(self) -> RecordedSeries {
        self.series
    }

    /// Sensor types in scheduler order.
    pub fn sensor_types(&self) -> impl Iterator<Item = &str> {
        self.sensors.iter().map(|s| s.sensor_type.as_str())
    }

    /// The update model driving `sensor_type`.
    #[must_use]
    pub fn model(&self, sensor_type: &str) -> Option<&SensorModel> {
        self.sensors
            .iter()
            .find(|s| s.sensor_type == sensor_type)
            .map(|s| &s.model)
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn is_random_mode(&self) -> bool {
        self.random_mode
    }
}

/// Build and run a simulation in one call.
///
/// # Errors
///
/// See [`Simulation::new`].
pub fn run_simulation(
    catalogue: &Catalogue,
    duration_ms: u64,
    random_mode: bool,
    channels: Option<&[String]>,
    seed: u64,
) -> SimulationResult<RecordedSeries> {
    let mut options = RunOptions::new(duration_ms)
        .with_random_mode(random_mode)
        .with_seed(seed);
    if let Some(channels) = channels {
        options = options.with_channels(channels.to_vec());
    }
    Ok(Simulation::new(catalogue, options)?.run())
}
