// Life of a run:
// 1. Catalogue describes every measurement: limits, noise, sampling period
// 2. Channels are filtered and grouped by sensor type
// 3. Each group gets initial values and an update model
// 4. Scheduler fires sensor types at their own rates:
//     - Due types read the pre-tick snapshot
//     - Their readings are merged into the next snapshot
//     - The snapshot is recorded and handed to the sink
//
// System components:
//  - Noise and bounds model
//  - Channel state store
//  - Per-type update models (motion, temperature, independent)
//  - Multi-rate scheduler

pub mod catalogue;
pub mod config;
mod e2e_tests;
pub mod error;
pub mod noise;
pub mod scheduler;
pub mod sensors;
pub mod series;
pub mod simulation;
pub mod sink;
pub mod snapshot;
pub mod time;

pub use catalogue::{Catalogue, Measurement};
pub use error::{SimulationError, SimulationResult};
pub use noise::NoiseModel;
pub use sensors::MotionProfile;
pub use series::{RecordedSeries, RecordedTick};
pub use simulation::{RunOptions, Simulation, run_simulation};
pub use sink::{BroadcastSink, ReadingSink, SinkError};
pub use snapshot::{ChannelStore, Snapshot};
pub use time::SimTime;
