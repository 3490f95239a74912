//! End-to-end tests at the simulation-run level.
//!
//! Each test file covers a specific scenario, building a catalogue, running
//! it with a fixed seed and checking the recorded series.

#![cfg(test)]

mod helpers;

mod test_bounds;
mod test_channel_filter;
mod test_determinism;
mod test_firing_counts;
mod test_invalid_catalogue;
mod test_motion_first_tick;
mod test_multi_rate;
mod test_random_single_channel;
mod test_sink_delivery;
mod test_temperature_average;
