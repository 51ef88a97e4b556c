//! Conversion between UTC calendar time and the continuous simulation clock.
//!
//! Simulation time is ephemeris seconds past J2000, so leap seconds inside a
//! profile do not produce jumps in its local time axis.

use crate::engine::assets::radar_sample::UtcTimestamp;
use crate::engine::core::errors::{ProfileError, ProfileResult};
use bevy::prelude::*;
use hifitime::Epoch;
use radar_constants::time::END_OF_EXISTENCE_UTC;

pub fn utc_to_sim_time(timestamp: &UtcTimestamp) -> ProfileResult<f64> {
    Epoch::maybe_from_gregorian_utc(
        timestamp.year,
        timestamp.month,
        timestamp.day,
        timestamp.hour,
        timestamp.minute,
        timestamp.second,
        timestamp.nanos,
    )
    .map(|epoch| epoch.to_et_seconds())
    .map_err(|err| ProfileError::InvalidTimestamp(format!("{timestamp}: {err}")))
}

/// Simulation time at which every profile stops existing.
pub fn end_of_existence() -> f64 {
    let (year, month, day, hour, minute, second) = END_OF_EXISTENCE_UTC;
    Epoch::from_gregorian_utc(year, month, day, hour, minute, second, 0).to_et_seconds()
}

pub fn format_sim_time(sim_time: f64) -> String {
    format!("{}", Epoch::from_et_seconds(sim_time))
}

/// Simulation clock driving the viewer. Hosts with their own clock feed
/// `RadarProfileFrame::update` directly instead.
#[derive(Resource, Debug, Clone)]
pub struct SimulationClock {
    pub time: f64,
    /// Simulation seconds per real second.
    pub rate: f64,
    pub paused: bool,
    /// Set once the clock has been moved to the first registered profile.
    pub seeded: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            time: 0.0,
            rate: 1.0,
            paused: false,
            seeded: false,
        }
    }
}

impl SimulationClock {
    pub fn advance(&mut self, real_seconds: f64) {
        if !self.paused {
            self.time += real_seconds * self.rate;
        }
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.seeded = true;
    }

    pub fn scale_rate(&mut self, factor: f64) {
        self.rate = (self.rate * factor).clamp(1.0e-3, 1.0e7);
    }
}

pub fn advance_simulation_clock(time: Res<Time>, mut clock: ResMut<SimulationClock>) {
    clock.advance(time.delta_secs_f64());
}
