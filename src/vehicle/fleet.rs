#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::CarConfig;
use super::dynamics::step;
use super::state::{CarState, InputSnapshot, Telemetry};
use crate::track::TrackSurface;

/// A car's constants bundled with its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub config: CarConfig,
    pub state: CarState,
}

impl Car {
    pub fn new(config: CarConfig, state: CarState) -> Self {
        Self { config, state }
    }

    pub fn step(&mut self, input: &InputSnapshot, track: &TrackSurface, dt: f32) -> Telemetry {
        step(&mut self.state, input, track, &self.config, dt)
    }
}

/// Steps every car against the same track.
///
/// `inputs[i]` drives `cars[i]`; cars without an input coast. Telemetry is
/// returned in car order.
pub fn step_all(
    cars: &mut [Car],
    inputs: &[InputSnapshot],
    track: &TrackSurface,
    dt: f32,
) -> Vec<Telemetry> {
    if inputs.len() != cars.len() {
        log::warn!(
            "step_all got {} inputs for {} cars",
            inputs.len(),
            cars.len()
        );
    }
    let input_for = |i: usize| inputs.get(i).copied().unwrap_or_default();

    #[cfg(feature = "parallel")]
    {
        cars.par_iter_mut()
            .enumerate()
            .map(|(i, car)| car.step(&input_for(i), track, dt))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        cars.iter_mut()
            .enumerate()
            .map(|(i, car)| car.step(&input_for(i), track, dt))
            .collect()
    }
}
