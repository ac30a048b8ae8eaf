use crate::generator::template::{
    coast_altitude, coast_velocity, dynamic_pressure, powered_altitude, powered_velocity,
};
use flightcore::model::{Observation, ObservationSeries, TimestampSource};
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Upper bound on generated samples (about 28 h at 10 ticks per second).
pub const MAX_PROFILE_TICKS: u64 = 1_000_000;

/// Configuration for the synthetic two-phase flight profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightProfileConfig {
    pub duration_secs: u32,
    pub ticks_per_second: u32,
    pub burnout_secs: f64,
    pub thrust_accel: f64,
    pub gravity: f64,
    /// Peak-to-peak amplitude of the uniform altitude noise, in metres.
    pub altitude_noise: f64,
    pub engine_temp_base: f64,
    pub engine_temp_rise: f64,
    pub coast_cooling_divisor: f64,
    pub spike_center_secs: f64,
    pub spike_half_width_secs: f64,
    pub spike_magnitude: f64,
    pub sea_level_density: f64,
    pub scale_height: f64,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for FlightProfileConfig {
    fn default() -> Self {
        Self {
            duration_secs: 300,
            ticks_per_second: 10,
            burnout_secs: 150.0,
            thrust_accel: 30.0,
            gravity: 9.8,
            altitude_noise: 10.0,
            engine_temp_base: 800.0,
            engine_temp_rise: 2.0,
            coast_cooling_divisor: 50.0,
            spike_center_secs: 120.0,
            spike_half_width_secs: 0.5,
            spike_magnitude: 500.0,
            sea_level_density: 1.225,
            scale_height: 8000.0,
            seed: None,
        }
    }
}

impl FlightProfileConfig {
    /// Sample intervals the profile asks for, before any cap is applied.
    pub fn total_ticks(&self) -> u64 {
        u64::from(self.duration_secs) * u64::from(self.normalized_ticks())
    }

    fn normalized_ticks(&self) -> u32 {
        self.ticks_per_second.max(1)
    }

    fn engine_temp(&self, t: f64, powered: bool) -> f64 {
        let spike = if (t - self.spike_center_secs).abs() < self.spike_half_width_secs {
            self.spike_magnitude
        } else {
            0.0
        };
        let base = if powered {
            self.engine_temp_base + self.engine_temp_rise * t
        } else {
            let since_burnout = t - self.burnout_secs;
            self.engine_temp_base + self.engine_temp_rise * self.burnout_secs
                - since_burnout * since_burnout / self.coast_cooling_divisor
        };
        base + spike
    }
}

/// Default profile: 300 s at 0.1 s resolution with an engine temperature
/// spike around T+120 s.
pub fn generate() -> ObservationSeries {
    generate_with(&FlightProfileConfig::default())
}

pub fn generate_with(config: &FlightProfileConfig) -> ObservationSeries {
    let ticks_per_second = config.normalized_ticks();
    let requested = config.total_ticks();
    let total_ticks = requested.min(MAX_PROFILE_TICKS);
    if total_ticks < requested {
        warn!(
            "profile asks for {} ticks; truncated to {}",
            requested, MAX_PROFILE_TICKS
        );
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let half_noise = config.altitude_noise.abs() / 2.0;

    let capacity = usize::try_from(total_ticks).map_or(0, |ticks| ticks + 1);
    let mut observations = Vec::with_capacity(capacity);
    // Integer ticks keep timestamps exact; repeated += 0.1 would drift.
    for tick in 0..=total_ticks {
        let t = tick as f64 / f64::from(ticks_per_second);
        let powered = t < config.burnout_secs;

        let (altitude, velocity, thrust_term) = if powered {
            (
                powered_altitude(config.thrust_accel, t),
                powered_velocity(config.thrust_accel, t),
                config.thrust_accel,
            )
        } else {
            (
                coast_altitude(config.thrust_accel, config.gravity, config.burnout_secs, t),
                coast_velocity(config.thrust_accel, config.gravity, config.burnout_secs, t),
                -config.gravity,
            )
        };

        let noise = if half_noise > 0.0 {
            rng.gen_range(-half_noise..half_noise)
        } else {
            0.0
        };
        let acceleration = thrust_term + rng.gen::<f64>();
        let pressure = dynamic_pressure(
            velocity,
            altitude,
            config.sea_level_density,
            config.scale_height,
        );

        observations.push(
            Observation::new(t)
                .with("altitude", (altitude + noise).max(0.0))
                .with("velocity", velocity)
                .with("acceleration", acceleration)
                .with("temp_engine", config.engine_temp(t, powered))
                .with("pressure", pressure.max(0.0)),
        );
    }

    info!(
        "generated synthetic profile: {} points over {} s",
        observations.len(),
        config.duration_secs
    );
    ObservationSeries::new(observations, TimestampSource::Generated)
}
