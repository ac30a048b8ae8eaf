//! Closed-form kinematics for a two-phase ballistic flight.

/// Altitude after `t` seconds of constant thrust acceleration from rest.
pub fn powered_altitude(thrust: f64, t: f64) -> f64 {
    0.5 * thrust * t * t
}

pub fn powered_velocity(thrust: f64, t: f64) -> f64 {
    thrust * t
}

/// Altitude `t` seconds into the flight once the engine has cut off at
/// `burnout`; continues from the burnout state under constant gravity.
pub fn coast_altitude(thrust: f64, gravity: f64, burnout: f64, t: f64) -> f64 {
    let dt = t - burnout;
    powered_altitude(thrust, burnout) + powered_velocity(thrust, burnout) * dt
        - 0.5 * gravity * dt * dt
}

pub fn coast_velocity(thrust: f64, gravity: f64, burnout: f64, t: f64) -> f64 {
    powered_velocity(thrust, burnout) - gravity * (t - burnout)
}

/// Dynamic pressure in kPa using an exponential atmosphere.
pub fn dynamic_pressure(
    velocity: f64,
    altitude: f64,
    sea_level_density: f64,
    scale_height: f64,
) -> f64 {
    let density = sea_level_density * (-altitude.max(0.0) / scale_height).exp();
    (0.5 * density * velocity * velocity / 1000.0).max(0.0)
}
