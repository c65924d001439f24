use super::config::CarConfig;
use super::state::{forward_from_yaw, right_from_yaw, CarState, InputSnapshot, Telemetry};
use crate::sim::physics::{decay_toward_zero, sign, sign_or_positive, G};
use crate::sim::{grade_percent, wrap_angle, Float2};
use crate::track::TrackSurface;

/// Distance kept between the car's center and the lane edge (m).
pub const LANE_MARGIN: f32 = 0.75;
/// Longitudinal speed floor used in slip angle denominators (m/s).
pub const SLIP_SPEED_FLOOR: f32 = 1.0;

/// Advances one car by `dt` seconds on `track`.
///
/// Bicycle model with saturating tires, integrated semi-implicitly in the
/// car frame. The car is then re-projected onto the track, held inside the
/// lane and snapped to ride height, so it can never leave the surface.
/// `dt` is expected to be clamped by the caller (see
/// [`crate::sim::clamp_dt`]).
pub fn step(
    state: &mut CarState,
    input: &InputSnapshot,
    track: &TrackSurface,
    config: &CarConfig,
    dt: f32,
) -> Telemetry {
    let input = input.clamped();

    // Where the car is before moving: slope and track direction.
    let before = track.project_point(state.position);
    state.last_projection = Some(before);
    let forward = forward_from_yaw(state.yaw);
    let right = right_from_yaw(state.yaw);
    let track_forward = before.sample.tangent.xz().normalize_or(forward);
    let grade_sin = before.sample.tangent.y;
    let alignment = forward.dot(track_forward).clamp(-1.0, 1.0);
    let grade_accel = -G * grade_sin * alignment;

    // Car frame velocity.
    let v_long = state.velocity.dot(forward);
    let v_lat = state.velocity.dot(right);
    let speed = state.velocity.magnitude();
    let yaw_rate = state.yaw_rate;

    let gain = config.steering_gain(speed);
    let steer_angle = input.steer * config.max_steer_angle * gain;
    state.steer_angle = steer_angle;

    // Axle slip and saturating lateral forces. Tires fade out below the
    // slip floor so a parked car holding steer stays put.
    let effective_speed = v_long.abs().max(SLIP_SPEED_FLOOR);
    let tire_fade = (speed / SLIP_SPEED_FLOOR).min(1.0);
    let grip = (1.0 - input.handbrake * config.handbrake_grip_loss) * tire_fade;
    let slip_front = (v_lat + config.cg_to_front * yaw_rate).atan2(effective_speed) - steer_angle;
    let slip_rear = (v_lat - config.cg_to_rear * yaw_rate).atan2(effective_speed);
    let force_front = config.lateral_force(config.cornering_front * grip, slip_front);
    let force_rear = config.lateral_force(config.cornering_rear * grip, slip_rear);

    // Longitudinal forces. Engine fades out toward top speed; everything
    // else resists motion.
    let engine = input.throttle
        * config.max_engine_force
        * (1.0 - (speed / config.top_speed).clamp(0.0, 1.0));
    let drag = config.drag_coefficient * v_long * v_long.abs();
    let rolling = config.rolling_coefficient * sign(v_long);
    let brake_direction = sign_or_positive(v_long);
    let brake = brake_direction * input.brake * config.max_brake_force;
    let handbrake = brake_direction * input.handbrake * config.handbrake_brake_force;

    // Semi-implicit Euler with Coriolis cross terms from pre-update values.
    // Resistance can stop the car but never push it backwards.
    let drive = engine / config.mass + grade_accel;
    let resistance = (drag + rolling + brake + handbrake) / config.mass;
    let free_long = v_long + (drive + yaw_rate * v_lat) * dt;
    let new_long = decay_toward_zero(free_long, resistance.abs() * dt);
    let lateral_accel = (force_front + force_rear) / config.mass;
    let new_lat = v_lat + (lateral_accel - yaw_rate * v_long) * dt;

    let yaw_accel =
        (config.cg_to_front * force_front - config.cg_to_rear * force_rear) / config.yaw_inertia;
    let mut new_yaw_rate = yaw_rate + yaw_accel * dt * gain;
    new_yaw_rate *= 1.0 - (config.yaw_damping * dt).min(config.yaw_damping_cap);
    state.yaw = wrap_angle(state.yaw + new_yaw_rate * dt);
    state.yaw_rate = new_yaw_rate;

    // Back to world space, move on the ground plane.
    state.velocity = forward_from_yaw(state.yaw) * new_long + right_from_yaw(state.yaw) * new_lat;
    let planar: Float2 = state.position.xz() + state.velocity * dt;
    let moved = planar.to_world(state.position.y);

    // Keep the car on the surface and inside the lane.
    let after = track.project_point(moved);
    let half_width = (after.sample.width * 0.5 - LANE_MARGIN).max(0.0);
    let lateral = after.sample.lateral_offset_of(moved);
    let lateral = if lateral.is_finite() {
        lateral.clamp(-half_width, half_width)
    } else {
        0.0
    };
    state.position = after.sample.offset_position(lateral, config.ride_height);
    state.lateral_offset = lateral;
    state.progress = after.sample.distance;
    state.grade_percent = grade_percent(after.sample.tangent);
    state.slip_angle = new_lat.atan2(new_long.abs().max(SLIP_SPEED_FLOOR));
    state.last_projection = Some(after);

    let speed = new_long.hypot(new_lat);
    state
        .drift
        .update(state.slip_angle.to_degrees(), speed, state.grade_percent, dt);

    state.telemetry()
}
