use crate::state::{frame_index_to_seconds, Layout, SimulationParameters};

/// A point in canvas pixel space. One metre maps to one pixel and `y` grows
/// downward, so height above the ground is `layout.ground_y - y`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Horizontal and vertical launch velocity (m/s), vertical positive upward
pub fn velocity_components(params: &SimulationParameters) -> (f64, f64) {
    let (sin_a, cos_a) = params.launch_angle_degrees.to_radians().sin_cos();
    (
        params.initial_velocity * cos_a,
        params.initial_velocity * sin_a,
    )
}

/// Position of the projectile `t` seconds after launch
pub fn position_at(params: &SimulationParameters, layout: &Layout, t: f64) -> Position {
    let (v_cos, v_sin) = velocity_components(params);
    let rise = v_sin * t - params.gravity * t * t / 2.0;
    Position {
        x: layout.origin_x + v_cos * t,
        y: layout.ground_y - params.initial_height - rise,
    }
}

/// Position of the projectile at a given tick of the run
pub fn position_at_frame(
    params: &SimulationParameters,
    layout: &Layout,
    frame_index: u64,
) -> Position {
    position_at(
        params,
        layout,
        frame_index_to_seconds(frame_index, params.frame_rate_hz),
    )
}

/// Converts a pixel position back to metres relative to the origin
pub fn to_physical(position: Position, layout: &Layout) -> (f64, f64) {
    (position.x - layout.origin_x, layout.ground_y - position.y)
}

/// Ground impact test. Frame 0 never counts, so a run launched from the
/// ground plane is not stopped before it moves.
pub fn has_landed(frame_index: u64, y: f64, ground_y: f64) -> bool {
    frame_index > 0 && y >= ground_y
}

/// Time until the projectile returns to the ground plane, if it ever does
pub fn flight_time(params: &SimulationParameters) -> Option<f64> {
    let g = params.gravity;
    if g <= 0.0 {
        return None;
    }
    let (_, v_sin) = velocity_components(params);
    // g/2·t² − v_sin·t − h = 0
    let disc = v_sin * v_sin + 2.0 * g * params.initial_height;
    if disc < 0.0 {
        return None;
    }
    let t = (v_sin + disc.sqrt()) / g;
    (t >= 0.0).then_some(t)
}

/// Highest point reached above the ground plane (m)
pub fn peak_height(params: &SimulationParameters) -> Option<f64> {
    if params.gravity <= 0.0 {
        return None;
    }
    let (_, v_sin) = velocity_components(params);
    let climb = if v_sin > 0.0 {
        v_sin * v_sin / (2.0 * params.gravity)
    } else {
        0.0
    };
    Some(params.initial_height + climb)
}
