use serde::Deserialize;

/// Physical and display inputs for one run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Launch height above the ground plane (m)
    pub initial_height: f64,
    /// Launch speed (m/s)
    pub initial_velocity: f64,
    /// Launch angle measured from the horizontal (degrees)
    pub launch_angle_degrees: f64,
    /// Downward acceleration (m/s²)
    pub gravity: f64,
    /// Marker circle radius (px)
    pub marker_radius: f64,
    /// Ticks per second
    pub frame_rate_hz: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            initial_height: 0.0,
            initial_velocity: 60.0,
            launch_angle_degrees: 45.0,
            gravity: 9.8,
            marker_radius: 10.0,
            frame_rate_hz: 60.0,
        }
    }
}

/// Optional overlays drawn on top of the marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Trace the trajectory flown so far
    pub show_path: bool,
    /// Horizontal line through the marker
    pub show_horizontal_guide: bool,
    /// Vertical line through the marker
    pub show_vertical_guide: bool,
    /// Time and position readout next to the marker
    pub show_coordinates: bool,
    /// Axis lines with tick labels
    pub show_axes: bool,
    /// Background grid
    pub show_grid: bool,
}

impl RenderOptions {
    /// Number of toggles, in `toggle`/`get` index order
    pub const COUNT: usize = 6;

    /// Display names in index order
    pub const LABELS: [&'static str; Self::COUNT] = [
        "Path",
        "Horizontal guide",
        "Vertical guide",
        "Coordinates",
        "Axes",
        "Grid",
    ];

    /// Returns the toggle at `index`, or `None` when out of range
    pub fn get(&self, index: usize) -> Option<bool> {
        match index {
            0 => Some(self.show_path),
            1 => Some(self.show_horizontal_guide),
            2 => Some(self.show_vertical_guide),
            3 => Some(self.show_coordinates),
            4 => Some(self.show_axes),
            5 => Some(self.show_grid),
            _ => None,
        }
    }

    /// Flips the toggle at `index`; returns false when out of range
    pub fn toggle(&mut self, index: usize) -> bool {
        let flag = match index {
            0 => &mut self.show_path,
            1 => &mut self.show_horizontal_guide,
            2 => &mut self.show_vertical_guide,
            3 => &mut self.show_coordinates,
            4 => &mut self.show_axes,
            5 => &mut self.show_grid,
            _ => return false,
        };
        *flag = !*flag;
        true
    }
}

/// Pixel geometry of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Canvas width (px)
    pub width: f64,
    /// Canvas height (px)
    pub height: f64,
    /// Horizontal offset of the coordinate origin (px)
    pub origin_x: f64,
    /// Vertical offset of the ground plane (px, y grows downward)
    pub ground_y: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            width: 1000.0,
            height: 600.0,
            origin_x: 10.0,
            ground_y: 580.0,
        }
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Snapshot of the mutable simulation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationState {
    /// Ticks since the current run began
    pub frame_index: u64,
    /// Current phase
    pub phase: Phase,
}

impl SimulationState {
    /// Simulated time represented by `frame_index`
    pub fn elapsed_seconds(&self, frame_rate_hz: f64) -> f64 {
        frame_index_to_seconds(self.frame_index, frame_rate_hz)
    }
}

/// Converts a frame count into simulated seconds
pub fn frame_index_to_seconds(frame_index: u64, frame_rate_hz: f64) -> f64 {
    frame_index as f64 / frame_rate_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_seconds_follows_frame_rate() {
        let state = SimulationState {
            frame_index: 90,
            phase: Phase::Running,
        };
        assert!((state.elapsed_seconds(60.0) - 1.5).abs() < 1e-12);
        assert!((state.elapsed_seconds(30.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn toggles_are_independent() {
        let mut options = RenderOptions::default();
        assert!(options.toggle(0));
        assert!(options.show_path);
        assert!(!options.show_grid);

        assert!(options.toggle(5));
        assert!(options.toggle(0));
        assert!(!options.show_path);
        assert!(options.show_grid);

        assert!(!options.toggle(RenderOptions::COUNT));
        assert_eq!(options.get(RenderOptions::COUNT), None);
    }

    #[test]
    fn defaults_match_documented_values() {
        let params = SimulationParameters::default();
        assert_eq!(params.gravity, 9.8);
        assert_eq!(params.frame_rate_hz, 60.0);
        assert_eq!(Layout::default().ground_y, 580.0);
        assert_eq!(SimulationState::default().phase, Phase::Idle);
    }
}
