use crate::session::{InputGate, ParameterSource};
use crate::state::{RenderOptions, SimulationParameters};

/// Editable numeric inputs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Height,
    Velocity,
    Angle,
    Gravity,
    Radius,
    FrameRate,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Height,
        Field::Velocity,
        Field::Angle,
        Field::Gravity,
        Field::Radius,
        Field::FrameRate,
    ];

    /// Name of the matching key in a session file
    pub fn key(&self) -> &'static str {
        match self {
            Field::Height => "initial_height",
            Field::Velocity => "initial_velocity",
            Field::Angle => "launch_angle_degrees",
            Field::Gravity => "gravity",
            Field::Radius => "marker_radius",
            Field::FrameRate => "frame_rate_hz",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Height => "Height (m)",
            Field::Velocity => "Velocity (m/s)",
            Field::Angle => "Angle (deg)",
            Field::Gravity => "Gravity (m/s2)",
            Field::Radius => "Radius (px)",
            Field::FrameRate => "Frame rate (Hz)",
        }
    }

    /// Increment applied by one adjustment
    fn step(&self) -> f64 {
        match self {
            Field::Height => 5.0,
            Field::Velocity => 1.0,
            Field::Angle => 1.0,
            Field::Gravity => 0.1,
            Field::Radius => 1.0,
            Field::FrameRate => 5.0,
        }
    }

    /// Accepted range. Session files outside it are rejected and panel
    /// edits are clamped into it.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Field::Height => (0.0, 10_000.0),
            Field::Velocity => (0.0, 1_000.0),
            Field::Angle => (f64::NEG_INFINITY, f64::INFINITY),
            Field::Gravity => (0.1, 100.0),
            Field::Radius => (1.0, 100.0),
            Field::FrameRate => (1.0, 240.0),
        }
    }

    pub fn read(&self, p: &SimulationParameters) -> f64 {
        match self {
            Field::Height => p.initial_height,
            Field::Velocity => p.initial_velocity,
            Field::Angle => p.launch_angle_degrees,
            Field::Gravity => p.gravity,
            Field::Radius => p.marker_radius,
            Field::FrameRate => p.frame_rate_hz,
        }
    }

    pub fn next(&self) -> Field {
        let i = Field::ALL.iter().position(|f| f == self).unwrap_or(0);
        Field::ALL[(i + 1) % Field::ALL.len()]
    }

    pub fn prev(&self) -> Field {
        let i = Field::ALL.iter().position(|f| f == self).unwrap_or(0);
        Field::ALL[(i + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// Interactive inputs. Coerces every edit into range so the simulation
/// only ever sees valid values, and refuses edits while locked.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    parameters: SimulationParameters,
    options: RenderOptions,
    selected: Field,
    locked: bool,
}

impl ControlPanel {
    pub fn new(parameters: SimulationParameters, options: RenderOptions) -> Self {
        let mut panel = ControlPanel {
            parameters,
            options,
            selected: Field::Velocity,
            locked: false,
        };
        for field in Field::ALL {
            let value = panel.value(field);
            panel.store(field, value);
        }
        panel
    }

    pub fn selected(&self) -> Field {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }

    pub fn value(&self, field: Field) -> f64 {
        field.read(&self.parameters)
    }

    /// Sets a field, clamped into range. Returns whether the value changed.
    pub fn set(&mut self, field: Field, value: f64) -> bool {
        if self.locked || value.is_nan() {
            return false;
        }
        let before = self.value(field);
        self.store(field, value);
        self.value(field) != before
    }

    /// Steps the selected field by `steps` increments
    pub fn adjust(&mut self, steps: i32) -> bool {
        let field = self.selected;
        let value = self.value(field) + steps as f64 * field.step();
        // Keep decimal steps from drifting
        let value = (value * 1000.0).round() / 1000.0;
        self.set(field, value)
    }

    /// Flips a render option. Returns false when locked or out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        !self.locked && self.options.toggle(index)
    }

    fn store(&mut self, field: Field, value: f64) {
        let (min, max) = field.range();
        let value = if value.is_nan() {
            field.read(&SimulationParameters::default())
        } else {
            value.clamp(min, max)
        };
        let p = &mut self.parameters;
        match field {
            Field::Height => p.initial_height = value,
            Field::Velocity => p.initial_velocity = value,
            Field::Angle => p.launch_angle_degrees = value,
            Field::Gravity => p.gravity = value,
            Field::Radius => p.marker_radius = value,
            Field::FrameRate => p.frame_rate_hz = value,
        }
    }
}

impl ParameterSource for ControlPanel {
    fn parameters(&self) -> SimulationParameters {
        self.parameters
    }

    fn render_options(&self) -> RenderOptions {
        self.options
    }
}

impl InputGate for ControlPanel {
    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ControlPanel {
        ControlPanel::new(SimulationParameters::default(), RenderOptions::default())
    }

    #[test]
    fn edits_are_clamped() {
        let mut panel = panel();
        assert!(panel.set(Field::Velocity, -20.0));
        assert_eq!(panel.value(Field::Velocity), 0.0);
        assert!(panel.set(Field::Gravity, 0.0));
        assert_eq!(panel.value(Field::Gravity), 0.1);
        assert!(!panel.set(Field::FrameRate, f64::NAN));
        assert_eq!(panel.value(Field::FrameRate), 60.0);
    }

    #[test]
    fn angle_is_not_bounded() {
        let mut panel = panel();
        assert!(panel.set(Field::Angle, 270.0));
        assert_eq!(panel.value(Field::Angle), 270.0);
        assert!(panel.set(Field::Angle, -400.0));
        assert_eq!(panel.value(Field::Angle), -400.0);
    }

    #[test]
    fn adjust_steps_selected_field() {
        let mut panel = panel();
        assert_eq!(panel.selected(), Field::Velocity);
        assert!(panel.adjust(3));
        assert_eq!(panel.parameters().initial_velocity, 63.0);

        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected(), Field::Gravity);
        assert!(panel.adjust(-1));
        assert_eq!(panel.parameters().gravity, 9.7);
    }

    #[test]
    fn locked_panel_refuses_edits() {
        let mut panel = panel();
        panel.set_locked(true);
        assert!(!panel.adjust(1));
        assert!(!panel.toggle(0));
        assert_eq!(panel.parameters(), SimulationParameters::default());
        assert_eq!(panel.render_options(), RenderOptions::default());

        panel.set_locked(false);
        assert!(panel.toggle(0));
        assert!(panel.render_options().show_path);
    }

    #[test]
    fn selection_wraps() {
        assert_eq!(Field::Height.prev(), Field::FrameRate);
        assert_eq!(Field::FrameRate.next(), Field::Height);
    }

    #[test]
    fn construction_coerces_inputs() {
        let params = SimulationParameters {
            marker_radius: 0.0,
            gravity: f64::NAN,
            ..SimulationParameters::default()
        };
        let panel = ControlPanel::new(params, RenderOptions::default());
        assert_eq!(panel.parameters().marker_radius, 1.0);
        assert_eq!(panel.parameters().gravity, 9.8);
    }
}
