//! Session configuration loaded from YAML.
//!
//! Every section is optional and falls back to its defaults:
//!
//! ```yaml
//! parameters:
//!   initial_height: 0.0        # m
//!   initial_velocity: 60.0     # m/s
//!   launch_angle_degrees: 45.0
//!   gravity: 9.8               # m/s²
//!   marker_radius: 10.0        # px
//!   frame_rate_hz: 60.0
//!
//! render:
//!   show_path: true
//!   show_axes: true
//!
//! layout:
//!   width: 1000.0
//!   height: 600.0
//!   origin_x: 10.0
//!   ground_y: 580.0
//!
//! frame_wrap: 1000             # wrap the frame counter, omit to disable
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::panel::Field;
use crate::state::{Layout, RenderOptions, SimulationParameters};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything needed to set up a session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub parameters: SimulationParameters,
    pub render: RenderOptions,
    pub layout: Layout,
    pub frame_wrap: Option<u64>,
}

impl SessionConfig {
    /// Reads and validates a YAML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SessionConfig =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its documented range. Parameters use the
    /// same bounds as the control panel, so a loaded session reaches the
    /// simulation unchanged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::ALL {
            let (min, max) = field.range();
            between(field.key(), field.read(&self.parameters), min, max)?;
        }

        let l = &self.layout;
        positive("layout.width", l.width)?;
        positive("layout.height", l.height)?;
        within("layout.origin_x", l.origin_x, l.width)?;
        within("layout.ground_y", l.ground_y, l.height)?;

        if self.frame_wrap == Some(0) {
            return Err(invalid("frame_wrap", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is not a finite number", value)))
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min {
        return Err(invalid(field, format!("{} is below {}", value, min)));
    }
    Ok(())
}

fn between(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(invalid(
            field,
            format!("{} is outside {}..={}", value, min, max),
        ));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, format!("{} must be greater than 0", value)));
    }
    Ok(())
}

fn within(field: &'static str, value: f64, max: f64) -> Result<(), ConfigError> {
    at_least(field, value, 0.0)?;
    if value > max {
        return Err(invalid(field, format!("{} lies outside the canvas (max {})", value, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::ControlPanel;
    use crate::session::ParameterSource;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SessionConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = SessionConfig::from_yaml_str(
            "parameters:\n  initial_velocity: 20.0\nrender:\n  show_grid: true\nframe_wrap: 1000\n",
        )
        .unwrap();
        assert_eq!(config.parameters.initial_velocity, 20.0);
        assert_eq!(config.parameters.gravity, 9.8);
        assert!(config.render.show_grid);
        assert!(!config.render.show_path);
        assert_eq!(config.frame_wrap, Some(1000));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = SessionConfig::from_yaml_str("parameters:\n  gravity: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));

        let err = SessionConfig::from_yaml_str("parameters:\n  initial_height: -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_height", .. }));

        let err = SessionConfig::from_yaml_str("layout:\n  ground_y: 900\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.ground_y", .. }));
    }

    #[test]
    fn rejects_values_the_panel_cannot_hold() {
        let err =
            SessionConfig::from_yaml_str("parameters:\n  initial_velocity: 5000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_velocity", .. }));

        let err = SessionConfig::from_yaml_str("parameters:\n  gravity: 0.05\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));

        let err = SessionConfig::from_yaml_str("parameters:\n  frame_rate_hz: 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "frame_rate_hz", .. }));

        let err = SessionConfig::from_yaml_str("parameters:\n  launch_angle_degrees: .nan\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "launch_angle_degrees", .. }));
    }

    #[test]
    fn accepted_values_reach_the_panel_unchanged() {
        let config = SessionConfig::from_yaml_str(
            "parameters: {initial_velocity: 1000, launch_angle_degrees: 270, gravity: 0.1, frame_rate_hz: 240}",
        )
        .unwrap();
        let panel = ControlPanel::new(config.parameters, config.render);
        assert_eq!(panel.parameters(), config.parameters);
        assert_eq!(panel.parameters().launch_angle_degrees, 270.0);
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = SessionConfig::from_yaml_str("parameters: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn bundled_session_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("sessions")
            .join("reference.yaml");
        let config = SessionConfig::from_path(&path).unwrap();
        assert_eq!(config.parameters.initial_velocity, 20.0);
        assert!(config.render.show_path && config.render.show_axes);
        assert_eq!(config.frame_wrap, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::from_path(Path::new("/nonexistent/session.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/session.yaml"));
    }
}
