pub mod clock;
pub mod config;
pub mod graphics;
pub mod kinematics;
pub mod panel;
pub mod scene;
pub mod session;
pub mod state;
pub mod terminal;

pub use clock::{ManualScheduler, Scheduler, SimulationClock, TimerId, WallScheduler};
pub use config::{ConfigError, SessionConfig};
pub use graphics::{Canvas, CellCanvas, DrawCall, RecordingCanvas, StrokeStyle};
pub use kinematics::{flight_time, has_landed, peak_height, position_at, Position};
pub use panel::{ControlPanel, Field};
pub use scene::SceneRenderer;
pub use session::{Action, InputGate, Landing, ParameterSource, SessionController};
pub use state::{Layout, Phase, RenderOptions, SimulationParameters, SimulationState};
