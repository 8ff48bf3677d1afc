use std::ops::ControlFlow;

use log::{debug, info};

use crate::clock::{Scheduler, SimulationClock};
use crate::graphics::Canvas;
use crate::kinematics::{has_landed, Position};
use crate::scene::SceneRenderer;
use crate::state::{
    frame_index_to_seconds, Layout, Phase, RenderOptions, SimulationParameters, SimulationState,
};

/// Supplies already-validated inputs at transition time
pub trait ParameterSource {
    fn parameters(&self) -> SimulationParameters;
    fn render_options(&self) -> RenderOptions;
}

/// Enables or disables the parameter and render-option inputs
pub trait InputGate {
    fn set_locked(&mut self, locked: bool);
}

/// User-triggered controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    PauseResume,
    Reset,
    /// Any parameter or render-option input changed
    InputChanged,
}

/// Where and when a run hit the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub frame_index: u64,
    pub elapsed_seconds: f64,
    pub position: Position,
}

/// Start/pause/resume/reset state machine and sole owner of the simulation
/// state. Inputs stay locked for exactly as long as a run is in progress.
pub struct SessionController<S: Scheduler, P, C> {
    clock: SimulationClock<S>,
    panel: P,
    canvas: C,
    renderer: SceneRenderer,
    parameters: SimulationParameters,
    options: RenderOptions,
    phase: Phase,
}

impl<S, P, C> SessionController<S, P, C>
where
    S: Scheduler,
    P: ParameterSource + InputGate,
    C: Canvas,
{
    /// Creates an idle session and draws the initial preview
    pub fn new(scheduler: S, panel: P, canvas: C, layout: Layout) -> Self {
        let parameters = panel.parameters();
        let options = panel.render_options();
        let mut controller = SessionController {
            clock: SimulationClock::new(scheduler, parameters.frame_rate_hz),
            panel,
            canvas,
            renderer: SceneRenderer::new(layout),
            parameters,
            options,
            phase: Phase::Idle,
        };
        controller.reset();
        controller
    }

    /// Wraps the frame counter after `limit` frames
    pub fn with_frame_wrap(mut self, limit: Option<u64>) -> Self {
        self.clock = self.clock.with_frame_wrap(limit);
        self
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Start => self.start(),
            Action::PauseResume => self.pause_resume(),
            Action::Reset => self.reset(),
            Action::InputChanged => self.input_changed(),
        }
    }

    /// Idle -> Running. No-op in any other phase.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            debug!("start ignored while {:?}", self.phase);
            return;
        }
        self.capture_inputs();
        self.clock.reset_frame_index();
        self.enter(Phase::Running);
        self.paint();
        self.clock.start();
        info!(
            "run started: v={} m/s, angle={}°, h={} m, g={} m/s²",
            self.parameters.initial_velocity,
            self.parameters.launch_angle_degrees,
            self.parameters.initial_height,
            self.parameters.gravity
        );
    }

    /// Toggles between Running and Paused; ignored while Idle
    pub fn pause_resume(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle => debug!("pause/resume ignored while idle"),
        }
    }

    /// Running -> Paused, keeping the frame index
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.clock.stop();
        self.enter(Phase::Paused);
    }

    /// Paused -> Running from the preserved frame index
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.enter(Phase::Running);
        self.clock.start();
    }

    /// Any phase -> Idle with frame index 0 and a fresh preview
    pub fn reset(&mut self) {
        self.clock.stop();
        self.clock.reset_frame_index();
        self.capture_inputs();
        self.enter(Phase::Idle);
        self.paint();
    }

    /// Refreshes the preview when inputs change while idle
    pub fn input_changed(&mut self) {
        if self.phase == Phase::Idle {
            self.reset();
        }
    }

    /// Delivers due ticks, painting each frame and ending the run on
    /// ground impact
    pub fn pump(&mut self) -> Option<Landing> {
        if self.phase != Phase::Running {
            return None;
        }
        let renderer = &self.renderer;
        let canvas = &mut self.canvas;
        let params = self.parameters;
        let options = self.options;
        let ground_y = renderer.layout().ground_y;
        let mut landing = None;

        let flow = self.clock.dispatch_due(|frame_index| {
            let position = renderer.paint(canvas, &params, &options, frame_index);
            if has_landed(frame_index, position.y, ground_y) {
                landing = Some(Landing {
                    frame_index,
                    elapsed_seconds: frame_index_to_seconds(frame_index, params.frame_rate_hz),
                    position,
                });
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        if flow.is_break() {
            if let Some(landing) = &landing {
                info!(
                    "landed at frame {} after {:.3}s",
                    landing.frame_index, landing.elapsed_seconds
                );
            }
            self.reset();
        }
        landing
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            frame_index: self.clock.frame_index(),
            phase: self.phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Label for the pause/resume control
    pub fn pause_label(&self) -> &'static str {
        match self.phase {
            Phase::Paused => "Resume",
            _ => "Pause",
        }
    }

    /// Parameters captured for the current run or preview
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn layout(&self) -> &Layout {
        self.renderer.layout()
    }

    pub fn clock(&self) -> &SimulationClock<S> {
        &self.clock
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.clock.scheduler_mut()
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable access to the inputs. Follow edits with
    /// [`Action::InputChanged`] so an idle preview picks them up.
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Swaps in a new drawing surface and repaints the current frame on it
    pub fn set_canvas(&mut self, canvas: C) {
        self.canvas = canvas;
        self.paint();
    }

    fn capture_inputs(&mut self) {
        self.parameters = self.panel.parameters();
        self.options = self.panel.render_options();
        self.clock.set_frame_rate(self.parameters.frame_rate_hz);
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("{:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.panel.set_locked(phase != Phase::Idle);
    }

    fn paint(&mut self) {
        self.renderer.paint(
            &mut self.canvas,
            &self.parameters,
            &self.options,
            self.clock.frame_index(),
        );
    }
}
