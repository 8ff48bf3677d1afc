use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use parabolic_motion::kinematics::{flight_time, peak_height, to_physical};
use parabolic_motion::terminal::{
    command_for, terminal_size, Command, Input, Terminal, STATUS_ROWS,
};
use parabolic_motion::{
    Action, CellCanvas, ControlPanel, Field, Layout, ManualScheduler, ParameterSource, Phase,
    RenderOptions, SessionConfig, SessionController, WallScheduler,
};

/// Poll interval for key presses while no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(250);
/// Simulated seconds a headless run may take before giving up
const HEADLESS_LIMIT_S: f64 = 600.0;

#[derive(Parser, Debug)]
#[command(name = "parabolic-motion", version)]
#[command(about = "Animate projectile motion in the terminal", long_about = None)]
struct Args {
    /// YAML session file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Launch height (m)
    #[arg(long)]
    height: Option<f64>,

    /// Launch speed (m/s)
    #[arg(short = 'v', long)]
    velocity: Option<f64>,

    /// Launch angle (degrees)
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Gravity (m/s²)
    #[arg(short = 'g', long)]
    gravity: Option<f64>,

    /// Marker radius (px)
    #[arg(long)]
    radius: Option<f64>,

    /// Frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Trace the flown path
    #[arg(long)]
    path: bool,

    /// Horizontal and vertical guides through the marker
    #[arg(long)]
    guides: bool,

    /// Time and position readout
    #[arg(long)]
    coords: bool,

    /// Axes with tick labels
    #[arg(long)]
    axes: bool,

    /// Background grid
    #[arg(long)]
    grid: bool,

    /// Wrap the frame counter after this many frames
    #[arg(long)]
    frame_wrap: Option<u64>,

    /// Simulate one flight without a terminal and print a summary
    #[arg(long)]
    headless: bool,
}

impl Args {
    /// Applies command-line overrides on top of `config`
    fn apply(&self, config: &mut SessionConfig) {
        let p = &mut config.parameters;
        if let Some(v) = self.height {
            p.initial_height = v;
        }
        if let Some(v) = self.velocity {
            p.initial_velocity = v;
        }
        if let Some(v) = self.angle {
            p.launch_angle_degrees = v;
        }
        if let Some(v) = self.gravity {
            p.gravity = v;
        }
        if let Some(v) = self.radius {
            p.marker_radius = v;
        }
        if let Some(v) = self.fps {
            p.frame_rate_hz = v;
        }

        let r = &mut config.render;
        r.show_path |= self.path;
        r.show_horizontal_guide |= self.guides;
        r.show_vertical_guide |= self.guides;
        r.show_coordinates |= self.coords;
        r.show_axes |= self.axes;
        r.show_grid |= self.grid;

        if self.frame_wrap.is_some() {
            config.frame_wrap = self.frame_wrap;
        }
    }
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("failed to load session from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("invalid command-line parameters")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.headless {
        run_headless(&config);
        Ok(())
    } else {
        run_interactive(&config)
    }
}

/// Runs a single flight on virtual time and prints where it landed
fn run_headless(config: &SessionConfig) {
    let layout = config.layout;
    let panel = ControlPanel::new(config.parameters, config.render);
    let canvas = CellCanvas::new(100, 30, &layout);
    let mut controller = SessionController::new(ManualScheduler::new(), panel, canvas, layout)
        .with_frame_wrap(config.frame_wrap);

    controller.dispatch(Action::Start);
    let params = *controller.parameters();
    let period = controller.clock().period();
    let max_frames = (HEADLESS_LIMIT_S * params.frame_rate_hz).ceil() as u64;

    println!(
        "v={} m/s  angle={}°  h={} m  g={} m/s²  {} Hz",
        params.initial_velocity,
        params.launch_angle_degrees,
        params.initial_height,
        params.gravity,
        params.frame_rate_hz
    );
    if let Some(t) = flight_time(&params) {
        println!("predicted flight time: {:.3} s", t);
    }
    if let Some(peak) = peak_height(&params) {
        println!("predicted peak height: {:.2} m", peak);
    }

    for _ in 0..max_frames {
        controller.scheduler_mut().advance(period);
        if let Some(landing) = controller.pump() {
            let (x_m, _) = to_physical(landing.position, &layout);
            println!(
                "landed at frame {} after {:.3} s, {:.2} m downrange",
                landing.frame_index, landing.elapsed_seconds, x_m
            );
            return;
        }
    }
    warn!("no ground impact within {} s", HEADLESS_LIMIT_S);
    println!("no ground impact within {} s", HEADLESS_LIMIT_S);
}

/// Drawing area for a terminal of `cols` x `rows`, leaving room for the status panel
fn canvas_for(cols: u16, rows: u16, layout: &Layout) -> CellCanvas {
    CellCanvas::new(
        cols as usize,
        rows.saturating_sub(STATUS_ROWS) as usize,
        layout,
    )
}

fn run_interactive(config: &SessionConfig) -> Result<()> {
    let (cols, rows) = terminal_size().context("cannot determine terminal size")?;
    let canvas = canvas_for(cols, rows, &config.layout);
    let panel = ControlPanel::new(config.parameters, config.render);
    let mut controller = SessionController::new(WallScheduler::new(), panel, canvas, config.layout)
        .with_frame_wrap(config.frame_wrap);

    let mut terminal = Terminal::enter().context("cannot set up the terminal")?;
    info!("session opened on a {}x{} terminal", cols, rows);

    loop {
        terminal.present(controller.canvas(), &status_lines(&controller))?;

        let timeout = controller
            .clock()
            .scheduler()
            .time_until_next(Instant::now())
            .unwrap_or(IDLE_POLL);
        match terminal.next_input(timeout)? {
            Some(Input::Resize { cols, rows }) => {
                info!("terminal resized to {}x{}", cols, rows);
                terminal.clear()?;
                controller.set_canvas(canvas_for(cols, rows, &config.layout));
            }
            Some(Input::Key(key)) => match command_for(&key) {
                Some(Command::Quit) => break,
                Some(Command::Control(action)) => controller.dispatch(action),
                Some(Command::SelectNext) => controller.panel_mut().select_next(),
                Some(Command::SelectPrev) => controller.panel_mut().select_prev(),
                Some(Command::Adjust(steps)) => {
                    if controller.panel_mut().adjust(steps) {
                        controller.dispatch(Action::InputChanged);
                    }
                }
                Some(Command::Toggle(index)) => {
                    if controller.panel_mut().toggle(index) {
                        controller.dispatch(Action::InputChanged);
                    }
                }
                None => {}
            },
            None => {}
        }

        controller.pump();
    }

    info!("session closed");
    Ok(())
}

fn status_lines(
    controller: &SessionController<WallScheduler, ControlPanel, CellCanvas>,
) -> Vec<String> {
    let state = controller.state();
    let params = controller.parameters();
    let panel = controller.panel();
    let phase = match state.phase {
        Phase::Idle => "Idle",
        Phase::Running => "Running",
        Phase::Paused => "Paused",
    };

    let mut lines = vec![format!(
        "{:<8} frame {:>5}  t={:>6.2}s   [s] Start  [p] {}  [r] Reset  [q] Quit",
        phase,
        state.frame_index,
        state.elapsed_seconds(params.frame_rate_hz),
        controller.pause_label()
    )];

    let lock = if panel.is_locked() { "  (locked)" } else { "" };
    for field in Field::ALL {
        let marker = if field == panel.selected() { '>' } else { ' ' };
        lines.push(format!(
            "{} {:<16} {:>8.2}{}",
            marker,
            field.label(),
            panel.value(field),
            lock
        ));
    }

    let options = panel.render_options();
    let toggles: Vec<String> = RenderOptions::LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let on = options.get(i).unwrap_or(false);
            format!("{} {}[{}]", i + 1, label, if on { 'x' } else { ' ' })
        })
        .collect();
    lines.push(toggles.join("  "));
    lines.push("Up/Down select  Left/Right adjust (Shift x10)  1-6 overlays".to_string());
    lines
}
