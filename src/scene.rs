use crate::graphics::{Canvas, StrokeStyle};
use crate::kinematics::{position_at_frame, to_physical, Position};
use crate::state::{frame_index_to_seconds, Layout, RenderOptions, SimulationParameters};

/// Distance between axis ticks and grid lines (px)
pub const AXIS_SPACING: f64 = 50.0;
/// Length of an axis tick mark (px)
const TICK_LENGTH: f64 = 6.0;

/// Draws complete frames of the animation onto a [`Canvas`]
#[derive(Debug, Clone, Copy)]
pub struct SceneRenderer {
    layout: Layout,
}

impl SceneRenderer {
    pub fn new(layout: Layout) -> Self {
        SceneRenderer { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Paints frame `frame_index` and returns the marker position.
    ///
    /// Overlays are drawn after the marker so guides line up with the
    /// position computed for this frame.
    pub fn paint<C: Canvas>(
        &self,
        canvas: &mut C,
        params: &SimulationParameters,
        options: &RenderOptions,
        frame_index: u64,
    ) -> Position {
        canvas.clear();
        self.draw_baseline(canvas);

        if options.show_axes {
            self.draw_axes(canvas);
        }
        if options.show_grid {
            self.draw_grid(canvas);
        }

        let position = position_at_frame(params, &self.layout, frame_index);
        canvas.circle(position, params.marker_radius);

        if options.show_path {
            self.draw_path(canvas, params, frame_index);
        }
        if options.show_horizontal_guide {
            canvas.line(
                Position::new(0.0, position.y),
                Position::new(self.layout.width, position.y),
            );
        }
        if options.show_vertical_guide {
            canvas.line(
                Position::new(position.x, 0.0),
                Position::new(position.x, self.layout.height),
            );
        }
        if options.show_coordinates {
            self.draw_coordinates(canvas, params, position, frame_index);
        }

        position
    }

    /// Ground line across the canvas
    fn draw_baseline<C: Canvas>(&self, canvas: &mut C) {
        let layout = &self.layout;
        canvas.line(
            Position::new(layout.origin_x, layout.ground_y),
            Position::new(layout.width - layout.origin_x, layout.ground_y),
        );
    }

    fn draw_axes<C: Canvas>(&self, canvas: &mut C) {
        let layout = &self.layout;
        let origin = Position::new(layout.origin_x, layout.ground_y);
        canvas.line(origin, Position::new(layout.width, layout.ground_y));
        canvas.line(origin, Position::new(layout.origin_x, 0.0));

        // Horizontal axis: ticks below the line, labels under the ticks
        let mut step = 1;
        loop {
            let x = layout.origin_x + step as f64 * AXIS_SPACING;
            if x > layout.width {
                break;
            }
            canvas.line(
                Position::new(x, layout.ground_y),
                Position::new(x, layout.ground_y + TICK_LENGTH),
            );
            canvas.text(
                Position::new(x, layout.ground_y + 2.0 * TICK_LENGTH),
                &axis_label(step),
            );
            step += 1;
        }

        // Vertical axis: ticks right of the line, labels beside them
        let mut step = 1;
        loop {
            let y = layout.ground_y - step as f64 * AXIS_SPACING;
            if y < 0.0 {
                break;
            }
            canvas.line(
                Position::new(layout.origin_x, y),
                Position::new(layout.origin_x + TICK_LENGTH, y),
            );
            canvas.text(
                Position::new(layout.origin_x + 2.0 * TICK_LENGTH, y),
                &axis_label(step),
            );
            step += 1;
        }
    }

    fn draw_grid<C: Canvas>(&self, canvas: &mut C) {
        let layout = &self.layout;
        canvas.set_stroke(StrokeStyle::Light);

        for x in grid_offsets(layout.origin_x, layout.width) {
            canvas.line(Position::new(x, 0.0), Position::new(x, layout.height));
        }
        for y in grid_offsets(layout.ground_y, layout.height) {
            canvas.line(Position::new(0.0, y), Position::new(layout.width, y));
        }

        canvas.reset_stroke();
    }

    /// Connects the positions of every frame flown so far
    fn draw_path<C: Canvas>(&self, canvas: &mut C, params: &SimulationParameters, frame_index: u64) {
        let mut previous = position_at_frame(params, &self.layout, 0);
        for frame in 1..=frame_index {
            let next = position_at_frame(params, &self.layout, frame);
            canvas.line(previous, next);
            previous = next;
        }
    }

    fn draw_coordinates<C: Canvas>(
        &self,
        canvas: &mut C,
        params: &SimulationParameters,
        position: Position,
        frame_index: u64,
    ) {
        let (x_m, y_m) = to_physical(position, &self.layout);
        let t = frame_index_to_seconds(frame_index, params.frame_rate_hz);
        let offset = params.marker_radius + 5.0;
        canvas.text(
            Position::new(position.x + offset, position.y - offset),
            &format_coordinates(t, x_m, y_m),
        );
    }
}

/// Readout text for the coordinate overlay
pub fn format_coordinates(t: f64, x_m: f64, y_m: f64) -> String {
    format!("t={:.2}s x={:.1}m y={:.1}m", t, x_m, y_m)
}

fn axis_label(step: u32) -> String {
    format!("{}", step as f64 * AXIS_SPACING)
}

/// Grid line offsets spaced from `anchor` in both directions within [0, extent]
fn grid_offsets(anchor: f64, extent: f64) -> Vec<f64> {
    let below = (anchor / AXIS_SPACING).floor() as i64;
    let above = ((extent - anchor) / AXIS_SPACING).floor() as i64;
    (-below..=above)
        .map(|k| anchor + k as f64 * AXIS_SPACING)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{DrawCall, RecordingCanvas};

    fn params() -> SimulationParameters {
        SimulationParameters {
            initial_height: 0.0,
            initial_velocity: 20.0,
            launch_angle_degrees: 45.0,
            gravity: 9.8,
            marker_radius: 10.0,
            frame_rate_hz: 60.0,
        }
    }

    #[test]
    fn bare_frame_is_baseline_and_marker() {
        let renderer = SceneRenderer::new(Layout::default());
        let mut canvas = RecordingCanvas::new();
        let position = renderer.paint(&mut canvas, &params(), &RenderOptions::default(), 30);

        assert_eq!(canvas.calls.len(), 3);
        assert_eq!(canvas.calls[0], DrawCall::Clear);
        assert_eq!(canvas.circles(), vec![(position, 10.0)]);
        assert_eq!(position, position_at_frame(&params(), &Layout::default(), 30));
    }

    #[test]
    fn path_draws_one_segment_per_frame() {
        let renderer = SceneRenderer::new(Layout::default());
        let options = RenderOptions {
            show_path: true,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new();
        renderer.paint(&mut canvas, &params(), &options, 12);
        // baseline + 12 path segments
        assert_eq!(canvas.lines().len(), 13);

        renderer.paint(&mut canvas, &params(), &options, 0);
        assert_eq!(canvas.lines().len(), 1);
    }

    #[test]
    fn path_toggle_does_not_move_marker() {
        let renderer = SceneRenderer::new(Layout::default());
        let with_path = RenderOptions {
            show_path: true,
            ..RenderOptions::default()
        };
        let mut plain = RecordingCanvas::new();
        let mut traced = RecordingCanvas::new();
        for frame in [0, 1, 25, 100] {
            let a = renderer.paint(&mut plain, &params(), &RenderOptions::default(), frame);
            let b = renderer.paint(&mut traced, &params(), &with_path, frame);
            assert_eq!(a, b);
            assert_eq!(plain.circles(), traced.circles());
        }
    }

    #[test]
    fn guides_pass_through_marker() {
        let layout = Layout::default();
        let renderer = SceneRenderer::new(layout);
        let options = RenderOptions {
            show_horizontal_guide: true,
            show_vertical_guide: true,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new();
        let p = renderer.paint(&mut canvas, &params(), &options, 40);
        let lines = canvas.lines();
        assert!(lines.contains(&(Position::new(0.0, p.y), Position::new(layout.width, p.y))));
        assert!(lines.contains(&(Position::new(p.x, 0.0), Position::new(p.x, layout.height))));
    }

    #[test]
    fn grid_restores_default_stroke() {
        let renderer = SceneRenderer::new(Layout::default());
        let options = RenderOptions {
            show_grid: true,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new();
        renderer.paint(&mut canvas, &params(), &options, 0);

        let set = canvas
            .calls
            .iter()
            .position(|c| *c == DrawCall::SetStroke(StrokeStyle::Light))
            .unwrap();
        let reset = canvas
            .calls
            .iter()
            .position(|c| *c == DrawCall::ResetStroke)
            .unwrap();
        let marker = canvas
            .calls
            .iter()
            .position(|c| matches!(c, DrawCall::Circle(..)))
            .unwrap();
        assert!(set < reset && reset < marker);
    }

    #[test]
    fn axes_label_every_fifty_pixels() {
        let renderer = SceneRenderer::new(Layout::default());
        let options = RenderOptions {
            show_axes: true,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new();
        renderer.paint(&mut canvas, &params(), &options, 0);
        let texts = canvas.texts();
        // 19 ticks along 990 px of x-axis, 11 along 580 px of y-axis
        assert_eq!(texts.len(), 19 + 11);
        assert_eq!(texts[0], "50");
        assert!(texts.contains(&"950"));
        assert!(texts.contains(&"550"));
    }

    #[test]
    fn coordinates_read_in_metres() {
        let renderer = SceneRenderer::new(Layout::default());
        let options = RenderOptions {
            show_coordinates: true,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new();
        renderer.paint(&mut canvas, &params(), &options, 60);

        let p = params();
        let (vx, vy) = crate::kinematics::velocity_components(&p);
        let expected = format_coordinates(1.0, vx, vy - 4.9);
        assert_eq!(canvas.texts(), vec![expected.as_str()]);
    }

    #[test]
    fn grid_spans_both_sides_of_origin() {
        assert_eq!(grid_offsets(10.0, 120.0), vec![10.0, 60.0, 110.0]);
        assert_eq!(grid_offsets(580.0, 600.0).first(), Some(&30.0));
    }
}
