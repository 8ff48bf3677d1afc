use crate::kinematics::Position;
use crate::state::Layout;

/// Stroke used for subsequent line, circle and text primitives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Faint background stroke; never paints over existing content
    Light,
}

/// Drawing primitives the scene renderer is written against
pub trait Canvas {
    fn clear(&mut self);
    fn line(&mut self, from: Position, to: Position);
    fn circle(&mut self, center: Position, radius: f64);
    fn text(&mut self, at: Position, text: &str);
    fn set_stroke(&mut self, style: StrokeStyle);
    fn reset_stroke(&mut self);
}

/// A single primitive call, as recorded by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Line(Position, Position),
    Circle(Position, f64),
    Text(Position, String),
    SetStroke(StrokeStyle),
    ResetStroke,
}

/// Canvas that keeps every call since the last `clear`
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    /// Number of times the surface has been cleared
    pub frames: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> Vec<(Position, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Circle(center, radius) => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<(Position, Position)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Line(from, to) => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
        self.frames += 1;
    }

    fn line(&mut self, from: Position, to: Position) {
        self.calls.push(DrawCall::Line(from, to));
    }

    fn circle(&mut self, center: Position, radius: f64) {
        self.calls.push(DrawCall::Circle(center, radius));
    }

    fn text(&mut self, at: Position, text: &str) {
        self.calls.push(DrawCall::Text(at, text.to_string()));
    }

    fn set_stroke(&mut self, style: StrokeStyle) {
        self.calls.push(DrawCall::SetStroke(style));
    }

    fn reset_stroke(&mut self) {
        self.calls.push(DrawCall::ResetStroke);
    }
}

/// One character cell of a [`CellCanvas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub style: StrokeStyle,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        style: StrokeStyle::Solid,
    };

    pub fn is_empty(&self) -> bool {
        self.glyph == ' '
    }
}

/// Character-grid canvas. Pixel coordinates from the layout are scaled
/// onto `cols` x `rows` cells.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    cols: usize,
    rows: usize,
    scale_x: f64,
    scale_y: f64,
    cells: Vec<Cell>,
    stroke: StrokeStyle,
}

impl CellCanvas {
    pub fn new(cols: usize, rows: usize, layout: &Layout) -> Self {
        CellCanvas {
            cols,
            rows,
            scale_x: cols as f64 / layout.width,
            scale_y: rows as f64 / layout.height,
            cells: vec![Cell::EMPTY; cols * rows],
            stroke: StrokeStyle::Solid,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// Iterates over the grid one row at a time
    pub fn lines(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1))
    }

    /// Renders row `row` as plain text
    pub fn row_text(&self, row: usize) -> String {
        self.lines()
            .nth(row)
            .map(|cells| cells.iter().map(|c| c.glyph).collect())
            .unwrap_or_default()
    }

    /// Maps a pixel position to a (possibly off-grid) cell
    pub fn to_cell(&self, p: Position) -> (isize, isize) {
        (
            (p.x * self.scale_x).floor() as isize,
            (p.y * self.scale_y).floor() as isize,
        )
    }

    fn plot(&mut self, col: isize, row: isize, glyph: char) {
        if col < 0 || row < 0 || col >= self.cols as isize || row >= self.rows as isize {
            return;
        }
        let cell = &mut self.cells[row as usize * self.cols + col as usize];
        if self.stroke == StrokeStyle::Light && !cell.is_empty() {
            return;
        }
        *cell = Cell {
            glyph,
            style: self.stroke,
        };
    }

    fn line_glyph(&self, dx: isize, dy: isize) -> char {
        if self.stroke == StrokeStyle::Light {
            return '.';
        }
        if dy == 0 {
            '-'
        } else if dx == 0 {
            '|'
        } else if (dx > 0) == (dy > 0) {
            '\\'
        } else {
            '/'
        }
    }
}

impl Canvas for CellCanvas {
    fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Bresenham rasterization between the two endpoint cells
    fn line(&mut self, from: Position, to: Position) {
        let (mut x0, mut y0) = self.to_cell(from);
        let (x1, y1) = self.to_cell(to);
        let glyph = self.line_glyph(x1 - x0, y1 - y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, glyph);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn circle(&mut self, center: Position, radius: f64) {
        let (cx, cy) = self.to_cell(center);
        let span_x = radius * self.scale_x;
        let span_y = radius * self.scale_y;
        if span_x < 1.0 && span_y < 1.0 {
            self.plot(cx, cy, 'O');
            return;
        }
        // Two samples per cell of perimeter close the outline
        let steps = ((span_x.max(span_y) * std::f64::consts::TAU).ceil() as usize).max(8) * 2;
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            let (sin_a, cos_a) = angle.sin_cos();
            let point = Position::new(center.x + radius * cos_a, center.y + radius * sin_a);
            let (col, row) = self.to_cell(point);
            self.plot(col, row, 'o');
        }
    }

    fn text(&mut self, at: Position, text: &str) {
        let (col, row) = self.to_cell(at);
        for (offset, glyph) in text.chars().enumerate() {
            self.plot(col + offset as isize, row, glyph);
        }
    }

    fn set_stroke(&mut self, style: StrokeStyle) {
        self.stroke = style;
    }

    fn reset_stroke(&mut self) {
        self.stroke = StrokeStyle::Solid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CellCanvas {
        // 10 px per cell in both directions
        let layout = Layout {
            width: 200.0,
            height: 100.0,
            origin_x: 0.0,
            ground_y: 90.0,
        };
        CellCanvas::new(20, 10, &layout)
    }

    #[test]
    fn horizontal_line_fills_row() {
        let mut canvas = canvas();
        canvas.line(Position::new(0.0, 55.0), Position::new(199.0, 55.0));
        assert_eq!(canvas.row_text(5), "-".repeat(20));
        assert_eq!(canvas.row_text(4), " ".repeat(20));
    }

    #[test]
    fn diagonal_line_uses_slope_glyph() {
        let mut canvas = canvas();
        canvas.line(Position::new(0.0, 0.0), Position::new(49.0, 49.0));
        for i in 0..5 {
            assert_eq!(canvas.cell(i, i).unwrap().glyph, '\\');
        }
    }

    #[test]
    fn light_stroke_does_not_overwrite() {
        let mut canvas = canvas();
        canvas.line(Position::new(0.0, 0.0), Position::new(0.0, 99.0));
        canvas.set_stroke(StrokeStyle::Light);
        canvas.line(Position::new(0.0, 15.0), Position::new(199.0, 15.0));
        canvas.reset_stroke();
        assert_eq!(canvas.cell(0, 1).unwrap().glyph, '|');
        let light = canvas.cell(5, 1).unwrap();
        assert_eq!(light.glyph, '.');
        assert_eq!(light.style, StrokeStyle::Light);
    }

    #[test]
    fn clipped_primitives_are_ignored() {
        let mut canvas = canvas();
        canvas.circle(Position::new(-500.0, -500.0), 10.0);
        canvas.text(Position::new(190.0, 0.0), "overflow");
        assert_eq!(canvas.row_text(0), format!("{}o", " ".repeat(19)));
    }

    #[test]
    fn small_circle_is_one_cell() {
        let mut canvas = canvas();
        canvas.circle(Position::new(55.0, 55.0), 2.0);
        assert_eq!(canvas.cell(5, 5).unwrap().glyph, 'O');
        canvas.clear();
        assert!(canvas.lines().all(|row| row.iter().all(Cell::is_empty)));
    }

    #[test]
    fn recording_canvas_starts_fresh_on_clear() {
        let mut canvas = RecordingCanvas::new();
        canvas.line(Position::default(), Position::new(1.0, 1.0));
        canvas.clear();
        canvas.circle(Position::new(3.0, 4.0), 5.0);
        assert_eq!(canvas.frames, 1);
        assert_eq!(canvas.calls.len(), 2);
        assert_eq!(canvas.circles(), vec![(Position::new(3.0, 4.0), 5.0)]);
        assert!(canvas.lines().is_empty());
    }
}
