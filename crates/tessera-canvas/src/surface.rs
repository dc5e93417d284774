//! Software drawing surface rendered into terminal cells.
//!
//! Each terminal cell covers [`CELL_WIDTH_PX`] × [`CELL_HEIGHT_PX`] surface
//! pixels and shows two samples, the upper and lower half, drawn with `▀`.

use kurbo::{BezPath, PathEl, Point, Shape};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use tessera_core::{DrawingContext, FillStyle, Rgb};

/// Surface pixels per terminal column.
pub const CELL_WIDTH_PX: f64 = 8.0;
/// Surface pixels per terminal row.
pub const CELL_HEIGHT_PX: f64 = 16.0;

const SAMPLE_HEIGHT_PX: f64 = CELL_HEIGHT_PX / 2.0;

/// A [`DrawingContext`] backed by a grid of half-cell samples.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    width: f64,
    height: f64,
    /// Row-major, `cols × rows * 2`. `None` is transparent.
    samples: Vec<Option<Rgb>>,
    /// Shown through transparent samples and blended under translucent fills.
    backdrop: Rgb,
    fill: FillStyle,
    path: BezPath,
    /// First point of the open subpath, `None` before any `move_to`.
    subpath_start: Option<Point>,
}

impl TerminalSurface {
    /// A surface covering `cols × rows` terminal cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::sized(cols, rows, cols as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
    }

    /// A surface with an exact pixel size, backed by enough cells to cover it.
    pub fn with_pixel_size(width: f64, height: f64) -> Self {
        let cols = (width.max(0.0) / CELL_WIDTH_PX).ceil() as u16;
        let rows = (height.max(0.0) / CELL_HEIGHT_PX).ceil() as u16;
        Self::sized(cols, rows, width.max(0.0), height.max(0.0))
    }

    fn sized(cols: u16, rows: u16, width: f64, height: f64) -> Self {
        Self {
            cols,
            rows,
            width,
            height,
            samples: vec![None; cols as usize * rows as usize * 2],
            backdrop: Rgb::new(0, 0, 0),
            fill: Rgb::new(0, 0, 0).into(),
            path: BezPath::new(),
            subpath_start: None,
        }
    }

    /// Match a new terminal size. Clears the surface.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let backdrop = self.backdrop;
        *self = Self::new(cols, rows);
        self.backdrop = backdrop;
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn set_backdrop(&mut self, backdrop: Rgb) {
        self.backdrop = backdrop;
    }

    /// Color of the sample covering pixel `(x, y)`, `None` if transparent or off-surface.
    pub fn sample_at(&self, x: f64, y: f64) -> Option<Rgb> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let sx = (x / CELL_WIDTH_PX).floor() as usize;
        let sy = (y / SAMPLE_HEIGHT_PX).floor() as usize;
        self.sample(sx, sy)
    }

    fn sample_cols(&self) -> usize {
        self.cols as usize
    }

    fn sample_rows(&self) -> usize {
        self.rows as usize * 2
    }

    fn sample(&self, sx: usize, sy: usize) -> Option<Rgb> {
        if sx >= self.sample_cols() || sy >= self.sample_rows() {
            return None;
        }
        self.samples[sy * self.sample_cols() + sx]
    }

    /// Whether the last subpath has segments that were never closed.
    fn subpath_is_open(&self) -> bool {
        matches!(
            self.path.elements().last(),
            Some(PathEl::LineTo(_) | PathEl::QuadTo(..) | PathEl::CurveTo(..))
        )
    }

    /// Sample index range whose centers fall in `[start, start + len)`.
    fn span(start: f64, len: f64, step: f64, limit: usize) -> std::ops::Range<usize> {
        let (start, end) = if len < 0.0 {
            (start + len, start)
        } else {
            (start, start + len)
        };
        let first = (start / step - 0.5).ceil().max(0.0) as usize;
        let last = ((end / step - 0.5).ceil().max(0.0) as usize).min(limit);
        first.min(last)..last
    }

    fn for_each_sample(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mut f: impl FnMut(&mut Option<Rgb>, Rgb),
    ) {
        let cols = self.sample_cols();
        let xs = Self::span(x, width, CELL_WIDTH_PX, cols);
        let ys = Self::span(y, height, SAMPLE_HEIGHT_PX, self.sample_rows());
        let backdrop = self.backdrop;
        for sy in ys {
            for sx in xs.clone() {
                f(&mut self.samples[sy * cols + sx], backdrop);
            }
        }
    }
}

impl DrawingContext for TerminalSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if self.subpath_is_open() {
            self.path.close_path();
        }
        self.path.move_to((x, y));
        self.subpath_start = Some(Point::new(x, y));
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        if self.subpath_start.is_none() {
            self.move_to(cpx, cpy);
        }
        self.path.quad_to((cpx, cpy), (x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.subpath_start.is_none() {
            self.move_to(x, y);
            return;
        }
        self.path.line_to((x, y));
    }

    /// Close back to the subpath's first point and continue from there.
    fn close_path(&mut self) {
        let Some(start) = self.subpath_start else {
            return;
        };
        self.path.close_path();
        self.path.move_to(start);
    }

    /// Open subpaths count as closed, like a canvas fill.
    fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        let point = Point::new(x, y);
        if self.subpath_is_open() {
            let mut path = self.path.clone();
            path.close_path();
            return path.contains(point);
        }
        self.path.contains(point)
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill = style;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let fill = self.fill;
        if fill.alpha <= 0.0 {
            return;
        }
        self.for_each_sample(x, y, width, height, |sample, backdrop| {
            *sample = Some(fill.over(sample.unwrap_or(backdrop)));
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.for_each_sample(x, y, width, height, |sample, _| *sample = None);
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let to_color = |sample: Option<Rgb>| {
            let rgb = sample.unwrap_or(self.backdrop);
            Color::Rgb(rgb.r, rgb.g, rgb.b)
        };

        for row in 0..area.height.min(self.rows) {
            for col in 0..area.width.min(self.cols) {
                let upper = self.sample(col as usize, row as usize * 2);
                let lower = self.sample(col as usize, row as usize * 2 + 1);
                buf[(area.x + col, area.y + row)]
                    .set_char('▀')
                    .set_fg(to_color(upper))
                    .set_bg(to_color(lower));
            }
        }
    }
}
