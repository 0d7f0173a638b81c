use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    backend::{DrawBackend, Surface, SurfaceFactory, image::ImageInfo, text::FontDescription},
    error::WindowError,
    geom::{Point, Rect, Size},
    style::{Color, Source},
    WindowId,
};

/// One recorded drawing call. Coordinates are absolute: the backend applies
/// its own translation stack before recording.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// State pushed.
    Save,
    /// State popped.
    Restore,
    /// Clip intersected with a rectangle.
    Clip(Rect),
    /// Source set.
    Source(Source),
    /// Line width set.
    LineWidth(f64),
    /// Dash pattern set.
    Dash(Vec<f64>, f64),
    /// Sub-path started.
    MoveTo(Point),
    /// Line segment added.
    LineTo(Point),
    /// Curve added.
    CurveTo(Point, Point, Point),
    /// Rectangle added.
    Rectangle(Rect),
    /// Arc added.
    Arc {
        /// Centre.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Sub-path closed.
    ClosePath,
    /// Path filled.
    Fill,
    /// Path stroked.
    Stroke,
    /// Clip painted.
    Paint,
    /// Text drawn.
    Text {
        /// The string.
        text: String,
        /// Top-left corner.
        at: Point,
    },
    /// Image blitted.
    Image {
        /// Source pixel size.
        size: (u32, u32),
        /// Destination.
        dest: Rect,
    },
}

#[derive(Debug, Default)]
struct LogState {
    ops: Vec<DrawOp>,
    depth: usize,
    presents: Vec<Rect>,
    failing: bool,
}

/// A shared handle onto what a [`RecordingBackend`] drew.
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Arc<Mutex<LogState>>);

impl DrawLog {
    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every recorded operation.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.lock().ops.clone()
    }

    /// Forget recorded operations and presents.
    pub fn clear(&self) {
        let mut l = self.lock();
        l.ops.clear();
        l.presents.clear();
    }

    /// Current save depth. Zero between frames when saves and restores pair
    /// up.
    pub fn depth(&self) -> usize {
        self.lock().depth
    }

    /// Solid rectangle fills, in order: the filled rectangle and its colour.
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        let l = self.lock();
        let mut out = vec![];
        let mut source = None;
        let mut path = vec![];
        for op in &l.ops {
            match op {
                DrawOp::Source(Source::Solid(c)) => source = Some(*c),
                DrawOp::Source(_) => source = None,
                DrawOp::Rectangle(r) => path.push(*r),
                DrawOp::Fill => {
                    if let (Some(c), [r]) = (source, path.as_slice()) {
                        out.push((*r, c));
                    }
                    path.clear();
                }
                DrawOp::Stroke | DrawOp::MoveTo(_) => path.clear(),
                _ => {}
            }
        }
        out
    }

    /// Text drawn, in order, with absolute positions.
    pub fn texts(&self) -> Vec<(String, Point)> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, at } => Some((text.clone(), *at)),
                _ => None,
            })
            .collect()
    }

    /// Does any drawn text contain `s`?
    pub fn contains_text(&self, s: &str) -> bool {
        self.texts().iter().any(|(t, _)| t.contains(s))
    }

    /// Damage rectangles passed to `present`.
    pub fn presents(&self) -> Vec<Rect> {
        self.lock().presents.clone()
    }

    /// Make later presents on the owning surface fail or succeed.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

/// A [`DrawBackend`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    log: DrawLog,
    offset: Point,
    stack: Vec<Point>,
}

impl RecordingBackend {
    /// Create a backend and the log it records into.
    pub fn create() -> (DrawLog, Self) {
        let log = DrawLog::default();
        (
            log.clone(),
            Self {
                log,
                ..Self::default()
            },
        )
    }

    fn push(&self, op: DrawOp) {
        self.log.lock().ops.push(op);
    }

    fn abs(&self, p: Point) -> Point {
        p + self.offset
    }

    fn abs_rect(&self, r: Rect) -> Rect {
        r.translate(self.offset)
    }
}

impl DrawBackend for RecordingBackend {
    fn save(&mut self) {
        self.stack.push(self.offset);
        self.log.lock().depth += 1;
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(o) = self.stack.pop() {
            self.offset = o;
            let mut l = self.log.lock();
            l.depth = l.depth.saturating_sub(1);
        }
        self.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset = self.offset.offset(dx, dy);
    }

    fn clip(&mut self, rect: Rect) {
        self.push(DrawOp::Clip(self.abs_rect(rect)));
    }

    fn set_source(&mut self, source: &Source) {
        self.push(DrawOp::Source(source.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.push(DrawOp::Dash(dashes.to_vec(), offset));
    }

    fn move_to(&mut self, p: Point) {
        self.push(DrawOp::MoveTo(self.abs(p)));
    }

    fn line_to(&mut self, p: Point) {
        self.push(DrawOp::LineTo(self.abs(p)));
    }

    fn curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.push(DrawOp::CurveTo(self.abs(c1), self.abs(c2), self.abs(end)));
    }

    fn rectangle(&mut self, rect: Rect) {
        self.push(DrawOp::Rectangle(self.abs_rect(rect)));
    }

    fn arc(&mut self, center: Point, radius: f64, _start: f64, _end: f64) {
        self.push(DrawOp::Arc {
            center: self.abs(center),
            radius,
        });
    }

    fn close_path(&mut self) {
        self.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }

    fn paint(&mut self) {
        self.push(DrawOp::Paint);
    }

    fn show_text(&mut self, _font: &FontDescription, text: &str, at: Point) {
        self.push(DrawOp::Text {
            text: text.into(),
            at: self.abs(at),
        });
    }

    fn draw_image(&mut self, image: &ImageInfo, dest: Rect) {
        self.push(DrawOp::Image {
            size: (image.width, image.height),
            dest: self.abs_rect(dest),
        });
    }
}

/// A [`Surface`] over a [`RecordingBackend`].
#[derive(Debug)]
pub struct RecordingSurface {
    size: Size,
    backend: RecordingBackend,
}

impl RecordingSurface {
    /// A surface of the given size, and its log.
    pub fn create(size: Size) -> (DrawLog, Self) {
        let (log, backend) = RecordingBackend::create();
        (log, Self { size, backend })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) -> Result<(), WindowError> {
        self.size = size;
        Ok(())
    }

    fn backend(&mut self) -> &mut dyn DrawBackend {
        &mut self.backend
    }

    fn present(&mut self, damage: Rect) -> Result<(), WindowError> {
        let mut log = self.backend.log.lock();
        if log.failing {
            return Err(WindowError::Present("surface lost".into()));
        }
        log.presents.push(damage);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    failing: bool,
    created: Vec<(WindowId, String, DrawLog)>,
}

/// A [`SurfaceFactory`] producing [`RecordingSurface`]s. Clones share state,
/// so a test can keep one while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory(Arc<Mutex<FactoryState>>);

impl RecordingFactory {
    /// A factory that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose creations fail.
    pub fn failing() -> Self {
        let f = Self::default();
        f.set_failing(true);
        f
    }

    fn lock(&self) -> MutexGuard<'_, FactoryState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make later creations fail or succeed.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Number of surfaces created.
    pub fn created(&self) -> usize {
        self.lock().created.len()
    }

    /// The draw log of a window's surface.
    pub fn log(&self, id: WindowId) -> Option<DrawLog> {
        self.lock()
            .created
            .iter()
            .find(|(w, _, _)| *w == id)
            .map(|(_, _, log)| log.clone())
    }

    /// Titles of created windows, in creation order.
    pub fn titles(&self) -> Vec<String> {
        self.lock().created.iter().map(|(_, t, _)| t.clone()).collect()
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(
        &mut self,
        id: WindowId,
        title: &str,
        size: Size,
    ) -> Result<Box<dyn Surface>, WindowError> {
        let mut state = self.lock();
        if state.failing {
            return Err(WindowError::Create(format!("refusing to create {title:?}")));
        }
        let (log, surface) = RecordingSurface::create(size);
        state.created.push((id, title.into(), log));
        Ok(Box::new(surface))
    }
}
