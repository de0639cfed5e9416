//! The view/zoom state machine.  An `Explorer` owns everything that
//! changes as the user moves around the set: the plane window, the
//! zoom level, the iteration budget derived from it, the last cursor
//! position, and the rendered pixel buffer.  Input drives the
//! mutators, each of which marks the view dirty; `render` recomputes
//! the buffer when and only when the view is dirty.  One driving
//! context is expected to call everything here in sequence — the
//! explorer carries no locks.

use num::{clamp, Complex};
use num_cpus;

use planes::{Pixel, PixelGrid, PlaneError, PlaneView, ViewWindow};
use render::{render_frame, FrameSnapshot, PixelCell};

// The span of the plane at zoom level zero, before the aspect-ratio
// stretch, and the factor each zoom-in multiplies it by.
const BASE_WIDTH: f64 = 4.0;
const BASE_HEIGHT: f64 = 4.0;
const ZOOM_FACTOR: f64 = 0.5;

// The iteration budget grows linearly with the zoom level, clamped so
// that deep zoom sacrifices boundary sharpness instead of frame time.
const BASE_ITERATIONS: i64 = 64;
const ITERATIONS_PER_ZOOM_STEP: i64 = 32;
const MIN_ITERATIONS: i64 = 64;
const MAX_ITERATIONS: i64 = 2048;

/// Whether the pixel buffer still matches the view parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// A view mutation has happened since the last completed pass;
    /// the buffer shows a stale frame until `render` runs.
    Dirty,
    /// The buffer reflects the current view.  `render` is a no-op.
    Clean,
}

/// The explorable view of the Mandelbrot set.  Construct one per host
/// surface, feed it input, call `render` once per frame, and draw the
/// pixel buffer it exposes.
pub struct Explorer {
    view: PlaneView,
    zoom_level: i32,
    budget: u32,
    state: RenderState,
    cursor: Complex<f64>,
    buffer: Vec<PixelCell>,
    workers: usize,
}

impl Explorer {
    /// Constructor.  Takes the host surface size in pixels, which is
    /// fixed for the explorer's lifetime, and refuses a surface with
    /// no area.  The initial view is centered on the origin, spanning
    /// four plane units across with the height scaled to the surface's
    /// aspect ratio, at zoom level zero.
    pub fn new(pixel_width: usize, pixel_height: usize) -> Result<Explorer, PlaneError> {
        let grid = PixelGrid::new(pixel_width, pixel_height)?;
        let window = ViewWindow {
            center: Complex::new(0.0, 0.0),
            width: BASE_WIDTH,
            height: BASE_HEIGHT * grid.aspect_ratio(),
        };
        let buffer = vec![PixelCell::default(); grid.len()];
        Ok(Explorer {
            view: PlaneView { grid, window },
            zoom_level: 0,
            budget: BASE_ITERATIONS as u32,
            state: RenderState::Dirty,
            cursor: Complex::new(0.0, 0.0),
            buffer,
            workers: num_cpus::get().min(pixel_height).max(1),
        })
    }

    /// Overrides the worker count chosen at construction.  The frame a
    /// pass produces does not depend on it; tests use this to pin the
    /// fan-out, a host might use it to leave cores free.
    pub fn with_workers(mut self, workers: usize) -> Explorer {
        self.workers = workers.max(1).min(self.view.grid.height());
        self
    }

    /// Zooms in one step: the window shrinks by half in each axis and
    /// the iteration budget grows by one linear step.  Marks the view
    /// dirty.  The center stays put; recentering is `set_center`'s job.
    pub fn zoom_in(&mut self) {
        self.zoom_level += 1;
        self.rescale();
    }

    /// Zooms out one step: the window doubles in each axis and the
    /// budget shrinks by one linear step, never below its floor.
    /// Marks the view dirty.
    pub fn zoom_out(&mut self) {
        self.zoom_level -= 1;
        self.rescale();
    }

    // Recomputes the window span and the budget from the zoom level.
    // The span is exponential in the level, the budget linear; the
    // budget math runs in i64 so a deep zoom-out cannot wrap before
    // the clamp catches it.
    fn rescale(&mut self) {
        let scale = ZOOM_FACTOR.powi(self.zoom_level);
        self.view.window.width = BASE_WIDTH * scale;
        self.view.window.height = BASE_HEIGHT * self.view.grid.aspect_ratio() * scale;
        let candidate = BASE_ITERATIONS + i64::from(self.zoom_level) * ITERATIONS_PER_ZOOM_STEP;
        self.budget = clamp(candidate, MIN_ITERATIONS, MAX_ITERATIONS) as u32;
        self.state = RenderState::Dirty;
        debug!(
            "zoom level {}: window {}x{}, budget {}",
            self.zoom_level, self.view.window.width, self.view.window.height, self.budget
        );
    }

    /// Recenters the window on the plane coordinate currently under
    /// the given pixel.  Marks the view dirty.
    pub fn set_center(&mut self, pixel: Pixel) {
        self.view.window.center = self.view.pixel_to_point(pixel);
        self.state = RenderState::Dirty;
        debug!("recentered on {}", self.view.window.center);
    }

    /// Notes the plane coordinate currently under the given pixel, for
    /// the status text.  Purely informational: the view stays clean
    /// and nothing re-renders.
    pub fn set_cursor(&mut self, pixel: Pixel) {
        self.cursor = self.view.pixel_to_point(pixel);
    }

    /// Recomputes the pixel buffer if the view is dirty, blocking
    /// until the pass completes; a no-op when the view is clean.  The
    /// old buffer stays readable until the new frame is finished, and
    /// the view is marked clean only after the swap — a half-rendered
    /// frame is never observable.
    pub fn render(&mut self) {
        if self.state == RenderState::Clean {
            return;
        }
        let snapshot = FrameSnapshot {
            view: self.view,
            budget: self.budget,
        };
        self.buffer = render_frame(snapshot, self.workers);
        self.state = RenderState::Clean;
    }

    /// The rendered frame, row-major, one cell per pixel.  Read-only;
    /// the host draws from it once per frame.
    pub fn pixel_buffer(&self) -> &[PixelCell] {
        &self.buffer
    }

    /// The current grid-and-window pairing, copied out.  Hosts use it
    /// to translate plane coordinates to pixels before recentering.
    pub fn view(&self) -> PlaneView {
        self.view
    }

    /// The current zoom level.  Zero at construction, up on zoom-in,
    /// down on zoom-out, unbounded either way.
    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// The iteration budget in force for the current view.
    pub fn iterations(&self) -> u32 {
        self.budget
    }

    /// Whether the buffer matches the view.
    pub fn render_state(&self) -> RenderState {
        self.state
    }

    /// The plane coordinate last reported under the pointer.
    pub fn cursor(&self) -> Complex<f64> {
        self.cursor
    }

    /// The overlay text for the host to draw: the title, the view
    /// center, the cursor coordinate, the zoom instructions, and the
    /// iteration budget, one per line.
    pub fn status_text(&self) -> String {
        format!(
            "Mandelbrot Set\n\
             Center: ({},{})\n\
             Cursor: ({},{})\n\
             Left-click to Zoom in\n\
             Right-click to Zoom out\n\
             Iterations: {}",
            self.view.window.center.re,
            self.view.window.center.im,
            self.cursor.re,
            self.cursor.im,
            self.budget
        )
    }
}
