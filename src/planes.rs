//! Describes the relationship between the pixel grid the host draws
//! on, with its origin at 0,0, and the window of the complex plane
//! currently on display, described by its center and the span it
//! covers.  Every conversion between the two planes in the whole
//! crate goes through this module, so a coordinate computed for the
//! render pass and the same coordinate computed for a recenter or a
//! cursor readout are bit-identical.

use num::clamp;
use num::Complex;

/// Errors produced while setting up the planes.
#[derive(Debug, Fail)]
pub enum PlaneError {
    /// The host asked for a pixel grid with no area.  There is nothing
    /// sensible to render onto, so construction refuses outright.
    #[fail(display = "invalid pixel dimensions {}x{}: the grid must have area", width, height)]
    InvalidDimensions {
        /// The requested number of pixel columns.
        width: usize,
        /// The requested number of pixel rows.
        height: usize,
    },
}

/// The x, y of a point on the pixel grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// The size of the pixel grid, assumed to start at 0,0.  Fixed for
/// the lifetime of the renderer: the host hands us its surface size
/// once, at construction, and never again.
#[derive(Copy, Clone, Debug)]
pub struct PixelGrid {
    width: usize,
    height: usize,
}

impl PixelGrid {
    /// Constructor.  Refuses grids with a zero dimension; everything
    /// downstream divides by these.
    pub fn new(width: usize, height: usize) -> Result<PixelGrid, PlaneError> {
        if width == 0 || height == 0 {
            return Err(PlaneError::InvalidDimensions { width, height });
        }
        Ok(PixelGrid { width, height })
    }

    /// The number of pixel columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of pixel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of pixels in the grid.  Used to size buffers.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false once constructed; the constructor refuses empty
    /// grids.  Kept alongside `len` for form's sake.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height over width.  The plane window is stretched by this so
    /// that a square of the plane stays square on a rectangular grid.
    pub fn aspect_ratio(&self) -> f64 {
        (self.height as f64) / (self.width as f64)
    }
}

/// The window of the complex plane currently on display: where it is
/// centered, and how much of the plane it spans.  The real part of
/// the center is the x-component, the imaginary part the
/// y-component.  The spans are kept positive by the zoom math, which
/// only ever scales the base spans by powers of one half.
#[derive(Copy, Clone, Debug)]
pub struct ViewWindow {
    /// The plane coordinate at the middle of the grid.
    pub center: Complex<f64>,
    /// How much of the real axis the window covers.
    pub width: f64,
    /// How much of the imaginary axis the window covers.
    pub height: f64,
}

/// One pixel grid paired with one plane window: everything needed to
/// say which complex number lives under which pixel.  Copied by value
/// into every render worker, so a worker can never observe a view
/// mutation mid-pass.
#[derive(Copy, Clone, Debug)]
pub struct PlaneView {
    /// The fixed pixel grid.
    pub grid: PixelGrid,
    /// The current plane window.
    pub window: ViewWindow,
}

impl PlaneView {
    // Plane units per pixel, in each axis.
    fn steps(&self) -> (f64, f64) {
        (
            self.window.width / (self.grid.width as f64),
            self.window.height / (self.grid.height as f64),
        )
    }

    // The plane coordinate under pixel 0,0.
    fn origin(&self) -> Complex<f64> {
        Complex::new(
            self.window.center.re - self.window.width / 2.0,
            self.window.center.im - self.window.height / 2.0,
        )
    }

    /// Given a pixel on the grid, the complex number that lives under
    /// it.  Affine in the pixel coordinate: pixel times step plus the
    /// window origin.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        let (step_x, step_y) = self.steps();
        let origin = self.origin();
        Complex::new(
            (pixel.0 as f64) * step_x + origin.re,
            (pixel.1 as f64) * step_y + origin.im,
        )
    }

    /// Given a complex number, the nearest pixel of the grid.  Points
    /// outside the window clamp to the grid's edge.  This is the
    /// inverse the host uses to ask "where does this plane coordinate
    /// sit right now?" before recentering on it.
    pub fn point_to_pixel(&self, point: Complex<f64>) -> Pixel {
        let (step_x, step_y) = self.steps();
        let origin = self.origin();
        let left = ((point.re - origin.re) / step_x).round();
        let top = ((point.im - origin.im) / step_y).round();
        Pixel(
            clamp(left, 0.0, (self.grid.width - 1) as f64) as usize,
            clamp(top, 0.0, (self.grid.height - 1) as f64) as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn square_view(pixels: usize, span: f64) -> PlaneView {
        PlaneView {
            grid: PixelGrid::new(pixels, pixels).unwrap(),
            window: ViewWindow {
                center: Complex::new(0.0, 0.0),
                width: span,
                height: span,
            },
        }
    }

    #[test]
    fn grid_fails_on_zero_dimensions() {
        assert!(PixelGrid::new(0, 480).is_err());
        assert!(PixelGrid::new(640, 0).is_err());
        assert!(PixelGrid::new(0, 0).is_err());
    }

    #[test]
    fn grid_passes_on_positive_dimensions() {
        let grid = PixelGrid::new(640, 480).unwrap();
        assert_eq!(grid.width(), 640);
        assert_eq!(grid.height(), 480);
        assert_eq!(grid.len(), 640 * 480);
        assert!(!grid.is_empty());
        assert_eq!(grid.aspect_ratio(), 0.75);
    }

    #[test]
    fn invalid_dimensions_name_the_request() {
        match PixelGrid::new(0, 480) {
            Err(PlaneError::InvalidDimensions { width, height }) => {
                assert_eq!(width, 0);
                assert_eq!(height, 480);
            }
            Ok(_) => panic!("a zero-width grid was accepted"),
        }
    }

    #[test]
    fn pixel_to_point_on_a_centered_window() {
        // Four pixels across four plane units: one unit per step,
        // origin at -2,-2.
        let view = square_view(4, 4.0);
        assert_eq!(view.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(view.pixel_to_point(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(view.pixel_to_point(Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn pixel_to_point_follows_the_center() {
        let mut view = square_view(4, 4.0);
        view.window.center = Complex::new(1.0, -1.0);
        assert_eq!(view.pixel_to_point(Pixel(0, 0)), Complex::new(-1.0, -3.0));
        assert_eq!(view.pixel_to_point(Pixel(2, 2)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn pixel_to_point_is_affine_in_the_pixel() {
        let view = PlaneView {
            grid: PixelGrid::new(640, 480).unwrap(),
            window: ViewWindow {
                center: Complex::new(-0.5, 0.25),
                width: 3.0,
                height: 2.25,
            },
        };
        let step_x = 3.0 / 640.0;
        let step_y = 2.25 / 480.0;
        for (x, y) in iproduct!((0..640).step_by(17), (0..480).step_by(13)) {
            let here = view.pixel_to_point(Pixel(x, y));
            let right = view.pixel_to_point(Pixel(x + 1, y));
            let below = view.pixel_to_point(Pixel(x, y + 1));
            assert!((right.re - here.re - step_x).abs() < 1e-12);
            assert!((below.im - here.im - step_y).abs() < 1e-12);
        }
    }

    #[test]
    fn point_to_pixel_rounds_to_the_nearest_pixel() {
        let view = square_view(4, 4.0);
        assert_eq!(view.point_to_pixel(Complex::new(0.0, 0.0)), Pixel(2, 2));
        assert_eq!(view.point_to_pixel(Complex::new(0.4, -0.6)), Pixel(2, 1));
        assert_eq!(view.point_to_pixel(Complex::new(-2.0, -2.0)), Pixel(0, 0));
    }

    #[test]
    fn point_to_pixel_clamps_to_the_grid() {
        let view = square_view(4, 4.0);
        assert_eq!(view.point_to_pixel(Complex::new(50.0, 0.0)), Pixel(3, 2));
        assert_eq!(view.point_to_pixel(Complex::new(-50.0, -50.0)), Pixel(0, 0));
    }

    #[test]
    fn the_inverse_recovers_every_pixel() {
        let view = PlaneView {
            grid: PixelGrid::new(64, 48).unwrap(),
            window: ViewWindow {
                center: Complex::new(-0.74529, 0.113075),
                width: 1.5e-4,
                height: 1.125e-4,
            },
        };
        for (x, y) in iproduct!(0..64, 0..48) {
            let point = view.pixel_to_point(Pixel(x, y));
            assert_eq!(view.point_to_pixel(point), Pixel(x, y));
        }
    }
}
