//! Contains the PlaneMapper struct, which describes a relationship
//! between a raster on the integral plane with an origin at 0,0, and
//! a window on the real plane with an arbitrary pair of corners
//! defining the leftlower and rightupper corners of that window.
//! Also hosts the accumulation step shared by both Buddhabrot
//! sampling modes: mapping an orbit's recorded points to raster
//! offsets and incrementing them.
use num::Complex;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0 and all values are assumed to be
/// non-negative integers.
#[derive(Copy, Clone, Debug)]
pub struct Raster(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// sampled window on the complex plane, treating the real part of
/// each value as the x-component and the imaginary part as the
/// y-component.
#[derive(Copy, Clone, Debug)]
pub struct Window(pub Complex<f64>, pub Complex<f64>);

/// Maps points on the real plane to offsets in a row-major raster
/// buffer.  The mapping is affine, truncates toward zero, and is
/// half-open: a point exactly on the leftlower corner lands on pixel
/// 0, a point exactly on the rightupper corner falls off the far edge
/// and is dropped.
///
/// A degenerate window (zero width or height) is tolerated rather
/// than rejected; its inverse ranges go infinite and nearly every
/// point then fails the bounds check.  Callers who care validate
/// their own geometry.
#[derive(Debug)]
pub struct PlaneMapper {
    /// Width and height of the raster.  The left-lower corner is
    /// assumed to be at 0,0.
    pub raster: Raster,
    /// The two corners of the sampled window, left-lower and
    /// right-upper.
    pub window: Window,
    // Pixels per unit of window width and height.
    inv_range: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the raster dimensions and the two corners
    /// of the window on the complex plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> PlaneMapper {
        let inv_range = (
            (width as f64) / (rightupper.re - leftlower.re),
            (height as f64) / (rightupper.im - leftlower.im),
        );
        PlaneMapper {
            raster: Raster(width, height),
            window: Window(leftlower, rightupper),
            inv_range,
        }
    }

    /// The total number of cells in the raster.  Used to size the
    /// output buffer.
    pub fn len(&self) -> usize {
        self.raster.0 * self.raster.1
    }

    /// Describes that the raster is of a size.
    pub fn is_empty(&self) -> bool {
        self.raster.0 == 0 || self.raster.1 == 0
    }

    /// Given a location on the complex plane, map it to the linear
    /// offset of the raster cell it falls in, or None if it falls
    /// outside the raster.  Truncation is toward zero, so a point a
    /// fraction below the window still lands on row or column 0; the
    /// fringe is a single cell wide and invisible at any real
    /// resolution.
    pub fn point_to_offset(&self, x: f64, y: f64) -> Option<usize> {
        let left = ((x - self.window.0.re) * self.inv_range.0) as isize;
        let top = ((y - self.window.0.im) * self.inv_range.1) as isize;
        if left < 0
            || left >= (self.raster.0 as isize)
            || top < 0
            || top >= (self.raster.1 as isize)
        {
            return None;
        }
        Some((top as usize) * self.raster.0 + (left as usize))
    }

    /// Since the Buddhabrot tracks the progress of an orbit across
    /// the complex plane, we have to map the orbit's recorded points
    /// back to the raster and increment each cell the orbit passed
    /// through.  Takes the two parallel coordinate sequences recorded
    /// by the scanner and adds weight 1.0 per in-bounds point;
    /// out-of-bounds points are dropped silently.
    pub fn accumulate(&self, xs: &[f64], ys: &[f64], image: &mut [f64]) {
        assert!(image.len() == self.len());
        for (x, y) in xs.iter().zip(ys.iter()) {
            if let Some(offset) = self.point_to_offset(*x, *y) {
                image[offset] += 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_to_offset_on_positive_windows() {
        let pm = PlaneMapper::new(5, 5, Complex::new(0.0, 0.0), Complex::new(5.0, 5.0));
        assert_eq!(pm.point_to_offset(0.0, 0.0), Some(0));
        assert_eq!(pm.point_to_offset(2.0, 2.0), Some(12));
        assert_eq!(pm.point_to_offset(4.0, 4.0), Some(24));
    }

    #[test]
    fn point_to_offset_on_mixed_windows() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0));
        assert_eq!(pm.point_to_offset(-2.0, -2.0), Some(0));
        assert_eq!(pm.point_to_offset(0.0, 0.0), Some(10));
        assert_eq!(pm.point_to_offset(1.999, 1.999), Some(15));
    }

    #[test]
    fn window_edges_are_half_open() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0));
        // Lower edges are inside, upper edges map one past the raster.
        assert_eq!(pm.point_to_offset(-2.0, 0.0), Some(8));
        assert_eq!(pm.point_to_offset(2.0, 0.0), None);
        assert_eq!(pm.point_to_offset(0.0, 2.0), None);
        assert_eq!(pm.point_to_offset(-3.5, 0.0), None);
        assert_eq!(pm.point_to_offset(0.0, -3.5), None);
        // Truncation toward zero keeps the fringe just below the
        // window on row/column 0.
        assert_eq!(pm.point_to_offset(-2.5, 0.0), Some(8));
    }

    #[test]
    fn accumulate_drops_out_of_bounds_silently() {
        let pm = PlaneMapper::new(2, 2, Complex::new(0.0, 0.0), Complex::new(2.0, 2.0));
        let xs = [0.5, 1.5, 3.0, 0.5];
        let ys = [0.5, 1.5, 0.5, -1.0];
        let mut image = vec![0.0f64; pm.len()];
        pm.accumulate(&xs, &ys, &mut image);
        assert_eq!(image, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_window_drops_everything_finite() {
        let pm = PlaneMapper::new(4, 4, Complex::new(1.0, -2.0), Complex::new(1.0, 2.0));
        assert_eq!(pm.point_to_offset(5.0, 0.0), None);
        assert_eq!(pm.point_to_offset(-5.0, 0.0), None);
    }
}
