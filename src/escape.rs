// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  `iter_point` measures how quickly the
//! quadratic recurrence z = z*z + c leaves a disc of radius R, with a
//! logarithmic correction that turns the integer escape count into a
//! continuous value, and `mandelbrot` evaluates it over a square
//! window to produce the classic smooth-colored field.

use itertools::iproduct;
use num::Complex;

/// Smooth escape count for a single seed.  Starting from z = c, the
/// recurrence runs until |z|^2 exceeds R^2 or the iteration budget
/// `n` is exhausted; the reported count is the index of the last
/// completed escape check, so a seed already outside the radius
/// reports from the first check and a bound orbit reports n-1.
///
/// The smoothing branch deliberately re-tests the final squared
/// magnitude against the constant 4.0, not R^2.  With R below 2 an
/// orbit can escape the test radius yet finish inside the smoothing
/// threshold, in which case the raw count comes back uncorrected.
/// Longstanding behavior; callers rely on it.
pub fn iter_point(c: Complex<f64>, n: u32, radius: f64) -> f64 {
    let r2max = radius * radius;
    let mut z = c;
    let mut i = 1;
    for step in 1..n {
        i = step;
        if z.norm_sqr() > r2max {
            break;
        }
        z = z * z + c;
    }
    let r2 = z.norm_sqr();
    if r2 > 4.0 {
        // Escape already implies r2 > 4, so the inner log2 is safely
        // positive.
        f64::from(i) - (0.5 * r2.log2()).log2()
    } else {
        f64::from(i)
    }
}

/// Evaluates `iter_point` over a square view centered on (cx, cy)
/// with half-width `d`, writing one smooth count per cell of the
/// row-major `result` buffer.  The grid spans the view corner to
/// corner, so column 0 sits exactly on cx - d and the last column
/// exactly on cx + d.
pub fn mandelbrot(
    cx: f64,
    cy: f64,
    d: f64,
    height: usize,
    width: usize,
    result: &mut [f64],
    n: u32,
    radius: f64,
) {
    assert!(result.len() == width * height);
    let x0 = cx - d;
    let y0 = cy - d;
    let dx = 2.0 * d / ((width as f64) - 1.0);
    let dy = 2.0 * d / ((height as f64) - 1.0);
    for (i, j) in iproduct!(0..height, 0..width) {
        let c = Complex::new(x0 + (j as f64) * dx, y0 + (i as f64) * dy);
        result[i * width + j] = iter_point(c, n, radius);
    }
}
