// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Buddhabrot scanners.  Both modes run the quadratic recurrence
//! z = z*z + c from the origin, recording each iterate into
//! caller-owned scratch buffers; when an orbit escapes, every point
//! it visited before the escaping one is handed to the plane's
//! accumulator.  Orbits that exhaust the iteration budget without
//! escaping contribute nothing.
//!
//! Random mode draws its seeds uniformly over the window and is the
//! economical way to fill a large image; grid mode enumerates a
//! scale-times-denser lattice of seeds for deterministic,
//! reproducible coverage.  Grid seeds are placed at the fine lattice
//! spacing but their orbits are still binned at raster resolution,
//! an intentional oversampling that smooths the density estimate.

use itertools::iproduct;
use num::Complex;
use rand::Rng;
use std::ops::Range;

use planes::PlaneMapper;

/// Runs one orbit from the origin, recording iterates into the
/// scratch buffers.  Returns the index of the escaping iterate, or
/// None if the orbit stayed inside the radius for the whole budget.
/// The escaping iterate itself is recorded but excluded from the
/// returned prefix length.
fn trace_orbit(
    c: Complex<f64>,
    max_iter: usize,
    path_re: &mut [f64],
    path_im: &mut [f64],
) -> Option<usize> {
    let mut z = Complex::new(0.0, 0.0);
    for j in 0..max_iter {
        z = z * z + c;
        path_re[j] = z.re;
        path_im[j] = z.im;
        if z.norm_sqr() > 4.0 {
            return Some(j);
        }
    }
    None
}

/// Monte Carlo Buddhabrot.  Draws `n_samples` seeds uniformly over
/// the plane's window and accumulates every escaping orbit into
/// `image`.  The scratch buffers must hold at least `max_iter`
/// entries each; they are overwritten per sample and carry no state
/// between samples.
pub fn buddhabrot_random<R: Rng>(
    plane: &PlaneMapper,
    max_iter: usize,
    n_samples: usize,
    rng: &mut R,
    path_re: &mut [f64],
    path_im: &mut [f64],
    image: &mut [f64],
) {
    assert!(path_re.len() >= max_iter && path_im.len() >= max_iter);
    assert!(image.len() == plane.len());
    let (leftlower, rightupper) = (plane.window.0, plane.window.1);
    let (re_range, im_range) = (rightupper.re - leftlower.re, rightupper.im - leftlower.im);
    for _ in 0..n_samples {
        let c = Complex::new(
            leftlower.re + re_range * rng.gen::<f64>(),
            leftlower.im + im_range * rng.gen::<f64>(),
        );
        if let Some(escaped_at) = trace_orbit(c, max_iter, path_re, path_im) {
            plane.accumulate(&path_re[..escaped_at], &path_im[..escaped_at], image);
        }
    }
}

/// Dense-grid Buddhabrot.  Enumerates a lattice of
/// `width*scale x height*scale` seeds evenly spaced over the window
/// and accumulates escaping orbits exactly as the random scanner
/// does.  No randomness: repeated runs are bit-identical.
pub fn buddhabrot_grid(
    plane: &PlaneMapper,
    max_iter: usize,
    scale: usize,
    path_re: &mut [f64],
    path_im: &mut [f64],
    image: &mut [f64],
) {
    let scaled_height = plane.raster.1 * scale;
    scan_grid_rows(plane, max_iter, scale, 0..scaled_height, path_re, path_im, image);
}

/// Grid scan restricted to a band of lattice rows.  The public grid
/// scanner covers the full lattice; the threaded driver hands each
/// worker its own band and its own partial raster.
pub(crate) fn scan_grid_rows(
    plane: &PlaneMapper,
    max_iter: usize,
    scale: usize,
    rows: Range<usize>,
    path_re: &mut [f64],
    path_im: &mut [f64],
    image: &mut [f64],
) {
    assert!(path_re.len() >= max_iter && path_im.len() >= max_iter);
    assert!(image.len() == plane.len());
    let leftlower = plane.window.0;
    let scaled_width = plane.raster.0 * scale;
    let scaled_height = plane.raster.1 * scale;
    let dx = (plane.window.1.re - leftlower.re) / (scaled_width as f64);
    let dy = (plane.window.1.im - leftlower.im) / (scaled_height as f64);
    for (iy, ix) in iproduct!(rows, 0..scaled_width) {
        let c = Complex::new(
            leftlower.re + dx * (ix as f64),
            leftlower.im + dy * (iy as f64),
        );
        if let Some(escaped_at) = trace_orbit(c, max_iter, path_re, path_im) {
            plane.accumulate(&path_re[..escaped_at], &path_im[..escaped_at], image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plane() -> PlaneMapper {
        PlaneMapper::new(8, 8, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0))
    }

    fn total(image: &[f64]) -> f64 {
        image.iter().sum()
    }

    #[test]
    fn only_escaping_orbits_are_accumulated() {
        let plane = plane();
        let max_iter = 60;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];
        let mut image = vec![0.0; plane.len()];
        let mut rng = StdRng::seed_from_u64(17);
        buddhabrot_random(&plane, max_iter, 400, &mut rng, &mut path_re, &mut path_im, &mut image);

        // Recount from the same seed: the total accumulated mass must
        // equal the number of in-bounds points on escaping orbits,
        // with the escaping point itself excluded.
        let mut rng = StdRng::seed_from_u64(17);
        let mut expected = 0.0;
        for _ in 0..400 {
            let c = Complex::new(
                -2.0 + 4.0 * rng.gen::<f64>(),
                -2.0 + 4.0 * rng.gen::<f64>(),
            );
            if let Some(j) = trace_orbit(c, max_iter, &mut path_re, &mut path_im) {
                for k in 0..j {
                    if plane.point_to_offset(path_re[k], path_im[k]).is_some() {
                        expected += 1.0;
                    }
                }
            }
        }
        assert!(total(&image) > 0.0);
        assert_eq!(total(&image), expected);
    }

    #[test]
    fn bound_windows_contribute_nothing() {
        // Every seed in this window sits deep in the main cardioid.
        let plane = PlaneMapper::new(8, 8, Complex::new(-0.05, -0.05), Complex::new(0.05, 0.05));
        let max_iter = 64;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];
        let mut image = vec![0.0; plane.len()];
        let mut rng = StdRng::seed_from_u64(3);
        buddhabrot_random(&plane, max_iter, 200, &mut rng, &mut path_re, &mut path_im, &mut image);
        assert_eq!(total(&image), 0.0);
    }

    #[test]
    fn random_mass_grows_with_sample_count() {
        // A fixed seed makes the first 300 samples of the longer run
        // identical to the shorter run, so total mass can only grow.
        let plane = plane();
        let max_iter = 40;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];

        let mut small = vec![0.0; plane.len()];
        let mut rng = StdRng::seed_from_u64(99);
        buddhabrot_random(&plane, max_iter, 300, &mut rng, &mut path_re, &mut path_im, &mut small);

        let mut large = vec![0.0; plane.len()];
        let mut rng = StdRng::seed_from_u64(99);
        buddhabrot_random(&plane, max_iter, 1200, &mut rng, &mut path_re, &mut path_im, &mut large);

        assert!(total(&large) >= total(&small));
    }

    #[test]
    fn grid_scan_is_deterministic() {
        let plane = plane();
        let max_iter = 40;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];
        let mut a = vec![0.0; plane.len()];
        let mut b = vec![0.0; plane.len()];
        buddhabrot_grid(&plane, max_iter, 2, &mut path_re, &mut path_im, &mut a);
        buddhabrot_grid(&plane, max_iter, 2, &mut path_re, &mut path_im, &mut b);
        assert_eq!(a, b);
        assert!(total(&a) > 0.0);
    }

    #[test]
    fn grid_bands_cover_the_lattice_exactly_once() {
        let plane = plane();
        let max_iter = 40;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];

        let mut whole = vec![0.0; plane.len()];
        buddhabrot_grid(&plane, max_iter, 2, &mut path_re, &mut path_im, &mut whole);

        let mut banded = vec![0.0; plane.len()];
        scan_grid_rows(&plane, max_iter, 2, 0..5, &mut path_re, &mut path_im, &mut banded);
        scan_grid_rows(&plane, max_iter, 2, 5..16, &mut path_re, &mut path_im, &mut banded);
        assert_eq!(whole, banded);
    }
}
