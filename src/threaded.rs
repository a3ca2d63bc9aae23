// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Threaded driver for the grid scanner.  Each worker gets its own
//! band of lattice rows, its own scratch buffers, and its own partial
//! raster; the partials are summed once all workers finish.  The
//! output raster is the only thing the workers would ever contend on,
//! so giving each a private copy keeps the hot loop free of locks and
//! atomics.

extern crate crossbeam;

use std::cmp;

use buddha::scan_grid_rows;
use planes::PlaneMapper;

/// Given a collection of partial rasters in a contiguous block, merge
/// them all into a single raster.
fn merge_regions(regions: &[f64], len: usize) -> Vec<f64> {
    let mut ret = vec![0.0; len];
    for region in regions.chunks(len) {
        for (cell, partial) in ret.iter_mut().zip(region.iter()) {
            *cell += partial;
        }
    }
    ret
}

/// Grid-mode Buddhabrot across `threads` workers.  Produces the same
/// raster as `buddhabrot_grid`, bit for bit: per-cell increments are
/// whole numbers well inside f64's exact-integer range, so the merge
/// order cannot perturb them.  Allocates its own scratch and partial
/// rasters; it is a driver over the kernel, not a kernel itself.
pub fn buddhabrot_grid_threaded(
    plane: &PlaneMapper,
    max_iter: usize,
    scale: usize,
    threads: usize,
) -> Vec<f64> {
    let threads = cmp::max(threads, 1);
    let scaled_height = plane.raster.1 * scale;
    let band = scaled_height / threads + 1;
    let mut allocation = vec![0.0; plane.len() * threads];
    crossbeam::scope(|spawner| {
        let regions: Vec<&mut [f64]> = allocation.chunks_mut(plane.len()).collect();
        for (worker, region) in regions.into_iter().enumerate() {
            spawner.spawn(move |_| {
                let lo = cmp::min(worker * band, scaled_height);
                let hi = cmp::min(lo + band, scaled_height);
                let mut path_re = vec![0.0; max_iter];
                let mut path_im = vec![0.0; max_iter];
                scan_grid_rows(plane, max_iter, scale, lo..hi, &mut path_re, &mut path_im, region);
            });
        }
    })
    .unwrap();
    merge_regions(&allocation, plane.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddha::buddhabrot_grid;
    use num::Complex;

    #[test]
    fn threaded_grid_matches_single_threaded() {
        let plane = PlaneMapper::new(8, 6, Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5));
        let max_iter = 50;
        let mut path_re = vec![0.0; max_iter];
        let mut path_im = vec![0.0; max_iter];
        let mut single = vec![0.0; plane.len()];
        buddhabrot_grid(&plane, max_iter, 2, &mut path_re, &mut path_im, &mut single);

        for threads in &[1, 3, 5] {
            let merged = buddhabrot_grid_threaded(&plane, max_iter, 2, *threads);
            assert_eq!(merged, single);
        }
    }

    #[test]
    fn more_workers_than_rows_is_harmless() {
        let plane = PlaneMapper::new(4, 2, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0));
        let mut path_re = vec![0.0; 30];
        let mut path_im = vec![0.0; 30];
        let mut single = vec![0.0; plane.len()];
        buddhabrot_grid(&plane, 30, 1, &mut path_re, &mut path_im, &mut single);
        assert_eq!(buddhabrot_grid_threaded(&plane, 30, 1, 16), single);
    }
}
