#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time and strange-attractor density renderers
//!
//! Three classic fractal images, one shape: iterate a nonlinear
//! recurrence per sample point, map intermediate or final state to
//! pixel coordinates, and accumulate into an output buffer.
//!
//! The Buddhabrot plots the density of *escaping* orbits of the
//! Mandelbrot recurrence: every point an orbit visits on its way out
//! increments the pixel it lands on.  The Clifford attractor plots
//! the density of a single long trajectory after a warm-up pass has
//! measured the attractor's extent.  The Mandelbrot kernel writes a
//! smooth (fractional) escape count per pixel, which a colormap can
//! later turn into the familiar banding-free rendering.
//!
//! All kernels are synchronous and write into caller-owned buffers;
//! turning those buffers into viewable images is the business of the
//! `orbit` binary, not the library.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod buddha;
pub mod clifford;
pub mod escape;
pub mod planes;
pub mod threaded;

pub use buddha::{buddhabrot_grid, buddhabrot_random};
pub use clifford::clifford_attractor;
pub use escape::{iter_point, mandelbrot};
pub use planes::PlaneMapper;
pub use threaded::buddhabrot_grid_threaded;
