#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parallel Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of `z = z * z + c` stays bounded.  We sample a
//! rectangle of the plane, one point per pixel, and count how many
//! iterations each orbit takes to leave the disc of radius 2.  That
//! "escape time" becomes a gray level; points that never leave are
//! black.
//!
//! No pixel depends on any other, so the image can be cut into
//! disjoint ranges of pixels and rendered by as many threads as we
//! like.  A single-threaded renderer is kept alongside as a timing
//! baseline and as an oracle: both must produce the same bytes.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod escape;
pub mod output;
pub mod planes;
pub mod raster;
pub mod render;
pub mod timing;

pub use dispatch::Partition;
pub use errors::{RenderError, Result};
pub use escape::{escape_time, intensity};
pub use planes::{ComplexPlane, IntegralPlane, Pixel, PlaneMapper};
pub use raster::Raster;
pub use render::{render, Mandelbrot, Mode, ParallelRenderer, SequentialRenderer};
