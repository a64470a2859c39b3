//! Rendering the Mandelbrot set into a `Raster`.
//!
//! A `Mandelbrot` bundles the plane mapping and the iteration budget,
//! and knows how to shade any one pixel.  The two renderers differ only
//! in how they walk the pixels: `SequentialRenderer` goes row by row on
//! the calling thread, `ParallelRenderer` hands disjoint ranges of the
//! flat buffer to a pool of scoped workers.  Since no pixel depends on
//! any other, both produce the same bytes.

use crate::dispatch::{self, Partition};
use crate::errors::{RenderError, Result};
use crate::escape::shade;
use crate::planes::{ComplexPlane, IntegralPlane, Pixel, PlaneMapper};
use crate::raster::Raster;
use itertools::iproduct;
use log::debug;

/// What to render: a mapping from pixels to points, and how long to
/// chase each point before declaring it captive.  Immutable once
/// built.
#[derive(Copy, Clone, Debug)]
pub struct Mandelbrot {
    plane: PlaneMapper,
    max_iterations: u32,
}

impl Mandelbrot {
    /// Fails with `InvalidIterationBudget` for a negative budget.
    pub fn new(plane: PlaneMapper, max_iterations: i32) -> Result<Self> {
        if max_iterations < 0 {
            return Err(RenderError::InvalidIterationBudget(max_iterations));
        }
        Ok(Mandelbrot {
            plane,
            max_iterations: max_iterations as u32,
        })
    }

    /// The pixel-to-point mapping.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// A black raster of the right size for this render.
    pub fn raster(&self) -> Result<Raster> {
        Raster::new(self.plane.rows(), self.plane.cols())
    }

    /// The gray level of one pixel.
    #[inline]
    pub fn pixel(&self, pixel: &Pixel) -> u8 {
        shade(self.plane.pixel_to_point(pixel), self.max_iterations)
    }

    /// The gray level of the pixel at a row-major offset.
    #[inline]
    pub fn offset(&self, offset: usize) -> u8 {
        self.pixel(&self.plane.pixel_at(offset))
    }

    fn check(&self, raster: &Raster) -> Result<()> {
        if raster.rows() != self.plane.rows() || raster.cols() != self.plane.cols() {
            return Err(RenderError::DimensionMismatch {
                raster_rows: raster.rows(),
                raster_cols: raster.cols(),
                plane_rows: self.plane.rows(),
                plane_cols: self.plane.cols(),
            });
        }
        Ok(())
    }
}

/// Renders on the calling thread, one row after another.  The timing
/// baseline, and the oracle the parallel renderer is checked against.
#[derive(Copy, Clone, Debug, Default)]
pub struct SequentialRenderer;

impl SequentialRenderer {
    /// Overwrite every pixel of `raster`.
    pub fn render(&self, job: &Mandelbrot, raster: &mut Raster) -> Result<()> {
        job.check(raster)?;
        let cols = raster.cols();
        let pixels = raster.as_raw_mut();
        for (row, column) in iproduct!(0..job.plane.rows(), 0..cols) {
            pixels[row * cols + column] = job.pixel(&Pixel(column, row));
        }
        Ok(())
    }
}

/// Renders on a pool of scoped worker threads.
#[derive(Copy, Clone, Debug)]
pub struct ParallelRenderer {
    threads: usize,
    partition: Partition,
}

impl Default for ParallelRenderer {
    /// One worker per logical CPU, one range per worker.
    fn default() -> Self {
        ParallelRenderer {
            threads: dispatch::default_threads(),
            partition: Partition::Static,
        }
    }
}

impl ParallelRenderer {
    /// Fails with `InvalidThreadCount` for zero threads.
    pub fn new(threads: usize, partition: Partition) -> Result<Self> {
        if threads == 0 {
            return Err(RenderError::InvalidThreadCount(threads));
        }
        Ok(ParallelRenderer { threads, partition })
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Partition policy.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Overwrite every pixel of `raster`, blocking until all workers
    /// have finished.
    pub fn render(&self, job: &Mandelbrot, raster: &mut Raster) -> Result<()> {
        job.check(raster)?;
        debug!(
            "rendering {}x{} on {} threads",
            raster.cols(),
            raster.rows(),
            self.threads
        );
        let cols = raster.cols();
        dispatch::fill_parallel(
            raster.as_raw_mut(),
            cols,
            self.threads,
            self.partition,
            |offset| job.offset(offset),
        )
    }
}

/// Which renderer to use.
#[derive(Copy, Clone, Debug)]
pub enum Mode {
    /// Single-threaded, row-major.
    Sequential,
    /// Multi-threaded with the given renderer settings.
    Parallel(ParallelRenderer),
}

impl Mode {
    /// Render `job` into `raster` with this mode's renderer.
    pub fn render_into(&self, job: &Mandelbrot, raster: &mut Raster) -> Result<()> {
        match self {
            Mode::Sequential => SequentialRenderer.render(job, raster),
            Mode::Parallel(renderer) => renderer.render(job, raster),
        }
    }
}

/// The main entry point: validate everything, allocate a raster of
/// `size`, and render the window `plane` into it.
pub fn render(
    size: IntegralPlane,
    plane: ComplexPlane,
    max_iterations: i32,
    mode: Mode,
) -> Result<Raster> {
    let job = Mandelbrot::new(PlaneMapper::from_planes(size, plane)?, max_iterations)?;
    let mut raster = job.raster()?;
    mode.render_into(&job, &mut raster)?;
    Ok(raster)
}
