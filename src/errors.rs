//! Everything that can go wrong before, during, or after a render.
//! The per-pixel arithmetic itself cannot fail; every variant here
//! except `WorkerPanicked` and `Io` is a precondition that is checked
//! before a single worker is started.

use failure::Fail;
use std::io;

/// The error type for the whole crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The image has no pixels, or more than can be addressed.
    #[fail(display = "invalid image dimensions: {} rows x {} columns", rows, cols)]
    InvalidDimension {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// A negative iteration budget.
    #[fail(display = "invalid iteration budget: {}", _0)]
    InvalidIterationBudget(i32),

    /// The corners of the complex plane do not describe a usable window.
    #[fail(display = "invalid complex plane: {}", _0)]
    InvalidPlane(String),

    /// The raster handed to a renderer is not the size the plane mapper
    /// was built for.
    #[fail(
        display = "raster is {}x{} but the plane expects {}x{}",
        raster_cols, raster_rows, plane_cols, plane_rows
    )]
    DimensionMismatch {
        /// Rows in the raster.
        raster_rows: usize,
        /// Columns in the raster.
        raster_cols: usize,
        /// Rows the plane mapper was built for.
        plane_rows: usize,
        /// Columns the plane mapper was built for.
        plane_cols: usize,
    },

    /// Zero worker threads.
    #[fail(display = "invalid thread count: {}", _0)]
    InvalidThreadCount(usize),

    /// A partition policy that cannot split anything.
    #[fail(display = "invalid partition: {}", _0)]
    InvalidPartition(String),

    /// A worker thread panicked before the barrier opened.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The output path has an extension we do not know how to encode.
    #[fail(display = "unsupported output format: {}", _0)]
    UnsupportedFormat(String),

    /// Writing the encoded image failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
