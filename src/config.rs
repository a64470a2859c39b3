//! Resolved run settings, their defaults, and the little parsers the
//! command line uses to fill them in.

use crate::dispatch::{self, Partition};
use crate::planes::{ComplexPlane, IntegralPlane};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

/// Default image size, width x height.
pub const DEFAULT_SIZE: &str = "5400x4800";
/// Default lower left corner of the complex plane.
pub const DEFAULT_LEFTLOWER: &str = "-2.1,-1.2";
/// Default upper right corner of the complex plane.
pub const DEFAULT_RIGHTUPPER: &str = "0.6,1.2";
/// Default iteration cap.
pub const DEFAULT_ITERATIONS: i32 = 500;
/// Default parallel output file.
pub const DEFAULT_PARALLEL_OUTPUT: &str = "mandelbrot_parallel.png";
/// Default sequential output file.
pub const DEFAULT_SEQUENTIAL_OUTPUT: &str = "mandelbrot_sequential.png";

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f32>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

/// Which renders a run performs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RunMode {
    /// Parallel then sequential, compared and timed against each other.
    Both,
    /// Only the parallel render.
    Parallel,
    /// Only the sequential render.
    Sequential,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<RunMode, String> {
        match s {
            "both" => Ok(RunMode::Both),
            "parallel" => Ok(RunMode::Parallel),
            "sequential" => Ok(RunMode::Sequential),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

/// Everything a run needs.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Image width and height in pixels.
    pub size: IntegralPlane,
    /// The window on the complex plane.
    pub plane: ComplexPlane,
    /// Iteration cap per pixel.
    pub max_iterations: i32,
    /// Worker threads for the parallel render.
    pub threads: usize,
    /// How the parallel render splits the image.
    pub partition: Partition,
    /// Which renders to run.
    pub mode: RunMode,
    /// Where the parallel render is written.
    pub parallel_output: PathBuf,
    /// Where the sequential render is written.
    pub sequential_output: PathBuf,
}

impl Default for RenderConfig {
    /// The reference scenario: 4800 rows by 5400 columns over
    /// [-2.1, 0.6] x [-1.2, 1.2], 500 iterations.
    fn default() -> Self {
        RenderConfig {
            size: IntegralPlane(5400, 4800),
            plane: ComplexPlane(Complex::new(-2.1, -1.2), Complex::new(0.6, 1.2)),
            max_iterations: DEFAULT_ITERATIONS,
            threads: dispatch::default_threads(),
            partition: Partition::Static,
            mode: RunMode::Both,
            parallel_output: PathBuf::from(DEFAULT_PARALLEL_OUTPUT),
            sequential_output: PathBuf::from(DEFAULT_SEQUENTIAL_OUTPUT),
        }
    }
}
