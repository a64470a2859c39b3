//! The two pure per-pixel functions: how long a point takes to leave
//! the radius-2 disc, and what shade of gray that time becomes.

use num::{clamp, Complex};

/// The orbit of a point is considered to have escaped once its
/// squared magnitude exceeds this.  Comparing squares saves us a
/// square root per iteration.
pub const ESCAPE_RADIUS_SQR: f32 = 4.0;

/// Iterate `z = z * z + c`, starting from `z = c`, and return the
/// iteration at which `|z|^2` first exceeded 4.  A point that never
/// escapes within `max_iterations` returns `max_iterations`, which is
/// how callers tell "in the set" from "escaped late."
///
/// ```
/// use num::Complex;
/// use parbrot::escape_time;
///
/// assert_eq!(escape_time(Complex::new(0.0, 0.0), 500), 500);
/// assert_eq!(escape_time(Complex::new(2.0, 2.0), 500), 0);
/// ```
#[inline]
pub fn escape_time(c: Complex<f32>, max_iterations: u32) -> u32 {
    let mut z = c;
    for t in 0..max_iterations {
        if z.norm_sqr() > ESCAPE_RADIUS_SQR {
            return t;
        }
        z = z * z + c;
    }
    max_iterations
}

/// Map an escape time onto an 8-bit gray level.  Points that never
/// escaped are black; everything else is `sqrt(time / max)` scaled to
/// 255, which brightens the slow escapers hugging the border of the
/// set.
///
/// The ratio is only guaranteed to be in `[0, 1)` when
/// `time < max_iterations`.  Anything else is clamped, and a NaN
/// comes out black.
#[inline]
pub fn intensity(time: u32, max_iterations: u32) -> u8 {
    if time == max_iterations {
        return 0;
    }
    let value = ((time as f32 / max_iterations as f32).sqrt() * 255.0).round();
    if value.is_nan() {
        return 0;
    }
    clamp(value, 0.0, 255.0) as u8
}

/// `intensity(escape_time(c))`: the whole per-pixel computation once a
/// pixel has been placed on the complex plane.
#[inline]
pub fn shade(c: Complex<f32>, max_iterations: u32) -> u8 {
    intensity(escape_time(c, max_iterations), max_iterations)
}
