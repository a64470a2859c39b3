//! Wall-clock hooks around a render.  Purely observational: nothing in
//! here feeds back into the pixels.

use log::info;
use std::time::{Duration, Instant};

/// Run `f`, returning its result and how long it took.
pub fn timed<T, F>(label: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    info!("{} took {:.3} s", label, seconds(elapsed));
    (result, elapsed)
}

/// A duration as fractional seconds.
pub fn seconds(d: Duration) -> f64 {
    d.as_secs_f64()
}

/// Timings for the same render done both ways.
#[derive(Copy, Clone, Debug)]
pub struct Comparison {
    /// Wall-clock time of the parallel render.
    pub parallel: Duration,
    /// Wall-clock time of the sequential render.
    pub sequential: Duration,
}

impl Comparison {
    /// How many times faster the parallel render was.  `None` when the
    /// parallel render was too quick to measure.
    pub fn speedup(&self) -> Option<f64> {
        let parallel = seconds(self.parallel);
        if parallel > 0.0 {
            Some(seconds(self.sequential) / parallel)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_returns_the_result() {
        let (value, _) = timed("sum", || (1..=10).sum::<u32>());
        assert_eq!(value, 55);
    }

    #[test]
    fn seconds_are_fractional() {
        assert_eq!(seconds(Duration::from_millis(1500)), 1.5);
    }

    #[test]
    fn speedup_is_a_ratio() {
        let c = Comparison {
            parallel: Duration::from_millis(250),
            sequential: Duration::from_secs(1),
        };
        assert_eq!(c.speedup(), Some(4.0));
        let c = Comparison {
            parallel: Duration::from_secs(0),
            sequential: Duration::from_secs(1),
        };
        assert_eq!(c.speedup(), None);
    }
}
