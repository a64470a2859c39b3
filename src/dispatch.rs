//! The range-parallel primitive.  A flat pixel buffer is cut into
//! contiguous, disjoint ranges with `chunks_mut`, the ranges are put on
//! a shared queue, and a scoped pool of worker threads drains the
//! queue.  `fill_parallel` returns only after every worker has been
//! joined.
//!
//! Because each range is a distinct `&mut [u8]` handed out exactly
//! once, no two workers can ever touch the same pixel, and no locking
//! is needed around the writes themselves.  The only lock guards the
//! queue.

use crate::errors::{RenderError, Result};
use log::debug;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Mutex;

/// How the flat index space `[0, N)` is cut into ranges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Partition {
    /// One contiguous range per worker, `ceil(N / threads)` pixels each.
    Static,
    /// Ranges of this many whole rows, pulled from the queue as workers
    /// free up.
    Rows(usize),
    /// Ranges of this many pixels, pulled from the queue as workers
    /// free up.
    Pixels(usize),
}

impl Default for Partition {
    fn default() -> Self {
        Partition::Static
    }
}

impl Partition {
    /// The length of every range but (possibly) the last, for a buffer
    /// of `len` pixels laid out in rows of `cols`.
    pub fn chunk_len(&self, len: usize, cols: usize, threads: usize) -> Result<usize> {
        if threads == 0 {
            return Err(RenderError::InvalidThreadCount(threads));
        }
        let chunk = match *self {
            Partition::Static => (len + threads - 1) / threads,
            Partition::Rows(0) | Partition::Pixels(0) => {
                return Err(RenderError::InvalidPartition(format!("{} is empty", self)));
            }
            Partition::Rows(rows) => rows.checked_mul(cols).unwrap_or(len),
            Partition::Pixels(pixels) => pixels,
        };
        Ok(chunk.min(len).max(1))
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Partition::Static => write!(f, "static"),
            Partition::Rows(n) => write!(f, "rows:{}", n),
            Partition::Pixels(n) => write!(f, "pixels:{}", n),
        }
    }
}

impl FromStr for Partition {
    type Err = RenderError;

    /// `static`, `rows:K`, or `pixels:K`.
    fn from_str(s: &str) -> Result<Partition> {
        if s == "static" {
            return Ok(Partition::Static);
        }
        let invalid = || RenderError::InvalidPartition(s.to_string());
        let index = s.find(':').ok_or_else(invalid)?;
        let grain = usize::from_str(&s[index + 1..]).map_err(|_| invalid())?;
        if grain == 0 {
            return Err(invalid());
        }
        match &s[..index] {
            "rows" => Ok(Partition::Rows(grain)),
            "pixels" => Ok(Partition::Pixels(grain)),
            _ => Err(invalid()),
        }
    }
}

/// One worker per logical CPU.
pub fn default_threads() -> usize {
    num_cpus::get()
}

/// The ranges `fill_parallel` would hand out for this buffer shape.
/// Together they cover `[0, len)` exactly once, in order.
pub fn ranges(
    len: usize,
    cols: usize,
    threads: usize,
    partition: Partition,
) -> Result<Vec<Range<usize>>> {
    if len == 0 {
        return Ok(vec![]);
    }
    let chunk = partition.chunk_len(len, cols, threads)?;
    Ok((0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect())
}

/// Overwrite every pixel of `pixels` with `shade(offset)`, where
/// `offset` is the pixel's linear position in the buffer.  The buffer
/// is split according to `partition` and filled by up to `threads`
/// scoped workers; this call blocks until all of them are done.
pub fn fill_parallel<F>(
    pixels: &mut [u8],
    cols: usize,
    threads: usize,
    partition: Partition,
    shade: F,
) -> Result<()>
where
    F: Fn(usize) -> u8 + Sync,
{
    if pixels.is_empty() {
        return Ok(());
    }
    let chunk_len = partition.chunk_len(pixels.len(), cols, threads)?;
    let chunks = (pixels.len() + chunk_len - 1) / chunk_len;
    let workers = threads.min(chunks);
    debug!(
        "partition {}: {} ranges of {} pixels across {} workers",
        partition, chunks, chunk_len, workers
    );

    let queue = Mutex::new(pixels.chunks_mut(chunk_len).enumerate());
    let queue = &queue;
    let shade = &shade;
    crossbeam::scope(|spawner| {
        for _ in 0..workers {
            spawner.spawn(move |_| loop {
                // A poisoned queue means a sibling panicked; the scope
                // will report it, so just stop pulling work.
                let next = match queue.lock() {
                    Ok(mut ranges) => ranges.next(),
                    Err(_) => None,
                };
                match next {
                    Some((n, chunk)) => fill_range(chunk, n * chunk_len, shade),
                    None => break,
                }
            });
        }
    })
    .map_err(|_| RenderError::WorkerPanicked)
}

#[inline]
fn fill_range<F>(chunk: &mut [u8], start: usize, shade: &F)
where
    F: Fn(usize) -> u8,
{
    for (offset, pixel) in chunk.iter_mut().enumerate() {
        *pixel = shade(start + offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn parses_partitions() {
        assert_eq!("static".parse::<Partition>().unwrap(), Partition::Static);
        assert_eq!("rows:4".parse::<Partition>().unwrap(), Partition::Rows(4));
        assert_eq!("pixels:4096".parse::<Partition>().unwrap(), Partition::Pixels(4096));
        assert!("rows:0".parse::<Partition>().is_err());
        assert!("rows".parse::<Partition>().is_err());
        assert!("columns:3".parse::<Partition>().is_err());
        assert!("pixels:-1".parse::<Partition>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for p in &[Partition::Static, Partition::Rows(3), Partition::Pixels(17)] {
            assert_eq!(p.to_string().parse::<Partition>().unwrap(), *p);
        }
    }

    #[test]
    fn chunk_lengths() {
        assert_eq!(Partition::Static.chunk_len(100, 10, 3).unwrap(), 34);
        assert_eq!(Partition::Static.chunk_len(2, 1, 8).unwrap(), 1);
        assert_eq!(Partition::Rows(2).chunk_len(100, 10, 3).unwrap(), 20);
        assert_eq!(Partition::Rows(50).chunk_len(100, 10, 3).unwrap(), 100);
        assert_eq!(Partition::Pixels(7).chunk_len(100, 10, 3).unwrap(), 7);
        assert!(Partition::Static.chunk_len(100, 10, 0).is_err());
        assert!(Partition::Pixels(0).chunk_len(100, 10, 2).is_err());
    }

    #[test]
    fn ranges_cover_everything_once() {
        let policies = [
            Partition::Static,
            Partition::Rows(1),
            Partition::Rows(3),
            Partition::Pixels(1),
            Partition::Pixels(13),
        ];
        for &policy in &policies {
            for &threads in &[1, 2, 3, 7, 64] {
                let ranges = ranges(97, 10, threads, policy).unwrap();
                let mut expected = 0;
                for range in &ranges {
                    assert_eq!(range.start, expected);
                    assert!(range.end > range.start);
                    expected = range.end;
                }
                assert_eq!(expected, 97);
            }
        }
    }

    #[test]
    fn static_partition_has_one_range_per_worker() {
        assert_eq!(ranges(100, 10, 4, Partition::Static).unwrap().len(), 4);
        assert_eq!(ranges(3, 3, 8, Partition::Static).unwrap().len(), 3);
    }

    #[test]
    fn fill_writes_each_offset_exactly_once() {
        let len = 1013;
        let counts: Vec<AtomicUsize> = (0..len).map(|_| AtomicUsize::new(0)).collect();
        let mut pixels = vec![0 as u8; len];
        fill_parallel(&mut pixels, 17, 5, Partition::Pixels(31), |i| {
            counts[i].fetch_add(1, Ordering::SeqCst);
            (i % 251) as u8
        })
        .unwrap();
        for (i, count) in counts.iter().enumerate() {
            assert_eq!(count.load(Ordering::SeqCst), 1, "offset {}", i);
            assert_eq!(pixels[i], (i % 251) as u8);
        }
    }

    #[test]
    fn fill_with_more_threads_than_pixels() {
        let mut pixels = vec![0 as u8; 3];
        fill_parallel(&mut pixels, 3, 16, Partition::Static, |i| i as u8 + 1).unwrap();
        assert_eq!(pixels, vec![1, 2, 3]);
    }

    #[test]
    fn fill_rejects_zero_threads_before_touching_pixels() {
        let mut pixels = vec![7 as u8; 4];
        assert!(fill_parallel(&mut pixels, 2, 0, Partition::Static, |_| 0).is_err());
        assert_eq!(pixels, vec![7; 4]);
    }

    #[test]
    fn worker_panics_are_reported() {
        let mut pixels = vec![0 as u8; 64];
        let result = fill_parallel(&mut pixels, 8, 4, Partition::Rows(1), |i| {
            if i == 40 {
                panic!("boom");
            }
            1
        });
        match result {
            Err(RenderError::WorkerPanicked) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
