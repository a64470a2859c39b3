//! A single-channel, 8-bit, row-major image.  Sized once at
//! construction and never resized; renderers only ever overwrite
//! pixels in place.

use crate::errors::Result;
use crate::planes::IntegralPlane;

/// A rows x cols grid of gray levels.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    rows: usize,
    cols: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// A black raster.  Fails with `InvalidDimension` if either side is
    /// zero.
    pub fn new(rows: usize, cols: usize) -> Result<Raster> {
        let len = IntegralPlane(cols, rows).checked_len()?;
        Ok(Raster {
            rows,
            cols,
            pixels: vec![0 as u8; len],
        })
    }

    /// Rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true; a raster always has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The gray level at a row and column, if it's inside the raster.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.pixels[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row of pixels.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.pixels[row * self.cols..(row + 1) * self.cols]
    }

    /// The raw row-major buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// The raw row-major buffer, writable.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consumes the raster, returning its buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_shapes() {
        assert!(Raster::new(0, 10).is_err());
        assert!(Raster::new(10, 0).is_err());
    }

    #[test]
    fn starts_black() {
        let r = Raster::new(3, 4).unwrap();
        assert_eq!(r.len(), 12);
        assert!(r.as_raw().iter().all(|&p| p == 0));
    }

    #[test]
    fn addressing_is_row_major() {
        let mut r = Raster::new(2, 3).unwrap();
        r.as_raw_mut()[4] = 9;
        assert_eq!(r.get(1, 1), Some(9));
        assert_eq!(r.row(1), &[0, 9, 0]);
        assert_eq!(r.get(2, 0), None);
        assert_eq!(r.get(0, 3), None);
    }
}
