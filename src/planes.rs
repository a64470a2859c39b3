//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of that
//! plane.  The integral plane is walked in row-major order, so a
//! pixel can be named either by its column and row or by its linear
//! offset from the root of the image buffer.
use crate::errors::{RenderError, Result};
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

impl IntegralPlane {
    /// Columns.
    pub fn width(&self) -> usize {
        self.0
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.1
    }

    /// The number of pixels, or `InvalidDimension` if either side is
    /// zero or the product does not fit in a `usize`.
    pub fn checked_len(&self) -> Result<usize> {
        let invalid = RenderError::InvalidDimension {
            rows: self.1,
            cols: self.0,
        };
        if self.0 == 0 || self.1 == 0 {
            return Err(invalid);
        }
        self.0.checked_mul(self.1).ok_or(invalid)
    }
}

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f32>, pub Complex<f32>);

/// Describes the x, y of a pixel in the integral plane: column first,
/// then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps pixels in the first to points
/// in the second.  Built once before rendering starts and never
/// changed afterwards.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Pixels per unit along the real and imaginary axes.
    grid_factors: (f32, f32),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the two
    /// corners of the complex plane.  The corners must be finite and
    /// the window must have a positive area.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f32>,
        rightupper: Complex<f32>,
    ) -> Result<PlaneMapper> {
        let integral_plane = IntegralPlane(width, height);
        integral_plane.checked_len()?;

        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(RenderError::InvalidPlane(
                "The corners of the complex plane must be finite".to_string(),
            ));
        }

        if rightupper.re <= leftlower.re {
            return Err(RenderError::InvalidPlane(
                "The left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }

        if rightupper.im <= leftlower.im {
            return Err(RenderError::InvalidPlane(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        // Multiply a distance on the complex plane by these to get a
        // distance in pixels.
        let grid_factors = (
            (width as f32) / (rightupper.re - leftlower.re),
            (height as f32) / (rightupper.im - leftlower.im),
        );

        Ok(PlaneMapper {
            integral_plane,
            complex_plane: ComplexPlane(leftlower, rightupper),
            grid_factors,
        })
    }

    /// Same as `new`, from the two plane descriptions.
    pub fn from_planes(size: IntegralPlane, plane: ComplexPlane) -> Result<PlaneMapper> {
        PlaneMapper::new(size.0, size.1, plane.0, plane.1)
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false for a mapper that made it through `new`.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Columns in the integral plane.
    pub fn cols(&self) -> usize {
        self.integral_plane.0
    }

    /// Rows in the integral plane.
    pub fn rows(&self) -> usize {
        self.integral_plane.1
    }

    /// Pixels per unit, real axis then imaginary axis.
    pub fn scale(&self) -> (f32, f32) {
        self.grid_factors
    }

    /// The pixel at a row-major linear offset.
    #[inline]
    pub fn pixel_at(&self, offset: usize) -> Pixel {
        let cols = self.integral_plane.0;
        Pixel(offset % cols, offset / cols)
    }

    /// Given a pixel on the integral cartesian plane, map that to a
    /// point on the complex cartesian plane.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f32> {
        Complex::new(
            ((pixel.0 as f32) / self.grid_factors.0) + self.complex_plane.0.re,
            ((pixel.1 as f32) / self.grid_factors.1) + self.complex_plane.0.im,
        )
    }

    /// Given the linear offset of a pixel from the root of the image
    /// buffer, return the point it samples.  Goes through
    /// `pixel_to_point`, so a row-major walk and a linear walk produce
    /// bit-identical points.
    #[inline]
    pub fn offset_to_point(&self, offset: usize) -> Complex<f32> {
        self.pixel_to_point(&self.pixel_at(offset))
    }
}
