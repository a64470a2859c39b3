//! Hands a finished raster to the `image` crate's encoders.  The
//! format is chosen from the file extension.

use crate::errors::{RenderError, Result};
use crate::raster::Raster;
use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write `raster` as an 8-bit grayscale PNG, or a binary PGM if the
/// extension is `.pgm` or `.pnm`.
pub fn write_image<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let (width, height) = (to_u32(raster.cols(), raster)?, to_u32(raster.rows(), raster)?);

    match extension.as_str() {
        "png" => {
            let output = BufWriter::new(File::create(path)?);
            PNGEncoder::new(output).encode(raster.as_raw(), width, height, ColorType::Gray(8))?;
        }
        "pgm" | "pnm" => {
            let output = BufWriter::new(File::create(path)?);
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
            encoder.encode(raster.as_raw(), width, height, ColorType::Gray(8))?;
        }
        _ => return Err(RenderError::UnsupportedFormat(path.display().to_string())),
    }
    info!("wrote {}", path.display());
    Ok(())
}

fn to_u32(n: usize, raster: &Raster) -> Result<u32> {
    if n > u32::max_value() as usize {
        return Err(RenderError::InvalidDimension {
            rows: raster.rows(),
            cols: raster.cols(),
        });
    }
    Ok(n as u32)
}
