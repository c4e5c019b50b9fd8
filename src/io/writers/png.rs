use image::RgbaImage;
use std::path::Path;

use crate::error::Result;

/// Write an RGBA image as PNG, keeping transparency.
pub fn write_rgba_png(output: &Path, img: &RgbaImage) -> Result<()> {
    img.save_with_format(output, image::ImageFormat::Png)?;
    Ok(())
}
