use image::RgbaImage;
use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Drop the alpha channel; transparent cells become black.
pub fn flatten_rgba(img: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(img.width() as usize * img.height() as usize * 3);
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            rgb.extend_from_slice(&[0, 0, 0]);
        } else {
            rgb.extend_from_slice(&[r, g, b]);
        }
    }
    rgb
}

pub fn write_rgb_jpeg(output: &Path, img: &RgbaImage) -> Result<()> {
    let (cols, rows) = img.dimensions();
    if cols > u16::MAX as u32 || rows > u16::MAX as u32 {
        return Err(Error::InvalidArgument {
            arg: "jpeg dimensions",
            value: format!("{}x{}", cols, rows),
        });
    }
    let rgb_data = flatten_rgba(img);
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, 100);
    encoder
        .encode(&rgb_data, cols as u16, rows as u16, ColorType::Rgb)
        .map_err(Error::external)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn transparent_pixels_flatten_to_black() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([9, 9, 9, 0]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        assert_eq!(flatten_rgba(&img), vec![0, 0, 0, 200, 100, 50]);
    }
}
