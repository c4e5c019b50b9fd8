use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::grid::GeoTransform;

/// World-file path for an image: `.pgw` for PNG, `.jgw` for JPEG, `.tfw` for
/// TIFF, first letter of the extension + `w` otherwise, `.wld` without one.
pub fn world_file_path(output_image: &Path) -> PathBuf {
    let ext = output_image
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let world_ext = match ext.as_str() {
        "jpg" | "jpeg" => "jgw".to_string(),
        "png" => "pgw".to_string(),
        "tif" | "tiff" => "tfw".to_string(),
        other => match other.chars().next() {
            Some(first) => format!("{}w", first),
            None => "wld".to_string(),
        },
    };
    output_image.with_extension(world_ext)
}

/// The six world-file lines: pixel width, 0.0, 0.0, pixel height, then X and
/// Y of the upper-left pixel's center.
pub fn world_file_lines(transform: &GeoTransform) -> [f64; 6] {
    let (x_ul, y_ul) = transform.pixel_center(0, 0);
    [
        transform.pixel_width,
        0.0,
        0.0,
        transform.pixel_height,
        x_ul,
        y_ul,
    ]
}

/// Write the world file for `world_path`, one value per line.
pub fn write_world_file(world_path: &Path, transform: &GeoTransform) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(world_path)?);
    for value in world_file_lines(transform) {
        writeln!(file, "{:?}", value)?;
    }
    file.flush()
}

/// Write a .prj file with the provided projection (WKT or EPSG:XXXX)
pub fn write_prj_file(output_image: &Path, projection: &str) -> std::io::Result<PathBuf> {
    let prj_path = output_image.with_extension("prj");
    std::fs::write(&prj_path, projection.as_bytes())?;
    Ok(prj_path)
}
