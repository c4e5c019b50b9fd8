#![doc = r#"
burnmap: burn-severity change maps from pre/post-fire multispectral rasters.

This crate turns two acquisitions (a near-infrared band, a shortwave-infrared band
and a bit-encoded quality band each) into a differenced Normalized Burn Ratio (dNBR)
grid: quality masking, alignment of the post-fire grid onto the pre-fire one,
index and delta computation, severity classification, change statistics, and
georeferenced artifacts (float GeoTIFF, colored PNG/JPEG with world file, JSON report).

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: run to a directory
-------------------------------
```rust,no_run
use std::path::PathBuf;
use burnmap::{run_to_directory, AcquisitionPaths, BurnParams, OutputConfig};

fn main() -> burnmap::Result<()> {
    let pre = AcquisitionPaths {
        nir: PathBuf::from("/data/pre_B5.TIF"),
        swir: PathBuf::from("/data/pre_B7.TIF"),
        qa: PathBuf::from("/data/pre_QA_PIXEL.TIF"),
    };
    let post = AcquisitionPaths {
        nir: PathBuf::from("/data/post_B5.TIF"),
        swir: PathBuf::from("/data/post_B7.TIF"),
        qa: PathBuf::from("/data/post_QA_PIXEL.TIF"),
    };

    let report = run_to_directory(
        &pre,
        &post,
        &BurnParams::default(),
        &OutputConfig::new("/out"),
        "fire_2024_08",
    )?;
    println!("{:?}% changed", report.stats.percent_changed);
    Ok(())
}
```

In-memory processing
--------------------
```rust,no_run
use burnmap::{process_grids, classify, delta_statistics, Acquisition};

fn summarize(pre: &Acquisition, post: &Acquisition) -> burnmap::Result<()> {
    let products = process_grids(pre, post)?;
    let classes = classify(&products.delta);
    let stats = delta_statistics(&products.delta, 0.27);
    println!("{} classified cells, {:?}", classes.len(), stats);
    Ok(())
}
```

Error handling
--------------
All public functions return `burnmap::Result<T>`; match on `burnmap::Error` to handle specific
cases. Missing or unreadable inputs are `Error::Input`, grids that cannot be related are
`Error::Alignment`. Numeric edge cases (zero denominators, no valid cells, an empty
visual) are not errors.

```rust,no_run
use burnmap::{load_band, Error};

fn main() {
    match load_band(std::path::Path::new("/bad/B5.TIF")) {
        Ok(grid) => println!("{:?}", grid.shape()),
        Err(Error::Input { path, reason }) => eprintln!("bad input {path:?}: {reason}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`core`]: grids, CRS handling, parameters and processing stages.
- [`types`]: enums (`VisualKind`, `ImageFormat`, `SeverityClass`, `Resampling`).
- [`io`]: GDAL reader and artifact writers.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::grid::{GeoBounds, GeoProfile, GeoTransform, RasterGrid};
pub use crate::core::params::{BurnParams, OutputConfig};
pub use crate::error::{Error, Result};
pub use crate::types::{ImageFormat, Resampling, SeverityClass, VisualKind};

// Stages
pub use crate::core::crs::latlon_bounds;
pub use crate::core::processing::align::{align_grid, align_mask};
pub use crate::core::processing::classify::{classify, classify_value};
pub use crate::core::processing::index::{delta, normalized_difference};
pub use crate::core::processing::mask::decode_quality_mask;
pub use crate::core::processing::pipeline::{
    Acquisition, AcquisitionPaths, BurnProducts, load_acquisition, process_acquisitions,
    process_grids,
};
pub use crate::core::processing::render::render_visual;
pub use crate::core::processing::save::{VisualArtifact, export_delta_tiff, export_visual};
pub use crate::core::processing::stats::{Statistics, delta_statistics};

// Readers and writers
pub use crate::io::gdal::{GdalError, load_band, load_quality_band};
pub use crate::io::writers::tiff::{DELTA_NODATA, read_delta_tiff};
pub use crate::io::writers::worldfile::world_file_path;

// High-level API re-exports
pub use crate::api::{BurnReport, run_grids_to_directory, run_to_directory, validate_tag, write_products};
