//! High-level, ergonomic library API: run the full change pipeline from band
//! files (or in-memory acquisitions) into an output directory and get back a
//! serialisable report. Prefer these entrypoints over the low-level processing
//! modules when integrating burnmap.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::crs::latlon_bounds;
use crate::core::grid::{GeoBounds, RasterGrid};
use crate::core::params::{BurnParams, OutputConfig};
use crate::core::processing::classify::classify;
use crate::core::processing::pipeline::{
    Acquisition, AcquisitionPaths, BurnProducts, process_acquisitions, process_grids,
};
use crate::core::processing::save::{Staging, save_delta_tiff, save_visual};
use crate::core::processing::stats::{Statistics, delta_statistics};
use crate::error::{Error, Result};
use crate::io::writers::metadata::write_json_sidecar;
use crate::types::SeverityClass;

/// Job record of one run: artifact locations, statistics, bounds and the
/// parameters used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnReport {
    pub tag: String,
    pub tif_path: PathBuf,
    pub image_path: PathBuf,
    pub world_file_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prj_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub stats: Statistics,
    pub bounds: GeoBounds,
    /// Cell count per severity code, index = code
    pub class_counts: [usize; 8],
    pub params: BurnParams,
    pub created_at: DateTime<Utc>,
}

/// Artifact names are `{tag}_...`; the tag must be non-empty ASCII
/// alphanumerics, `_` or `-`.
pub fn validate_tag(tag: &str) -> Result<()> {
    let ok = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidArgument {
            arg: "tag",
            value: tag.to_string(),
        })
    }
}

fn class_counts(delta: &RasterGrid) -> [usize; 8] {
    let mut counts = [0usize; 8];
    for &code in classify(delta).iter() {
        if let Some(class) = SeverityClass::from_code(code) {
            counts[class.code() as usize] += 1;
        }
    }
    counts
}

/// Compute the delta for in-memory acquisitions and write every artifact.
pub fn run_grids_to_directory(
    pre: &Acquisition,
    post: &Acquisition,
    params: &BurnParams,
    output: &OutputConfig,
    tag: &str,
) -> Result<BurnReport> {
    validate_tag(tag)?;
    params.validate()?;
    let products = process_grids(pre, post)?;
    write_products(&products, params, output, tag)
}

/// Load both acquisitions from disk, compute the delta and write every
/// artifact into `output`:
/// `{tag}_delta_nbr.tif`, the visual `{tag}_dnbr_*.{png,jpg}` with its world
/// file, and `{tag}_report.json`. All files appear together or not at all.
pub fn run_to_directory(
    pre: &AcquisitionPaths,
    post: &AcquisitionPaths,
    params: &BurnParams,
    output: &OutputConfig,
    tag: &str,
) -> Result<BurnReport> {
    validate_tag(tag)?;
    params.validate()?;
    let products = process_acquisitions(pre, post)?;
    write_products(&products, params, output, tag)
}

/// Write the artifacts and report for already computed products.
pub fn write_products(
    products: &BurnProducts,
    params: &BurnParams,
    output: &OutputConfig,
    tag: &str,
) -> Result<BurnReport> {
    validate_tag(tag)?;
    let delta = &products.delta;

    let stats = delta_statistics(delta, params.change_threshold);
    let bounds = latlon_bounds(delta.profile())?;
    let class_counts = class_counts(delta);

    let staging = Staging::new(output)?;

    let tif_name = format!("{}_delta_nbr.tif", tag);
    save_delta_tiff(delta, &staging.path(&tif_name))?;

    let image_name = format!(
        "{}_{}.{}",
        tag,
        params.visual.file_suffix(),
        params.image_format.extension()
    );
    let visual = save_visual(delta, params, &staging.path(&image_name))?;
    let final_of = |p: &std::path::Path| {
        p.file_name()
            .map(|n| staging.output_dir().join(n))
            .unwrap_or_else(|| p.to_path_buf())
    };

    let report_name = format!("{}_report.json", tag);
    let report = BurnReport {
        tag: tag.to_string(),
        tif_path: staging.final_path(&tif_name),
        image_path: final_of(&visual.image_path),
        world_file_path: final_of(&visual.world_file_path),
        prj_path: visual.prj_path.as_deref().map(final_of),
        report_path: staging.final_path(&report_name),
        stats,
        bounds,
        class_counts,
        params: params.clone(),
        created_at: Utc::now(),
    };
    write_json_sidecar(&staging.path(&report_name), &report)?;

    staging.commit()?;
    info!(
        "Run '{}' complete: {} valid, {} changed ({:?}%)",
        tag, stats.valid_pixels, stats.changed_pixels, stats.percent_changed
    );
    Ok(report)
}
