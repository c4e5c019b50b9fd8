use clap::Parser;
use std::path::PathBuf;

use burnmap::{ImageFormat, VisualKind};

#[derive(Parser, Debug)]
#[command(name = "burnmap", version, about = "dNBR burn-severity change maps")]
pub struct CliArgs {
    /// Pre-fire near-infrared band (e.g. Landsat B5)
    #[arg(long)]
    pub pre_nir: PathBuf,

    /// Pre-fire shortwave-infrared band (e.g. Landsat B7)
    #[arg(long)]
    pub pre_swir: PathBuf,

    /// Pre-fire bit-encoded quality band
    #[arg(long)]
    pub pre_qa: PathBuf,

    /// Post-fire near-infrared band
    #[arg(long)]
    pub post_nir: PathBuf,

    /// Post-fire shortwave-infrared band
    #[arg(long)]
    pub post_swir: PathBuf,

    /// Post-fire bit-encoded quality band
    #[arg(long)]
    pub post_qa: PathBuf,

    /// Output directory for artifacts (created if missing)
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Prefix for artifact names; defaults to a UTC timestamp
    #[arg(long)]
    pub tag: Option<String>,

    /// Parameter preset (JSON); explicit flags below override its values
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Visual artifact (classified, burn-only, stretched)
    #[arg(long, value_enum)]
    pub visual: Option<VisualKind>,

    /// Visual image format (png or jpeg)
    #[arg(long, value_enum)]
    pub image_format: Option<ImageFormat>,

    /// Delta at or above which a cell counts as changed in the statistics
    #[arg(long, allow_negative_numbers = true)]
    pub change_threshold: Option<f32>,

    /// Delta below which cells are transparent in the burn-only visual
    #[arg(long, allow_negative_numbers = true)]
    pub burn_threshold: Option<f32>,

    /// Also write a .prj sidecar next to the visual
    #[arg(long, default_value_t = false)]
    pub prj: bool,

    /// Enable logging (filter with RUST_LOG, default info)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
