use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ImageFormat, VisualKind};

/// Burn-mapping parameters suitable for config files and presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnParams {
    /// Statistics threshold: a finite delta at or above this counts as changed
    pub change_threshold: f32,
    /// Visual threshold for the burn-only rendering; independent of `change_threshold`
    pub burn_threshold: f32,
    pub visual: VisualKind,
    pub image_format: ImageFormat,
    /// If true, write a .prj sidecar next to the visual artifact
    pub write_prj: bool,
}

impl Default for BurnParams {
    fn default() -> Self {
        Self {
            change_threshold: 0.27,
            burn_threshold: 0.1,
            visual: VisualKind::Classified,
            image_format: ImageFormat::PNG,
            write_prj: false,
        }
    }
}

impl BurnParams {
    /// Load a preset from JSON. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::input(path, e))?;
        let params: BurnParams = serde_json::from_str(&text)?;
        params.validate()?;
        debug!("Loaded parameters from {:?}: {:?}", path, params);
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.change_threshold.is_finite() {
            return Err(Error::InvalidArgument {
                arg: "change_threshold",
                value: self.change_threshold.to_string(),
            });
        }
        if !self.burn_threshold.is_finite() {
            return Err(Error::InvalidArgument {
                arg: "burn_threshold",
                value: self.burn_threshold.to_string(),
            });
        }
        Ok(())
    }
}

/// Where artifacts of a run land. Passed explicitly so concurrent runs can use
/// separate (or shared) directories without process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl OutputConfig {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory if needed; safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_thresholds_independent() {
        let p = BurnParams::default();
        assert_eq!(p.change_threshold, 0.27);
        assert_eq!(p.burn_threshold, 0.1);
        assert_eq!(p.visual, VisualKind::Classified);
        assert_eq!(p.image_format, ImageFormat::PNG);
        assert!(!p.write_prj);
    }

    #[test]
    fn partial_preset_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        std::fs::write(&path, r#"{"burn_threshold": 0.2, "visual": "BurnOnly"}"#).unwrap();
        let p = BurnParams::from_json_file(&path).unwrap();
        assert_eq!(p.burn_threshold, 0.2);
        assert_eq!(p.visual, VisualKind::BurnOnly);
        assert_eq!(p.change_threshold, 0.27);
    }

    #[test]
    fn missing_preset_is_an_input_error() {
        let err = BurnParams::from_json_file(Path::new("/no/such/preset.json")).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = OutputConfig::new(dir.path().join("a/b"));
        cfg.ensure_dir().unwrap();
        cfg.ensure_dir().unwrap();
        assert!(cfg.output_dir.is_dir());
        assert_eq!(cfg.artifact_path("x.tif"), dir.path().join("a/b/x.tif"));
    }
}
