use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::core::grid::RasterGrid;
use crate::core::params::{BurnParams, OutputConfig};
use crate::core::processing::render::render_visual;
use crate::error::{Error, Result};
use crate::io::writers::jpeg::write_rgb_jpeg;
use crate::io::writers::metadata::{delta_metadata_fields, embed_tiff_metadata};
use crate::io::writers::png::write_rgba_png;
use crate::io::writers::tiff::{TiffProfile, write_tiff_f32};
use crate::io::writers::worldfile::{world_file_path, write_prj_file, write_world_file};
use crate::types::ImageFormat;

/// Paths of a written visual artifact and its sidecars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualArtifact {
    pub image_path: PathBuf,
    pub world_file_path: PathBuf,
    pub prj_path: Option<PathBuf>,
}

impl VisualArtifact {
    /// Same file names relocated under `dir`.
    fn relocated(&self, dir: &Path) -> Self {
        let move_to = |p: &Path| match p.file_name() {
            Some(name) => dir.join(name),
            None => p.to_path_buf(),
        };
        Self {
            image_path: move_to(&self.image_path),
            world_file_path: move_to(&self.world_file_path),
            prj_path: self.prj_path.as_deref().map(move_to),
        }
    }
}

/// Write the delta grid as a float32 GeoTIFF with the nodata sentinel and
/// product metadata.
pub fn save_delta_tiff(delta: &RasterGrid, output: &Path) -> Result<()> {
    let out = TiffProfile::delta_from(delta.profile());
    let mut ds = write_tiff_f32(output, delta.data(), &out)?;
    embed_tiff_metadata(&mut ds, &delta_metadata_fields("NBR", out.nodata()))?;
    // Closing the dataset flushes it
    drop(ds);
    info!("Saved delta GeoTIFF: {:?}", output);
    Ok(())
}

/// Render the configured visual and write it with its world file (and .prj
/// when requested). The image format follows `params.image_format`.
pub fn save_visual(
    delta: &RasterGrid,
    params: &BurnParams,
    output_image: &Path,
) -> Result<VisualArtifact> {
    let img = render_visual(delta, params.visual, params.burn_threshold);
    match params.image_format {
        ImageFormat::PNG => write_rgba_png(output_image, &img)?,
        ImageFormat::JPEG => write_rgb_jpeg(output_image, &img)?,
    }

    let world_path = world_file_path(output_image);
    write_world_file(&world_path, &delta.profile().transform)?;

    let prj_path = if params.write_prj {
        let crs = &delta.profile().crs;
        if crs.is_empty() {
            warn!("No CRS on reference grid, skipping .prj for {:?}", output_image);
            None
        } else {
            Some(write_prj_file(output_image, crs)?)
        }
    } else {
        None
    };

    info!("Saved {} visual: {:?}", params.visual, output_image);
    Ok(VisualArtifact {
        image_path: output_image.to_path_buf(),
        world_file_path: world_path,
        prj_path,
    })
}

/// Scratch directory inside the output directory. Files written there become
/// visible together on [`Staging::commit`]; dropping an uncommitted staging
/// area removes everything in it.
pub struct Staging {
    dir: TempDir,
    output_dir: PathBuf,
}

impl Staging {
    pub fn new(output: &OutputConfig) -> Result<Self> {
        let output_dir = output.ensure_dir()?.to_path_buf();
        let dir = tempfile::Builder::new()
            .prefix(".burnmap-staging-")
            .tempdir_in(&output_dir)?;
        debug!("Staging artifacts in {:?}", dir.path());
        Ok(Self { dir, output_dir })
    }

    /// Where to write a file that should end up as `file_name` in the output.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    pub fn final_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Move every staged file into the output directory. If any move fails the
    /// files already moved are removed again, so either all land or none do.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir.path())? {
            names.push(entry?.file_name());
        }
        names.sort();

        let mut committed: Vec<PathBuf> = Vec::with_capacity(names.len());
        for name in &names {
            let target = self.output_dir.join(name);
            if let Err(e) = fs::rename(self.dir.path().join(name), &target) {
                for path in &committed {
                    if let Err(cleanup) = fs::remove_file(path) {
                        warn!("Failed to roll back {:?}: {}", path, cleanup);
                    }
                }
                return Err(Error::Io(e));
            }
            committed.push(target);
        }
        info!(
            "Committed {} artifact(s) to {:?}",
            committed.len(),
            self.output_dir
        );
        Ok(committed)
    }
}

/// Write `{file_name}` into the output directory atomically.
pub fn export_delta_tiff(
    delta: &RasterGrid,
    output: &OutputConfig,
    file_name: &str,
) -> Result<PathBuf> {
    let staging = Staging::new(output)?;
    save_delta_tiff(delta, &staging.path(file_name))?;
    let final_path = staging.final_path(file_name);
    staging.commit()?;
    Ok(final_path)
}

/// Write the visual `{stem}.{ext}` and its sidecars into the output directory
/// as one unit.
pub fn export_visual(
    delta: &RasterGrid,
    params: &BurnParams,
    output: &OutputConfig,
    stem: &str,
) -> Result<VisualArtifact> {
    let staging = Staging::new(output)?;
    let file_name = format!("{}.{}", stem, params.image_format.extension());
    let staged = save_visual(delta, params, &staging.path(&file_name))?;
    let artifact = staged.relocated(staging.output_dir());
    staging.commit()?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncommitted_staging_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig::new(dir.path());
        {
            let staging = Staging::new(&output).unwrap();
            fs::write(staging.path("a.txt"), b"a").unwrap();
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn commit_moves_all_files_and_removes_staging() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig::new(dir.path().join("out"));
        let staging = Staging::new(&output).unwrap();
        fs::write(staging.path("b.png"), b"b").unwrap();
        fs::write(staging.path("b.pgw"), b"1.0").unwrap();
        let committed = staging.commit().unwrap();
        assert_eq!(
            committed,
            vec![output.artifact_path("b.pgw"), output.artifact_path("b.png")]
        );
        let names: Vec<_> = fs::read_dir(&output.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn relocated_keeps_file_names() {
        let staged = VisualArtifact {
            image_path: PathBuf::from("/tmp/.stage/x.png"),
            world_file_path: PathBuf::from("/tmp/.stage/x.pgw"),
            prj_path: None,
        };
        let moved = staged.relocated(Path::new("/out"));
        assert_eq!(moved.image_path, PathBuf::from("/out/x.png"));
        assert_eq!(moved.world_file_path, PathBuf::from("/out/x.pgw"));
    }
}
