use gdal::{Dataset, Metadata};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::io::gdal::GdalError;

/// Dataset-level metadata items describing a delta-index artifact.
pub fn delta_metadata_fields(index_name: &str, nodata: f64) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("PRODUCT".to_string(), "delta_nbr".to_string());
    metadata.insert("INDEX".to_string(), index_name.to_string());
    metadata.insert("DELTA_DEFINITION".to_string(), "pre - post".to_string());
    metadata.insert("NODATA_SENTINEL".to_string(), nodata.to_string());
    metadata.insert("CONVERSION_TOOL".to_string(), "burnmap".to_string());
    metadata.insert(
        "CONVERSION_VERSION".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    metadata.insert(
        "CONVERSION_TIMESTAMP".to_string(),
        chrono::Utc::now().to_rfc3339(),
    );
    metadata
}

/// Embed metadata items into a GeoTIFF dataset (default domain)
pub fn embed_tiff_metadata(
    ds: &mut Dataset,
    metadata: &BTreeMap<String, String>,
) -> std::result::Result<(), GdalError> {
    for (key, value) in metadata {
        ds.set_metadata_item(key, value, "")?;
    }
    Ok(())
}

/// Write any serialisable record as a pretty-printed JSON file.
pub fn write_json_sidecar<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json_string)?;
    info!("Created JSON sidecar: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_describe_the_product() {
        let m = delta_metadata_fields("NBR", -9999.0);
        assert_eq!(m["PRODUCT"], "delta_nbr");
        assert_eq!(m["INDEX"], "NBR");
        assert_eq!(m["NODATA_SENTINEL"], "-9999");
        assert_eq!(m["CONVERSION_TOOL"], "burnmap");
        assert!(m.contains_key("CONVERSION_TIMESTAMP"));
    }
}
