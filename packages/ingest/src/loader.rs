//! Partition loading.

use std::path::Path;

use fho_verify_spatial::Crs;
use fho_verify_spatial::features::collection_crs;
use geojson::{Feature, FeatureCollection, GeoJson};

use crate::IngestError;

/// Reads one `GeoJSON` partition and its coordinate reference.
///
/// # Errors
///
/// * If the file cannot be read
/// * If it is not a `FeatureCollection`
/// * If it names an unsupported coordinate reference
pub fn read_collection(path: &Path) -> Result<(FeatureCollection, Crs), IngestError> {
    let text = std::fs::read_to_string(path)?;
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(feature) => FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        GeoJson::Geometry(_) => {
            return Err(IngestError::NotFeatureCollection(path.display().to_string()));
        }
    };
    let crs = collection_crs(&collection)?;

    Ok((collection, crs))
}

/// Loads a table from its partitions. Each partition carries a context
/// value handed to `convert` with every feature it holds.
///
/// Missing partitions are skipped with a warning, and so are features
/// that fail to convert. The table as a whole fails if no partition could
/// be read.
///
/// # Errors
///
/// * [`IngestError::EmptyTable`] if none of the partitions loaded
/// * If a present partition cannot be parsed
pub fn load_table<T, C, P: AsRef<Path>>(
    table: &'static str,
    partitions: impl IntoIterator<Item = (P, C)>,
    mut convert: impl FnMut(Feature, Crs, &C) -> Result<T, IngestError>,
) -> Result<Vec<T>, IngestError> {
    let mut rows = Vec::new();
    let mut loaded = 0_usize;

    for (partition, context) in partitions {
        let path = partition.as_ref();
        if !path.is_file() {
            log::warn!("Could not read {table} partition {}: not found", path.display());
            continue;
        }

        let (collection, crs) = read_collection(path)?;
        let total = collection.features.len();
        let mut skipped = 0_usize;

        for feature in collection.features {
            match convert(feature, crs, &context) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    log::debug!("{}: skipping feature: {e}", path.display());
                }
            }
        }

        if skipped > 0 {
            log::warn!(
                "{}: skipped {skipped} of {total} features that could not be converted",
                path.display()
            );
        }
        log::info!(
            "Loaded {} {table} features from {} ({crs:?})",
            total - skipped,
            path.display()
        );
        loaded += 1;
    }

    if loaded == 0 {
        return Err(IngestError::EmptyTable(table));
    }

    Ok(rows)
}
