use crate::catalog::{self, Catalog, MapCatalog, Tankopedia};
use crate::extract::{effective_base, extract_all};
use crate::registry::Registry;
use crate::resolve::resolve;
use crate::stats::ExtractionStats;
use crate::strings::{read_strings, strings_path};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

pub struct PipelineConfig {
    pub app_dir: PathBuf,
    pub tanks_path: PathBuf,
    /// `None` skips the maps catalog entirely
    pub maps_path: Option<PathBuf>,
    pub lang: String,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub tanks: usize,
    pub tank_strings: usize,
    pub maps: Option<usize>,
    pub nations_scanned: u64,
    pub nations_missing: u64,
    pub vehicles_extracted: u64,
    pub records_skipped: u64,
}

/// Extract, resolve and merge both catalogs into their files.
///
/// Stage order is fixed: all nations are extracted before the string table
/// is read, and nothing is written until names are resolved. Fatal errors
/// surface as `ExtractError` inside the returned `anyhow::Error`.
pub fn run(config: &PipelineConfig, registry: &Registry) -> Result<Summary> {
    let stats = ExtractionStats::new();

    info!(app_dir = ?config.app_dir, "Extracting vehicles");
    let vehicles = extract_all(&config.app_dir, registry, &stats)?;

    let strings_file = strings_path(&effective_base(&config.app_dir), &config.lang);
    let table = read_strings(&strings_file)?;

    let resolved = resolve(vehicles, &table.vehicle_strings);
    stats.add_records_skipped(resolved.skipped as u64);

    let tankopedia = catalog::merge_catalog(
        &config.tanks_path,
        Tankopedia::from_records(resolved.tanks, resolved.user_strings)?,
    );
    catalog::write_catalog(&config.tanks_path, &tankopedia)?;
    info!(path = ?config.tanks_path, tanks = tankopedia.len(), "Tankopedia written");

    let maps = match &config.maps_path {
        Some(path) => Some(catalog::merge_and_persist(
            path,
            MapCatalog::from_names(table.map_strings),
        )?),
        None => None,
    };

    Ok(Summary {
        tanks: tankopedia.len(),
        tank_strings: tankopedia.user_str.len(),
        maps,
        nations_scanned: stats.nations_scanned(),
        nations_missing: stats.nations_missing(),
        vehicles_extracted: stats.vehicles(),
        records_skipped: stats.records_skipped(),
    })
}
