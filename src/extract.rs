use crate::config::{ASSETS_DIR, VEHICLES_DIR, VEHICLE_FILE};
use crate::error::{ExtractError, Outcome, Severity};
use crate::models::RawVehicle;
use crate::parser::{parse_document, XmlElement, XmlValue};
use crate::registry::Registry;
use crate::stats::ExtractionStats;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Newer client builds nest the `Data` tree under `assets/`.
pub fn effective_base(app_dir: &Path) -> PathBuf {
    let nested = app_dir.join(ASSETS_DIR);
    if nested.is_dir() {
        nested
    } else {
        app_dir.to_path_buf()
    }
}

pub fn vehicle_file_path(base: &Path, nation: &str) -> PathBuf {
    base.join(VEHICLES_DIR).join(nation).join(VEHICLE_FILE)
}

/// Reads one nation's `list.xml`. A missing file is reported as a skippable
/// error; anything wrong inside the file is fatal.
pub fn extract_nation(
    app_dir: &Path,
    nation: &str,
    registry: &Registry,
) -> Outcome<Vec<RawVehicle>> {
    let path = vehicle_file_path(&effective_base(app_dir), nation);
    if !path.is_file() {
        return Err(ExtractError::MissingVehicleFile(path));
    }
    debug!(path = ?path, nation, "Opening vehicle file");

    let xml = fs::read_to_string(&path).map_err(|source| ExtractError::VehicleFileIo {
        path: path.clone(),
        source,
    })?;
    let (_, root) = parse_document(&xml).map_err(|source| ExtractError::VehicleFileXml {
        path: path.clone(),
        source,
    })?;

    let Some(root) = root.as_element() else {
        debug!(nation, "Vehicle file has no entries");
        return Ok(Vec::new());
    };

    root.children()
        .map(|(key, value)| parse_vehicle(nation, key, value, registry))
        .collect()
}

fn parse_vehicle(
    nation: &str,
    key: &str,
    value: &XmlValue,
    registry: &Registry,
) -> Outcome<RawVehicle> {
    let malformed = |reason: String| ExtractError::MalformedEntry {
        nation: nation.to_string(),
        entry: key.to_string(),
        reason,
    };
    let entry = value
        .as_element()
        .ok_or_else(|| malformed("entry has no fields".to_string()))?;

    let price = entry
        .get("price")
        .ok_or_else(|| malformed("missing field 'price'".to_string()))?;
    let raw_id: u32 = number_field(entry, "id").map_err(malformed)?;
    let tier: u8 = number_field(entry, "level").map_err(malformed)?;
    let tags = text_field(entry, "tags").map_err(malformed)?;
    let display_key = text_field(entry, "userString").map_err(malformed)?;

    Ok(RawVehicle {
        is_premium: price.is_compound(),
        nation: nation.to_string(),
        tank_id: registry.encode_id(nation, raw_id)?,
        tier,
        vehicle_type: registry.classify(tags),
        display_key: display_key.to_string(),
    })
}

fn text_field<'a>(entry: &'a XmlElement, name: &str) -> Result<&'a str, String> {
    entry
        .get(name)
        .ok_or_else(|| format!("missing field '{}'", name))?
        .text()
        .ok_or_else(|| format!("field '{}' has no text", name))
}

fn number_field<T: FromStr>(entry: &XmlElement, name: &str) -> Result<T, String> {
    let text = text_field(entry, name)?;
    text.trim()
        .parse()
        .map_err(|_| format!("field '{}' is not a number: {:?}", name, text))
}

/// Runs every nation of the registry in parallel and concatenates the results
/// in registry order. Missing nations are logged and skipped; the first fatal
/// error aborts.
pub fn extract_all(
    app_dir: &Path,
    registry: &Registry,
    stats: &ExtractionStats,
) -> Outcome<Vec<RawVehicle>> {
    let nations: Vec<&str> = registry.nations().collect();
    let pb = ProgressBar::new(nations.len() as u64);

    let per_nation: Vec<Outcome<Vec<RawVehicle>>> = nations
        .par_iter()
        .map(|nation| {
            let result = extract_nation(app_dir, nation, registry);
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_and_clear();

    let mut vehicles = Vec::new();
    for (nation, result) in nations.iter().zip(per_nation) {
        match result {
            Ok(batch) => {
                info!(nation, vehicles = batch.len(), "Nation extracted");
                stats.inc_nations_scanned();
                stats.add_vehicles(batch.len() as u64);
                vehicles.extend(batch);
            }
            Err(e) if e.severity() == Severity::Skippable => {
                warn!(nation, error = %e, "Skipping nation");
                stats.inc_nations_missing();
            }
            Err(e) => return Err(e),
        }
    }

    Ok(vehicles)
}
