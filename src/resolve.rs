use crate::error::{ExtractError, Outcome};
use crate::models::{RawVehicle, TankRecord};
use std::collections::BTreeMap;
use tracing::{debug, error};

const EXCLUDED_PREFIXES: [&str; 3] = ["Chassis_", "Turret_", "_"];
const EXCLUDED_SUFFIX: &str = "_short";

/// Output of name resolution, already in persisted sort order
/// (`BTreeMap<u32, _>` orders tanks numerically).
#[derive(Debug, Default)]
pub struct Resolved {
    pub tanks: BTreeMap<u32, TankRecord>,
    pub user_strings: BTreeMap<String, String>,
    pub skipped: usize,
}

/// Second `:`-separated segment of a localization key.
pub fn short_key(key: &str) -> Option<&str> {
    key.split(':').nth(1)
}

pub fn resolve_name(
    display_key: &str,
    vehicle_strings: &BTreeMap<String, String>,
) -> Outcome<String> {
    if let Some(name) = vehicle_strings.get(display_key) {
        return Ok(name.clone());
    }
    short_key(display_key)
        .map(str::to_string)
        .ok_or_else(|| ExtractError::MissingNameSeparator(display_key.to_string()))
}

/// Whether a short key belongs in the public `userStr` table.
pub fn is_public_user_string(short: &str) -> bool {
    !EXCLUDED_PREFIXES.iter().any(|p| short.starts_with(p)) && !short.ends_with(EXCLUDED_SUFFIX)
}

/// Short-name view of the vehicle strings. Two full keys can share a short
/// key; the table is walked in key order, so the lexicographically last full
/// key wins rather than the one appearing last in the localization file.
pub fn user_strings(vehicle_strings: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    vehicle_strings
        .iter()
        .filter_map(|(key, text)| {
            let short = short_key(key)?;
            is_public_user_string(short).then(|| (short.to_string(), text.clone()))
        })
        .collect()
}

/// Joins raw vehicles with their display strings. Records whose name cannot
/// be derived are logged and dropped; later records win on id collisions.
pub fn resolve(vehicles: Vec<RawVehicle>, vehicle_strings: &BTreeMap<String, String>) -> Resolved {
    let mut resolved = Resolved::default();

    for vehicle in vehicles {
        match resolve_name(&vehicle.display_key, vehicle_strings) {
            Ok(name) => {
                let record = TankRecord::from_raw(vehicle, name);
                resolved.tanks.insert(record.tank_id, record);
            }
            Err(e) => {
                error!(
                    tank_id = vehicle.tank_id,
                    nation = %vehicle.nation,
                    error = %e,
                    "Could not process tank"
                );
                resolved.skipped += 1;
            }
        }
    }

    resolved.user_strings = user_strings(vehicle_strings);
    debug!(
        tanks = resolved.tanks.len(),
        user_strings = resolved.user_strings.len(),
        skipped = resolved.skipped,
        "Names resolved"
    );
    resolved
}
