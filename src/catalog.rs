use crate::config::{JSON_INDENT, STATUS_OK};
use crate::models::TankRecord;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A persisted JSON catalog that can absorb a newer batch of entries.
pub trait Catalog: Serialize + DeserializeOwned + Default {
    /// Key-wise overlay: entries of `newer` replace or add, everything else stays.
    fn overlay(&mut self, newer: Self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub count: usize,
}

fn default_status() -> String {
    STATUS_OK.to_string()
}

/// `tanks.json`: records keyed by encoded tank id (numeric order), plus the
/// public short-name table.
///
/// Entries are held as raw JSON so prior records keep fields this tool does
/// not produce, and a record of an unfamiliar shape never invalidates the
/// rest of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tankopedia {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub meta: Meta,
    pub data: BTreeMap<u32, Value>,
    #[serde(rename = "userStr")]
    pub user_str: BTreeMap<String, Value>,
}

impl Tankopedia {
    pub fn new(data: BTreeMap<u32, Value>, user_str: BTreeMap<String, Value>) -> Self {
        Self {
            status: default_status(),
            meta: Meta { count: data.len() },
            data,
            user_str,
        }
    }

    /// Builds a batch from freshly resolved records and short names.
    pub fn from_records(
        records: BTreeMap<u32, TankRecord>,
        user_str: BTreeMap<String, String>,
    ) -> Result<Self> {
        let data = records
            .into_iter()
            .map(|(id, record)| {
                serde_json::to_value(record)
                    .map(|value| (id, value))
                    .with_context(|| format!("Failed to convert tank {}", id))
            })
            .collect::<Result<_>>()?;
        let user_str = user_str
            .into_iter()
            .map(|(key, text)| (key, Value::String(text)))
            .collect();
        Ok(Self::new(data, user_str))
    }
}

impl Default for Tankopedia {
    fn default() -> Self {
        Self::new(BTreeMap::new(), BTreeMap::new())
    }
}

impl Catalog for Tankopedia {
    fn overlay(&mut self, newer: Self) {
        self.data.extend(newer.data);
        self.user_str.extend(newer.user_str);
        self.status = default_status();
        self.meta.count = self.data.len();
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

/// `maps.json`: flat map key to display name, lexicographic order. Values
/// stay raw JSON for the same reason as [`Tankopedia`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapCatalog(pub BTreeMap<String, Value>);

impl MapCatalog {
    pub fn from_names(names: BTreeMap<String, String>) -> Self {
        Self(
            names
                .into_iter()
                .map(|(key, name)| (key, Value::String(name)))
                .collect(),
        )
    }
}

impl Catalog for MapCatalog {
    fn overlay(&mut self, newer: Self) {
        self.0.extend(newer.0);
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Loads a prior catalog. A missing file yields an empty catalog; an
/// unreadable or malformed one is logged and also treated as empty.
pub fn load_catalog<C: Catalog>(path: &Path) -> C {
    if !path.exists() {
        debug!(path = ?path, "No prior catalog");
        return C::default();
    }

    let parsed: Result<C> = fs::read_to_string(path)
        .context("Failed to read file")
        .and_then(|text| serde_json::from_str(&text).context("Failed to parse JSON"));

    match parsed {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(
                path = ?path,
                error = %format!("{:#}", e),
                "Unexpected error when reading prior catalog"
            );
            C::default()
        }
    }
}

/// Pretty JSON with 4-space indent. Non-ASCII text is written literally.
pub fn render<C: Serialize>(catalog: &C) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog
        .serialize(&mut ser)
        .context("Failed to serialize catalog")?;
    String::from_utf8(buf).context("Serialized catalog is not UTF-8")
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes atomically via rename so a failed write leaves the old file intact.
pub fn write_catalog<C: Serialize>(path: &Path, catalog: &C) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let text = render(catalog)?;
    let tmp_path = temp_path(path);
    fs::write(&tmp_path, text)
        .with_context(|| format!("Failed to write temp catalog file: {:?}", tmp_path))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to rename temp catalog file to: {:?}", path))?;
    Ok(())
}

/// Prior catalog at `path` with `newer` laid over it. Nothing is written.
pub fn merge_catalog<C: Catalog>(path: &Path, newer: C) -> C {
    let mut catalog: C = load_catalog(path);
    let prior = catalog.len();
    catalog.overlay(newer);
    debug!(path = ?path, prior, merged = catalog.len(), "Catalog merged");
    catalog
}

/// Load, overlay, write back. Returns the merged entry count.
pub fn merge_and_persist<C: Catalog>(path: &Path, newer: C) -> Result<usize> {
    let catalog = merge_catalog(path, newer);
    write_catalog(path, &catalog)?;
    info!(path = ?path, entries = catalog.len(), "Catalog written");
    Ok(catalog.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;
    use tempfile::TempDir;

    fn record(tank_id: u32, name: &str) -> TankRecord {
        TankRecord {
            is_premium: false,
            name: name.to_string(),
            nation: "germany".to_string(),
            tank_id,
            tier: 6,
            vehicle_type: Some(VehicleType::HeavyTank),
        }
    }

    fn maps(pairs: &[(&str, &str)]) -> MapCatalog {
        MapCatalog::from_names(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn tankopedia(records: Vec<TankRecord>, user: &[(&str, &str)]) -> Tankopedia {
        Tankopedia::from_records(
            records.into_iter().map(|r| (r.tank_id, r)).collect(),
            user.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn map_overlay_replaces_and_keeps() {
        let mut prior = maps(&[("1", "A"), ("2", "B")]);
        prior.overlay(maps(&[("2", "B2"), ("3", "C")]));
        assert_eq!(prior, maps(&[("1", "A"), ("2", "B2"), ("3", "C")]));
    }

    #[test]
    fn tankopedia_overlay_recounts() {
        let mut prior = tankopedia(vec![record(1, "A"), record(2, "B")], &[]);
        let newer = tankopedia(vec![record(2, "B2"), record(3, "C")], &[("C", "C")]);
        prior.overlay(newer);
        assert_eq!(prior.meta.count, 3);
        assert_eq!(prior.data[&1]["name"], "A");
        assert_eq!(prior.data[&2]["name"], "B2");
        assert_eq!(prior.data[&3]["name"], "C");
        assert_eq!(prior.user_str.len(), 1);
    }

    #[test]
    fn render_uses_four_space_indent_and_literal_unicode() {
        let text = render(&maps(&[("moscow", "Москва")])).unwrap();
        assert_eq!(text, "{\n    \"moscow\": \"Москва\"\n}");
    }

    #[test]
    fn tankopedia_layout() {
        let catalog = tankopedia(vec![record(10, "B"), record(9, "A")], &[]);
        let text = render(&catalog).unwrap();
        let status = text.find("\"status\"").unwrap();
        let meta = text.find("\"meta\"").unwrap();
        let data = text.find("\"data\"").unwrap();
        let user = text.find("\"userStr\"").unwrap();
        assert!(status < meta && meta < data && data < user);
        assert!(text.find("\"9\"").unwrap() < text.find("\"10\"").unwrap());
        assert!(text.contains("\"count\": 2"));
    }

    #[test]
    fn load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let catalog: Tankopedia = load_catalog(&dir.path().join("tanks.json"));
        assert!(catalog.is_empty());
        assert_eq!(catalog.status, "ok");
    }

    #[test]
    fn load_corrupt_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, "{ not json").unwrap();
        let catalog: MapCatalog = load_catalog(&path);
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_tankopedia_with_wrong_shape_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tanks.json");
        fs::write(&path, r#"{"status": "ok", "data": {}}"#).unwrap();
        let catalog: Tankopedia = load_catalog(&path);
        assert!(catalog.is_empty());
    }

    #[test]
    fn write_replaces_without_leaving_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("maps.json");
        write_catalog(&path, &maps(&[("a", "A")])).unwrap();
        write_catalog(&path, &maps(&[("b", "B")])).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"b\": \"B\"\n}");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn merge_and_persist_counts_merged_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, r#"{"1": "A", "2": "B"}"#).unwrap();

        let count = merge_and_persist(&path, maps(&[("2", "B2"), ("3", "C")])).unwrap();
        assert_eq!(count, 3);

        let reloaded: MapCatalog = load_catalog(&path);
        assert_eq!(reloaded, maps(&[("1", "A"), ("2", "B2"), ("3", "C")]));
    }

    #[test]
    fn corrupt_prior_is_overwritten_with_new_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, "garbage").unwrap();

        let count = merge_and_persist(&path, maps(&[("x", "X")])).unwrap();
        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"x\": \"X\"\n}");
    }

    #[test]
    fn from_records_writes_record_fields() {
        let catalog = tankopedia(vec![record(9, "A")], &[("A", "A tank")]);
        assert_eq!(catalog.data[&9]["tank_id"], 9);
        assert_eq!(catalog.data[&9]["type"], "heavyTank");
        assert_eq!(catalog.user_str["A"], "A tank");
    }

    #[test]
    fn prior_record_keeps_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tanks.json");
        fs::write(
            &path,
            r#"{"data": {"33": {"description": "old", "is_premium": true, "name": "Old",
                "nation": "usa", "tank_id": 33, "tier": 1, "type": "lightTank"}},
                "userStr": {}}"#,
        )
        .unwrap();

        merge_and_persist(&path, Tankopedia::default()).unwrap();

        let after: Tankopedia = load_catalog(&path);
        assert_eq!(after.data[&33]["description"], "old");
        assert_eq!(after.data[&33]["name"], "Old");
    }

    #[test]
    fn prior_record_of_unknown_shape_keeps_siblings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tanks.json");
        fs::write(
            &path,
            r#"{"data": {
                "33": {"name": "Arty", "type": "SPG", "tier": 300},
                "49": {"is_premium": false, "name": "Light", "nation": "usa",
                       "tank_id": 49, "tier": 1, "type": "lightTank"}
            }, "userStr": {}}"#,
        )
        .unwrap();

        let count = merge_and_persist(&path, tankopedia(vec![record(65, "New")], &[])).unwrap();
        assert_eq!(count, 3);

        let after: Tankopedia = load_catalog(&path);
        assert_eq!(after.data[&33]["type"], "SPG");
        assert_eq!(after.data[&33]["tier"], 300);
        assert_eq!(after.data[&49]["name"], "Light");
        assert_eq!(after.data[&65]["name"], "New");
    }

    #[test]
    fn prior_map_values_are_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, r#"{"legacy": {"name": "Legacy"}, "plain": "Plain"}"#).unwrap();

        let count = merge_and_persist(&path, maps(&[("new", "New")])).unwrap();
        assert_eq!(count, 3);

        let after: MapCatalog = load_catalog(&path);
        assert_eq!(after.0["legacy"]["name"], "Legacy");
        assert_eq!(after.0["plain"], "Plain");
    }
}
