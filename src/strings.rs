use crate::config::{EXCLUDED_MAP_NAME, STRINGS_DIR};
use crate::error::{ExtractError, Outcome};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `"#<tag>_vehicles:<rest>": "<text>"`, keyed by the full `#..._vehicles:...` key
static VEHICLE_STRING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(#\w+?_vehicles:.+?)": "(.+)"$"#).unwrap());

/// `"#maps:<mapkey>:...": "<text>"`, keyed by `<mapkey>` only
static MAP_STRING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"^"#maps:(.+?):.+?: "(.+?)"$"##).unwrap());

/// Lookup tables pulled from one localization file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StringTable {
    pub vehicle_strings: BTreeMap<String, String>,
    pub map_strings: BTreeMap<String, String>,
}

impl StringTable {
    /// Feeds one line through both matchers. Lines matching neither are ignored.
    pub fn ingest_line(&mut self, line: &str) {
        if let Some(caps) = VEHICLE_STRING_REGEX.captures(line) {
            self.vehicle_strings
                .insert(caps[1].to_string(), caps[2].to_string());
        }
        if let Some(caps) = MAP_STRING_REGEX.captures(line) {
            if &caps[2] != EXCLUDED_MAP_NAME {
                self.map_strings
                    .insert(caps[1].to_string(), caps[2].to_string());
            }
        }
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::default();
        for line in lines {
            table.ingest_line(line);
        }
        table
    }
}

pub fn strings_path(base: &Path, lang: &str) -> PathBuf {
    base.join(STRINGS_DIR).join(format!("{}.yaml", lang))
}

/// Reads the localization file line by line. Any I/O failure, including a
/// missing file, is fatal.
pub fn read_strings(path: &Path) -> Outcome<StringTable> {
    let to_error = |source| ExtractError::Localization {
        path: path.to_path_buf(),
        source,
    };
    debug!(path = ?path, "Opening localization file");

    let reader = BufReader::new(File::open(path).map_err(to_error)?);
    let mut table = StringTable::default();
    for line in reader.lines() {
        table.ingest_line(&line.map_err(to_error)?);
    }

    debug!(
        vehicle_strings = table.vehicle_strings.len(),
        map_strings = table.map_strings.len(),
        "Localization file read"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn vehicle_line_keeps_full_key() {
        let table = StringTable::from_lines([r##""#usa_vehicles:M4_Sherman": "M4 Sherman""##]);
        assert_eq!(
            table.vehicle_strings.get("#usa_vehicles:M4_Sherman").map(String::as_str),
            Some("M4 Sherman")
        );
        assert!(table.map_strings.is_empty());
    }

    #[test]
    fn vehicle_text_may_contain_quotes_and_unicode() {
        let table = StringTable::from_lines([r##""#ussr_vehicles:T-34": "Т-34 "Победа"""##]);
        assert_eq!(
            table.vehicle_strings.get("#ussr_vehicles:T-34").map(String::as_str),
            Some(r#"Т-34 "Победа""#)
        );
    }

    #[test]
    fn map_line_is_keyed_by_map_key() {
        let table = StringTable::from_lines([r##""#maps:himmelsdorf:title": "Himmelsdorf""##]);
        assert_eq!(
            table.map_strings.get("himmelsdorf").map(String::as_str),
            Some("Himmelsdorf")
        );
        assert!(table.vehicle_strings.is_empty());
    }

    #[test]
    fn placeholder_map_is_excluded() {
        let table = StringTable::from_lines([
            r##""#maps:warhammer:title": "Macragge""##,
            r##""#maps:rockfield:title": "Rockfield""##,
        ]);
        assert_eq!(table.map_strings.len(), 1);
        assert!(!table.map_strings.values().any(|v| v == "Macragge"));
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let table = StringTable::from_lines([
            "# comment",
            "",
            r##""#menu:battle": "Battle!""##,
            r##"  "#usa_vehicles:M2": "indented""##,
            r##""#usa_vehicles:M2" : "spaced""##,
        ]);
        assert!(table.vehicle_strings.is_empty());
        assert!(table.map_strings.is_empty());
    }

    #[test]
    fn read_strings_from_file() {
        let dir = TempDir::new().unwrap();
        let path = strings_path(dir.path(), "en");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "\"#usa_vehicles:M2\": \"M2 Light\"\r\n\"#maps:desert:title\": \"Desert Sands\"\n",
        )
        .unwrap();

        let table = read_strings(&path).unwrap();
        assert_eq!(table.vehicle_strings.get("#usa_vehicles:M2").unwrap(), "M2 Light");
        assert_eq!(table.map_strings.get("desert").unwrap(), "Desert Sands");
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = read_strings(&strings_path(dir.path(), "en")).unwrap_err();
        assert!(matches!(err, ExtractError::Localization { .. }));
        assert_eq!(err.severity(), crate::error::Severity::Fatal);
    }

    #[test]
    fn strings_path_uses_language() {
        let path = strings_path(Path::new("/app"), "ru");
        assert_eq!(path, PathBuf::from("/app/Data/Strings/ru.yaml"));
    }
}
