/// Subdirectory used by newer client packagings (e.g. the Steam build)
pub const ASSETS_DIR: &str = "assets";

/// Per-nation vehicle definitions live at `<base>/VEHICLES_DIR/<nation>/VEHICLE_FILE`
pub const VEHICLES_DIR: &str = "Data/XML/item_defs/vehicles";
pub const VEHICLE_FILE: &str = "list.xml";

/// Localization files live at `<base>/STRINGS_DIR/<lang>.yaml`
pub const STRINGS_DIR: &str = "Data/Strings";
pub const DEFAULT_LANG: &str = "en";

pub const DEFAULT_TANKS_FILE: &str = "tanks.json";
pub const DEFAULT_MAPS_FILE: &str = "maps.json";

/// Placeholder map name shipped in the client that is not a playable map
pub const EXCLUDED_MAP_NAME: &str = "Macragge";

/// Indentation used for both output catalogs
pub const JSON_INDENT: &[u8] = b"    ";

/// Constant `status` field of the tankopedia
pub const STATUS_OK: &str = "ok";
