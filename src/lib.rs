//! Tankopedia: catalog extraction from unpacked Blitz game files
//!
//! Reads the per-nation vehicle definitions and the localization table of a
//! game client and merges the results into two JSON catalogs:
//!
//! 1. **Extraction** -- Each nation's `list.xml` is parsed in parallel into raw
//!    vehicle records carrying an encoded tank id and a localization key
//! 2. **String table** -- The localization file is scanned line by line for
//!    vehicle and map display strings
//! 3. **Resolution** -- Raw records are joined with their display names and the
//!    public short-name table (`userStr`) is derived
//! 4. **Persistence** -- New entries are laid over any existing `tanks.json` and
//!    `maps.json`, and both are written back in a stable sorted order
//!
//! # Error policy
//!
//! Every library error is an [`error::ExtractError`] carrying a
//! [`error::Severity`]. A missing nation file or an unnamed record is skipped;
//! malformed vehicle data, an unreadable localization file or an unknown nation
//! abort the run. An unreadable prior catalog is replaced by an empty one.
//!
//! # Key Modules
//!
//! - [`registry`] -- Nation/type tables, tank id encoding, type classification
//! - [`parser`] -- Generic XML element tree built on quick-xml events
//! - [`extract`] -- Per-nation extraction and parallel fan-out
//! - [`strings`] -- Localization line matchers
//! - [`resolve`] -- Name resolution and `userStr` filtering
//! - [`catalog`] -- Catalog load, overlay and atomic write
//! - [`pipeline`] -- End-to-end run used by the binary
//!
//! # Example Usage
//!
//! ```bash
//! # Read from an unpacked APK, write tanks.json and maps.json in the current dir
//! tankopedia ~/blitz-apk -v
//!
//! # Russian names, tankopedia only
//! tankopedia ~/blitz-apk ru_tanks.json --lang ru --no-maps
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod stats;
pub mod strings;
