use crate::parser::XmlTreeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// How the orchestrating caller should react to an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Log it, drop the affected unit (a nation or a record) and keep going.
    Skippable,
    /// Abort the whole run.
    Fatal,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unknown nation: {0}")]
    UnknownNation(String),

    #[error("nation {nation} has index {index}, which does not fit in 4 bits")]
    NationIndexOutOfRange { nation: String, index: u8 },

    #[error("cannot open {}", .0.display())]
    MissingVehicleFile(PathBuf),

    #[error("failed to read vehicle file {}", path.display())]
    VehicleFileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse vehicle file {}", path.display())]
    VehicleFileXml {
        path: PathBuf,
        #[source]
        source: XmlTreeError,
    },

    #[error("malformed vehicle entry {entry} ({nation}): {reason}")]
    MalformedEntry {
        nation: String,
        entry: String,
        reason: String,
    },

    #[error("failed to read localization file {}", path.display())]
    Localization {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("display key {0:?} has no ':' separator")]
    MissingNameSeparator(String),
}

impl ExtractError {
    pub fn severity(&self) -> Severity {
        match self {
            ExtractError::MissingVehicleFile(_) | ExtractError::MissingNameSeparator(_) => {
                Severity::Skippable
            }
            _ => Severity::Fatal,
        }
    }

    /// Process exit status for a fatal error: 2 for anything raised while
    /// extracting vehicles, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractError::UnknownNation(_)
            | ExtractError::VehicleFileIo { .. }
            | ExtractError::VehicleFileXml { .. }
            | ExtractError::MalformedEntry { .. } => 2,
            _ => 1,
        }
    }
}

pub type Outcome<T> = std::result::Result<T, ExtractError>;
