//! Error types for map generation.
//!
//! Only I/O-level problems are errors. Lexical oddities never fail a scan,
//! and convention violations are recorded on the map as diagnostics.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A scan root is neither a file nor a directory.
    #[error("could not scan for classes inside \"{path}\" which does not appear to be a file nor a folder")]
    RootNotFound { path: String },

    /// A candidate file could not be read.
    #[error("file at \"{path}\" could not be read: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed part way through a root.
    #[error("failed to walk \"{path}\": {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    /// Lookup of a symbol that is not present in the map.
    #[error("class {name} is not present in the map")]
    SymbolNotFound { name: String },

    /// A convention rule that cannot be applied.
    #[error("invalid convention rule: {reason}")]
    InvalidConvention { reason: String },
}

impl Error {
    /// Build a read error for `path`.
    pub fn read(path: impl Into<String>, source: io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested input does not exist at all.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::RootNotFound { .. } => true,
            Error::Read { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
