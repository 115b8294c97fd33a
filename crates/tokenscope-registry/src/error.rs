use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the registry load/write boundary
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    /// The file the failing operation was working on
    pub fn path(&self) -> &std::path::Path {
        match self {
            RegistryError::Io { path, .. } => path,
            RegistryError::Parse { path, .. } => path,
            RegistryError::Write { path, .. } => path,
        }
    }
}
