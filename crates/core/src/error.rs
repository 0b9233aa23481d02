use std::path::PathBuf;

use crate::plan::SectionId;

/// Errors raised while loading a section catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("could not read catalog '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid TOML or does not match the expected layout.
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// The same section id was declared twice.
    #[error("duplicate section in catalog: {0}")]
    DuplicateSection(SectionId),
}
