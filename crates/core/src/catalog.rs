//! Section catalog: which groups belong to which section.
//!
//! The membership backend hands out grants as flat lists of section and group
//! ids. Without knowing the section membership of each group, mixed
//! group/section comparisons can only be approximated. A catalog makes them
//! exact.
//!
//! # Example
//!
//! ```toml
//! [[section]]
//! id = 10
//! name = "Martial arts"
//! groups = [1, 2, 3]
//!
//! [[section]]
//! id = 11
//! name = "Swimming"
//! groups = [4, 5]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageDescriptor;
use crate::error::CatalogError;
use crate::plan::{GroupId, SectionId};

/// One section and the groups it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub id: SectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub groups: BTreeSet<GroupId>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "section")]
    sections: Vec<CatalogSection>,
}

/// Authoritative section → groups map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCatalog {
    sections: BTreeMap<SectionId, CatalogSection>,
}

impl SectionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate section ids.
    pub fn from_sections(
        sections: impl IntoIterator<Item = CatalogSection>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = SectionCatalog::new();
        for section in sections {
            catalog.insert(section)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, section: CatalogSection) -> Result<(), CatalogError> {
        if self.sections.contains_key(&section.id) {
            return Err(CatalogError::DuplicateSection(section.id));
        }
        self.sections.insert(section.id, section);
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_sections(file.sections)
    }

    /// Read and parse a catalog TOML file from `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            sections = catalog.len(),
            "loaded section catalog"
        );
        Ok(catalog)
    }

    pub fn groups_of(&self, section: SectionId) -> Option<&BTreeSet<GroupId>> {
        self.sections.get(&section).map(|s| &s.groups)
    }

    pub fn contains(&self, section: SectionId) -> bool {
        self.sections.contains_key(&section)
    }

    /// True when every section referenced by `coverage` is in the catalog.
    pub fn knows(&self, coverage: &CoverageDescriptor) -> bool {
        coverage.section_ids.iter().all(|id| self.contains(*id))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = &CatalogSection> {
        self.sections.values()
    }
}
