//! gymplan-core: data model and coverage lattice for gym membership plans.
//!
//! Provides the pieces the membership-change classifier is built from:
//!
//! - [`PlanInput`] -- a current membership or candidate plan as supplied by the caller
//! - [`extract_coverage()`] / [`CoverageDescriptor`] -- canonical coverage sets
//! - [`CoverageComparator`] -- strict superset, inclusion and equality over coverage
//! - [`resolve_duration()`] -- billing cadence to a day count
//! - [`SectionCatalog`] -- optional section → groups map for exact comparisons
//!
//! Everything here is pure. No call performs I/O except
//! [`SectionCatalog::load`].

pub mod catalog;
pub mod coverage;
pub mod duration;
pub mod error;
pub mod plan;

pub use catalog::{CatalogSection, SectionCatalog};
pub use coverage::{
    are_equal, extract_coverage, includes_coverage, is_strict_superset, CoverageComparator,
    CoverageDescriptor,
};
pub use duration::{
    resolve_duration, resolve_duration_days, DurationResolution, DurationSource,
    FALLBACK_DURATION_DAYS,
};
pub use error::CatalogError;
pub use plan::{AccessGrant, GrantKind, GroupId, PackageType, PaymentType, PlanInput, SectionId};
