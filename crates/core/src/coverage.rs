//! Coverage extraction and the coverage partial order.
//!
//! Offerings form a containment lattice: group ⊂ section ⊂ club. A
//! [`CoverageDescriptor`] is the canonical form of a plan's grants and the
//! [`CoverageComparator`] answers three questions about two descriptors:
//! equality, strict superset and inclusion.
//!
//! `full_club` is a sentinel. Its id sets are empty and it compares as
//! covering everything, whatever the sets say.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::SectionCatalog;
use crate::plan::{AccessGrant, GroupId, PackageType, PlanInput, SectionId};

/// Canonical coverage of one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageDescriptor {
    pub group_ids: BTreeSet<GroupId>,
    pub section_ids: BTreeSet<SectionId>,
    pub package_type: PackageType,
}

impl CoverageDescriptor {
    /// Coverage of a plan input.
    pub fn of(plan: &PlanInput) -> Self {
        extract_coverage(
            &plan.included_groups,
            &plan.included_sections,
            plan.package_type,
        )
    }

    pub fn is_full_club(&self) -> bool {
        self.package_type == PackageType::FullClub
    }

    /// Groups reachable through this coverage, given a section map.
    fn effective_groups(&self, catalog: &SectionCatalog) -> BTreeSet<GroupId> {
        let mut groups = self.group_ids.clone();
        for section in &self.section_ids {
            if let Some(members) = catalog.groups_of(*section) {
                groups.extend(members.iter().copied());
            }
        }
        groups
    }
}

/// Normalize raw grant lists into a [`CoverageDescriptor`].
///
/// Never fails. A `full_club` package drops its id sets.
pub fn extract_coverage(
    groups: &[AccessGrant],
    sections: &[AccessGrant],
    package_type: PackageType,
) -> CoverageDescriptor {
    if package_type == PackageType::FullClub {
        return CoverageDescriptor {
            group_ids: BTreeSet::new(),
            section_ids: BTreeSet::new(),
            package_type,
        };
    }

    CoverageDescriptor {
        group_ids: groups.iter().map(|g| GroupId(g.id)).collect(),
        section_ids: sections.iter().map(|s| SectionId(s.id)).collect(),
        package_type,
    }
}

/// Partial order over coverage descriptors.
///
/// `base` is the reference side (usually the current membership) and `other`
/// the side being measured against it (usually the candidate).
///
/// With a [`SectionCatalog`] that knows every section on both sides the
/// comparison is exact. Otherwise a heuristic over the raw id sets is used,
/// which cannot tell whether a group belongs to a section.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageComparator<'a> {
    catalog: Option<&'a SectionCatalog>,
}

impl<'a> CoverageComparator<'a> {
    pub fn new(catalog: Option<&'a SectionCatalog>) -> Self {
        CoverageComparator { catalog }
    }

    /// Comparator that never consults a section map.
    pub fn heuristic() -> Self {
        CoverageComparator { catalog: None }
    }

    pub fn with_catalog(catalog: &'a SectionCatalog) -> Self {
        CoverageComparator {
            catalog: Some(catalog),
        }
    }

    /// Does `other` provide strictly broader coverage than `base`?
    pub fn is_strict_superset(
        &self,
        base: &CoverageDescriptor,
        other: &CoverageDescriptor,
    ) -> bool {
        if other.is_full_club() {
            return !base.is_full_club();
        }
        if base.is_full_club() {
            return false;
        }

        match self.exact_catalog(base, other) {
            Some(catalog) => {
                exact_includes(catalog, base, other) && !exact_includes(catalog, other, base)
            }
            None => heuristic_strict_superset(base, other),
        }
    }

    /// Does `other` provide at least the coverage of `base`?
    ///
    /// Equal coverage always includes itself, even with no grants.
    pub fn includes_coverage(
        &self,
        base: &CoverageDescriptor,
        other: &CoverageDescriptor,
    ) -> bool {
        if self.are_equal(base, other) {
            return true;
        }
        if other.is_full_club() {
            return true;
        }
        if base.is_full_club() {
            return false;
        }

        match self.exact_catalog(base, other) {
            Some(catalog) => exact_includes(catalog, base, other),
            None => heuristic_includes(base, other),
        }
    }

    /// Same package type and, below `full_club`, identical id sets.
    pub fn are_equal(&self, base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
        if base.package_type != other.package_type {
            return false;
        }
        base.is_full_club()
            || (base.group_ids == other.group_ids && base.section_ids == other.section_ids)
    }

    /// The catalog, when it can decide containment for both sides.
    fn exact_catalog(
        &self,
        base: &CoverageDescriptor,
        other: &CoverageDescriptor,
    ) -> Option<&'a SectionCatalog> {
        self.catalog
            .filter(|catalog| catalog.knows(base) && catalog.knows(other))
    }
}

/// [`CoverageComparator::is_strict_superset`] without a section map.
pub fn is_strict_superset(base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
    CoverageComparator::heuristic().is_strict_superset(base, other)
}

/// [`CoverageComparator::includes_coverage`] without a section map.
pub fn includes_coverage(base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
    CoverageComparator::heuristic().includes_coverage(base, other)
}

/// [`CoverageComparator::are_equal`].
pub fn are_equal(base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
    CoverageComparator::heuristic().are_equal(base, other)
}

// ── Heuristic ─────────────────────────────────────────────────────────────────

fn heuristic_strict_superset(base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
    if let Some(decided) = package_superset(base, other) {
        return decided;
    }
    proper_superset(&base.section_ids, &other.section_ids)
        || proper_superset(&base.group_ids, &other.group_ids)
}

/// Superset rules keyed on the candidate's package type.
///
/// `Some` settles the question; `None` defers to the generic set rule. A
/// `full_section` candidate is always settled here so that a superset verdict
/// implies inclusion.
fn package_superset(base: &CoverageDescriptor, other: &CoverageDescriptor) -> Option<bool> {
    match other.package_type {
        PackageType::FullSection => {
            let widens = matches!(
                base.package_type,
                PackageType::SingleGroup | PackageType::MultipleGroups | PackageType::FullSection
            ) && !base.section_ids.is_empty()
                && base.section_ids.is_subset(&other.section_ids)
                && (base.package_type != PackageType::FullSection
                    || other.section_ids.len() > base.section_ids.len());
            Some(widens)
        }
        PackageType::MultipleGroups => {
            let widens = match base.package_type {
                PackageType::SingleGroup => {
                    !base.group_ids.is_empty()
                        && base.group_ids.is_subset(&other.group_ids)
                        && other.group_ids.len() > 1
                }
                PackageType::MultipleGroups => proper_superset(&base.group_ids, &other.group_ids),
                _ => false,
            };
            widens.then_some(true)
        }
        _ => None,
    }
}

fn heuristic_includes(base: &CoverageDescriptor, other: &CoverageDescriptor) -> bool {
    if other.package_type == PackageType::FullSection {
        // Group-only coverage cannot be checked against sections without a
        // catalog; any section grant is taken as covering it.
        return if base.section_ids.is_empty() {
            !other.section_ids.is_empty()
        } else {
            base.section_ids.is_subset(&other.section_ids)
        };
    }

    (!base.group_ids.is_empty() && base.group_ids.is_subset(&other.group_ids))
        || (!base.section_ids.is_empty() && base.section_ids.is_subset(&other.section_ids))
}

/// `other` holds every element of a non-empty `base` plus at least one more.
fn proper_superset<T: Ord>(base: &BTreeSet<T>, other: &BTreeSet<T>) -> bool {
    !base.is_empty() && base.is_subset(other) && other.len() > base.len()
}

// ── Exact (catalog-backed) ────────────────────────────────────────────────────

/// Every grant of `base` is reachable from `other`.
///
/// A section counts as covered when `other` grants it directly or grants all
/// of its (non-empty) group list. Empty coverage includes nothing.
fn exact_includes(
    catalog: &SectionCatalog,
    base: &CoverageDescriptor,
    other: &CoverageDescriptor,
) -> bool {
    if base.group_ids.is_empty() && base.section_ids.is_empty() {
        return false;
    }

    let reachable = other.effective_groups(catalog);
    let sections_covered = base.section_ids.iter().all(|section| {
        other.section_ids.contains(section)
            || catalog
                .groups_of(*section)
                .is_some_and(|groups| !groups.is_empty() && groups.is_subset(&reachable))
    });

    sections_covered && base.group_ids.is_subset(&reachable)
}
