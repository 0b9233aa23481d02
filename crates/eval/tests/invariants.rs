//! Classifier invariants checked over every pair drawn from a small universe
//! of plans, with and without a section catalog.

use gymplan_core::{
    CatalogSection, CoverageComparator, CoverageDescriptor, GroupId, PackageType, PlanInput,
    SectionCatalog, SectionId,
};
use gymplan_eval::{ChangeKind, Classifier};

const END_DATE: &str = "2025-12-31";
const NEXT_DAY: &str = "2026-01-01";

fn catalog() -> SectionCatalog {
    SectionCatalog::from_sections([
        CatalogSection {
            id: SectionId(10),
            name: Some("Martial arts".to_string()),
            groups: [GroupId(1), GroupId(2)].into_iter().collect(),
        },
        CatalogSection {
            id: SectionId(11),
            name: Some("Swimming".to_string()),
            groups: [GroupId(3)].into_iter().collect(),
        },
    ])
    .unwrap()
}

fn coverages() -> Vec<PlanInput> {
    let mut plans = Vec::new();
    for groups in [&[1][..], &[2], &[3]] {
        for sections in [&[][..], &[10]] {
            plans.push(
                PlanInput::new(PackageType::SingleGroup, "monthly")
                    .with_groups(groups)
                    .with_sections(sections),
            );
        }
    }
    for groups in [&[1, 2][..], &[1, 2, 3], &[2, 3]] {
        plans.push(PlanInput::new(PackageType::MultipleGroups, "monthly").with_groups(groups));
    }
    for sections in [&[10][..], &[11], &[10, 11]] {
        plans.push(PlanInput::new(PackageType::FullSection, "monthly").with_sections(sections));
    }
    plans.push(PlanInput::new(PackageType::FullClub, "monthly"));
    plans
}

fn with_terms(plan: &PlanInput, payment: &str, days: u32) -> PlanInput {
    let mut plan = plan.clone();
    plan.payment_type = payment.into();
    plan.with_duration_days(days)
}

fn universe() -> Vec<PlanInput> {
    let mut plans = Vec::new();
    for plan in coverages() {
        plans.push(with_terms(&plan, "monthly", 0));
        plans.push(with_terms(&plan, "semi_annual", 0));
        plans.push(with_terms(&plan, "annual", 0));
        plans.push(with_terms(&plan, "session_pack", 60));
    }
    plans
}

fn check_pairs(classifier: &Classifier<'_>, comparator: &CoverageComparator<'_>) {
    let plans = universe();
    for current in &plans {
        for candidate in &plans {
            let result = classifier
                .classify(current, candidate, Some(END_DATE))
                .unwrap_or_else(|e| panic!("classification failed: {}", e));

            assert_ne!(result.kind, ChangeKind::Same);

            if result.kind == ChangeKind::Upgrade {
                assert_eq!(result.scheduled_start().as_deref(), Some(NEXT_DAY));
                assert!(
                    comparator.includes_coverage(
                        &CoverageDescriptor::of(current),
                        &CoverageDescriptor::of(candidate)
                    ),
                    "upgrade shrinks coverage: {:?} -> {:?}",
                    current,
                    candidate
                );
            } else {
                assert_eq!(result.scheduled_start_date, None);
            }

            if candidate.package_type == PackageType::FullClub
                && current.package_type != PackageType::FullClub
            {
                assert_eq!(result.kind, ChangeKind::Upgrade);
            }

            let again = classifier
                .classify(current, candidate, Some(END_DATE))
                .unwrap();
            assert_eq!(result, again);
        }
    }
}

#[test]
fn heuristic_invariants_hold_for_all_pairs() {
    check_pairs(&Classifier::default(), &CoverageComparator::heuristic());
}

#[test]
fn catalog_invariants_hold_for_all_pairs() {
    let catalog = catalog();
    check_pairs(
        &Classifier::new(Some(&catalog)),
        &CoverageComparator::with_catalog(&catalog),
    );
}

#[test]
fn every_plan_renews_against_itself() {
    let catalog = catalog();
    let mut plans = universe();
    plans.push(PlanInput::new(PackageType::MultipleGroups, "monthly"));
    plans.push(PlanInput::new(PackageType::FullSection, "monthly").with_groups(&[1]));
    plans.push(PlanInput::new(PackageType::SingleGroup, "session_pack").with_sections(&[10]));
    for classifier in [Classifier::default(), Classifier::new(Some(&catalog))] {
        for plan in &plans {
            let result = classifier.classify(plan, plan, Some(END_DATE)).unwrap();
            assert_eq!(result.kind, ChangeKind::Renew, "{:?}", plan);
        }
    }
}

#[test]
fn shorter_term_on_same_coverage_is_never_renew_or_upgrade() {
    for plan in coverages() {
        let annual = with_terms(&plan, "annual", 0);
        for shorter in [
            with_terms(&plan, "monthly", 0),
            with_terms(&plan, "semi_annual", 0),
            with_terms(&plan, "session_pack", 364),
        ] {
            let result = Classifier::default()
                .classify(&annual, &shorter, Some(END_DATE))
                .unwrap();
            assert_eq!(result.kind, ChangeKind::BuyAnother, "{:?}", shorter);
        }
    }
}
