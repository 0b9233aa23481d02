//! Membership change classification.
//!
//! Given the member's current membership and a candidate plan, decide whether
//! buying the candidate is an upgrade, a parallel purchase, or a renewal.
//! Rules form an ordered decision list; the first rule that applies wins.

use std::fmt;

use gymplan_core::{
    resolve_duration, CoverageComparator, CoverageDescriptor, DurationResolution, PlanInput,
    SectionCatalog,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ClassifyError;
use crate::schedule;

/// Outcome of comparing a candidate plan against the current membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// Broader access or a longer term; replaces the current membership.
    Upgrade,
    /// Parallel or downgraded purchase that takes effect independently.
    BuyAnother,
    /// Same coverage and term.
    Renew,
    /// No-op. Reserved for callers; no rule produces it.
    Same,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Upgrade => write!(f, "UPGRADE"),
            ChangeKind::BuyAnother => write!(f, "BUY_ANOTHER"),
            ChangeKind::Renew => write!(f, "RENEW"),
            ChangeKind::Same => write!(f, "SAME"),
        }
    }
}

/// The decision-list rule that produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CoverageSuperset,
    CoverageNotIncluded,
    LongerDuration,
    SameTerms,
    ShorterDuration,
    OverlappingCoverage,
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleId::CoverageSuperset => "coverage_superset",
            RuleId::CoverageNotIncluded => "coverage_not_included",
            RuleId::LongerDuration => "longer_duration",
            RuleId::SameTerms => "same_terms",
            RuleId::ShorterDuration => "shorter_duration",
            RuleId::OverlappingCoverage => "overlapping_coverage",
        };
        f.write_str(name)
    }
}

/// Classification of one candidate plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub kind: ChangeKind,
    pub rule: RuleId,
    pub reason: String,
    /// Day after the current membership ends. Only set for upgrades, and only
    /// when the end date is known.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "schedule::serialize_optional_date"
    )]
    pub scheduled_start_date: Option<Date>,
}

impl Classification {
    /// `scheduledStartDate` as `YYYY-MM-DD`.
    pub fn scheduled_start(&self) -> Option<String> {
        self.scheduled_start_date.map(schedule::format_date)
    }

    pub fn is_upgrade(&self) -> bool {
        self.kind == ChangeKind::Upgrade
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.kind, self.rule, self.reason)?;
        if let Some(start) = self.scheduled_start() {
            write!(f, " (starts {})", start)?;
        }
        Ok(())
    }
}

/// Everything the rules look at, computed once per call.
struct RuleContext<'p> {
    current: &'p PlanInput,
    candidate: &'p PlanInput,
    strict_superset: bool,
    includes: bool,
    /// Resolved (current, candidate) durations. Present only when the two
    /// coverages are equal; durations are never consulted otherwise.
    durations: Option<(DurationResolution, DurationResolution)>,
}

struct Verdict {
    kind: ChangeKind,
    reason: String,
}

type RuleFn = fn(&RuleContext<'_>) -> Option<Verdict>;

/// The decision list, in evaluation order. When no rule applies the
/// coverages overlap without being equal, see [`overlapping_coverage`].
const RULES: &[(RuleId, RuleFn)] = &[
    (RuleId::CoverageSuperset, coverage_superset),
    (RuleId::CoverageNotIncluded, coverage_not_included),
    (RuleId::LongerDuration, longer_duration),
    (RuleId::SameTerms, same_terms),
    (RuleId::ShorterDuration, shorter_duration),
];

fn coverage_superset(ctx: &RuleContext<'_>) -> Option<Verdict> {
    ctx.strict_superset.then(|| Verdict {
        kind: ChangeKind::Upgrade,
        reason: format!(
            "{} coverage is strictly broader than {}",
            ctx.candidate.package_type, ctx.current.package_type
        ),
    })
}

fn coverage_not_included(ctx: &RuleContext<'_>) -> Option<Verdict> {
    (!ctx.includes).then(|| Verdict {
        kind: ChangeKind::BuyAnother,
        reason: format!(
            "{} does not include the current {} coverage",
            ctx.candidate.package_type, ctx.current.package_type
        ),
    })
}

fn longer_duration(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let (current, candidate) = ctx.durations?;
    if candidate.days <= current.days {
        return None;
    }

    let from_pack = ctx.current.payment_type.is_session_pack();
    let to_pack = ctx.candidate.payment_type.is_session_pack();
    let switch = match (from_pack, to_pack) {
        (false, true) => "subscription to session pack with longer validity",
        (true, false) => "session pack to subscription with longer duration",
        _ => "same coverage, longer duration",
    };
    Some(Verdict {
        kind: ChangeKind::Upgrade,
        reason: format!("{} ({} > {} days)", switch, candidate.days, current.days),
    })
}

fn same_terms(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let (current, candidate) = ctx.durations?;
    (candidate.days == current.days).then(|| Verdict {
        kind: ChangeKind::Renew,
        reason: format!("same coverage and duration ({} days)", current.days),
    })
}

fn shorter_duration(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let (current, candidate) = ctx.durations?;
    (candidate.days < current.days).then(|| Verdict {
        kind: ChangeKind::BuyAnother,
        reason: format!(
            "same coverage but shorter duration ({} < {} days), not an upgrade",
            candidate.days, current.days
        ),
    })
}

fn overlapping_coverage(ctx: &RuleContext<'_>) -> Verdict {
    Verdict {
        kind: ChangeKind::BuyAnother,
        reason: format!(
            "{} overlaps the current {} coverage but differs from it",
            ctx.candidate.package_type, ctx.current.package_type
        ),
    }
}

/// Classifier over an optional section catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier<'a> {
    comparator: CoverageComparator<'a>,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: Option<&'a SectionCatalog>) -> Self {
        Classifier {
            comparator: CoverageComparator::new(catalog),
        }
    }

    /// Classify `candidate` against `current`.
    ///
    /// `current_end_date` (`YYYY-MM-DD`) is validated whenever it is given,
    /// whatever the outcome. An upgrade carries the day after it as its
    /// start date.
    pub fn classify(
        &self,
        current: &PlanInput,
        candidate: &PlanInput,
        current_end_date: Option<&str>,
    ) -> Result<Classification, ClassifyError> {
        let start_after_current = current_end_date.map(schedule::start_after).transpose()?;

        let current_cov = CoverageDescriptor::of(current);
        let candidate_cov = CoverageDescriptor::of(candidate);

        let durations = self
            .comparator
            .are_equal(&current_cov, &candidate_cov)
            .then(|| {
                (
                    resolve_duration(&current.payment_type, current.duration_days),
                    resolve_duration(&candidate.payment_type, candidate.duration_days),
                )
            });

        let ctx = RuleContext {
            current,
            candidate,
            strict_superset: self.comparator.is_strict_superset(&current_cov, &candidate_cov),
            includes: self.comparator.includes_coverage(&current_cov, &candidate_cov),
            durations,
        };

        let (rule, verdict) = RULES
            .iter()
            .find_map(|(id, apply)| apply(&ctx).map(|verdict| (*id, verdict)))
            .unwrap_or_else(|| (RuleId::OverlappingCoverage, overlapping_coverage(&ctx)));

        let scheduled_start_date = match verdict.kind {
            ChangeKind::Upgrade => start_after_current,
            _ => None,
        };

        tracing::debug!(
            %rule,
            kind = %verdict.kind,
            current = %current.package_type,
            candidate = %candidate.package_type,
            "classified membership change"
        );

        Ok(Classification {
            kind: verdict.kind,
            rule,
            reason: verdict.reason,
            scheduled_start_date,
        })
    }
}

/// Classify without a section catalog.
pub fn classify(
    current: &PlanInput,
    candidate: &PlanInput,
    current_end_date: Option<&str>,
) -> Result<Classification, ClassifyError> {
    Classifier::default().classify(current, candidate, current_end_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymplan_core::{CatalogSection, GroupId, PackageType, SectionId};

    fn single(group: u64, payment: &str) -> PlanInput {
        PlanInput::new(PackageType::SingleGroup, payment).with_groups(&[group])
    }

    #[test]
    fn coverage_rules_precede_duration_rules() {
        let order: Vec<RuleId> = RULES.iter().map(|r| r.0).collect();
        assert_eq!(
            order,
            vec![
                RuleId::CoverageSuperset,
                RuleId::CoverageNotIncluded,
                RuleId::LongerDuration,
                RuleId::SameTerms,
                RuleId::ShorterDuration,
            ]
        );
    }

    #[test]
    fn wider_group_set_is_upgrade() {
        let current = single(1, "monthly");
        let candidate = PlanInput::new(PackageType::MultipleGroups, "monthly").with_groups(&[1, 2]);

        let result = classify(&current, &candidate, Some("2025-12-31")).unwrap();

        assert_eq!(result.kind, ChangeKind::Upgrade);
        assert_eq!(result.rule, RuleId::CoverageSuperset);
        assert_eq!(result.scheduled_start().as_deref(), Some("2026-01-01"));
    }

    #[test]
    fn upgrade_without_end_date_has_no_start() {
        let current = single(1, "monthly");
        let candidate = PlanInput::new(PackageType::FullClub, "monthly");

        let result = classify(&current, &candidate, None).unwrap();

        assert_eq!(result.kind, ChangeKind::Upgrade);
        assert_eq!(result.scheduled_start_date, None);
    }

    #[test]
    fn disjoint_group_is_buy_another() {
        let result = classify(&single(1, "monthly"), &single(2, "monthly"), Some("2025-12-31"))
            .unwrap();
        assert_eq!(result.kind, ChangeKind::BuyAnother);
        assert_eq!(result.rule, RuleId::CoverageNotIncluded);
        assert_eq!(result.scheduled_start_date, None);
    }

    #[test]
    fn identical_plan_renews() {
        let plan = single(1, "monthly");
        let result = classify(&plan, &plan, Some("2025-12-31")).unwrap();
        assert_eq!(result.kind, ChangeKind::Renew);
        assert_eq!(result.rule, RuleId::SameTerms);
        assert_eq!(result.scheduled_start_date, None);
    }

    #[test]
    fn plan_without_grants_renews_against_itself() {
        let plan = PlanInput::new(PackageType::MultipleGroups, "monthly");
        let result = classify(&plan, &plan, Some("2025-12-31")).unwrap();
        assert_eq!(result.kind, ChangeKind::Renew);
        assert_eq!(result.rule, RuleId::SameTerms);
    }

    #[test]
    fn longer_term_same_coverage_is_upgrade() {
        let result = classify(&single(1, "monthly"), &single(1, "annual"), Some("2025-06-30"))
            .unwrap();
        assert_eq!(result.kind, ChangeKind::Upgrade);
        assert_eq!(result.rule, RuleId::LongerDuration);
        assert!(result.reason.contains("365 > 30"));
        assert_eq!(result.scheduled_start().as_deref(), Some("2025-07-01"));
    }

    #[test]
    fn shorter_term_same_coverage_is_buy_another() {
        let result = classify(&single(1, "annual"), &single(1, "monthly"), None).unwrap();
        assert_eq!(result.kind, ChangeKind::BuyAnother);
        assert_eq!(result.rule, RuleId::ShorterDuration);
    }

    #[test]
    fn session_pack_switches_name_the_direction() {
        let pack = single(1, "session_pack").with_duration_days(90);
        let monthly = single(1, "monthly");

        let to_pack = classify(&monthly, &pack, None).unwrap();
        assert_eq!(to_pack.kind, ChangeKind::Upgrade);
        assert!(to_pack.reason.starts_with("subscription to session pack"));

        let long_pack = single(1, "session_pack").with_duration_days(10);
        let to_subscription = classify(&long_pack, &monthly, None).unwrap();
        assert_eq!(to_subscription.kind, ChangeKind::Upgrade);
        assert!(to_subscription.reason.starts_with("session pack to subscription"));
    }

    #[test]
    fn overlapping_coverage_falls_through_to_buy_another() {
        let current = single(1, "monthly");
        let candidate = PlanInput::new(PackageType::FullSection, "monthly").with_sections(&[10]);

        let result = classify(&current, &candidate, Some("2025-12-31")).unwrap();

        assert_eq!(result.kind, ChangeKind::BuyAnother);
        assert_eq!(result.rule, RuleId::OverlappingCoverage);
    }

    #[test]
    fn catalog_turns_overlap_into_upgrade() {
        let catalog = SectionCatalog::from_sections([CatalogSection {
            id: SectionId(10),
            name: None,
            groups: [GroupId(1), GroupId(2)].into_iter().collect(),
        }])
        .unwrap();
        let current = single(1, "monthly");
        let candidate = PlanInput::new(PackageType::FullSection, "monthly").with_sections(&[10]);

        let result = Classifier::new(Some(&catalog))
            .classify(&current, &candidate, Some("2025-12-31"))
            .unwrap();

        assert_eq!(result.kind, ChangeKind::Upgrade);
        assert_eq!(result.scheduled_start().as_deref(), Some("2026-01-01"));
    }

    #[test]
    fn malformed_end_date_is_reported() {
        let err = classify(&single(1, "monthly"), &single(2, "monthly"), Some("31/12/2025"))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::DateParse { .. }));
        assert!(err.to_string().contains("31/12/2025"));
    }

    #[test]
    fn serializes_with_ui_field_names() {
        let result = classify(
            &single(1, "monthly"),
            &PlanInput::new(PackageType::FullClub, "monthly"),
            Some("2025-12-31"),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["kind"], "UPGRADE");
        assert_eq!(json["rule"], "coverage_superset");
        assert_eq!(json["scheduledStartDate"], "2026-01-01");

        let renew = classify(&single(1, "monthly"), &single(1, "monthly"), None).unwrap();
        let json = serde_json::to_value(&renew).unwrap();
        assert!(json.get("scheduledStartDate").is_none());
    }

    #[test]
    fn display_includes_start_for_upgrades() {
        let result = classify(&single(1, "monthly"), &single(1, "annual"), Some("2025-12-31"))
            .unwrap();
        let text = result.to_string();
        assert!(text.starts_with("UPGRADE [longer_duration]"));
        assert!(text.ends_with("(starts 2026-01-01)"));
    }
}
