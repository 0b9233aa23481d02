//! Batch classification of a club's tariffs against one membership.

use gymplan_core::PlanInput;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::classify::{ChangeKind, Classification, Classifier};
use crate::error::ClassifyError;

/// One candidate tariff and how it relates to the current membership.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedOffer {
    /// Position in the candidate list.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: Decimal,
    pub classification: Classification,
}

impl ClassifiedOffer {
    fn label(&self) -> String {
        let mut label = format!("#{}", self.index);
        if let Some(id) = self.id {
            label.push_str(&format!(" [id {}]", id));
        }
        if let Some(name) = &self.name {
            label.push(' ');
            label.push_str(name);
        }
        label
    }
}

/// Counts per classification kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfferSummary {
    pub upgrade_count: usize,
    pub buy_another_count: usize,
    pub renew_count: usize,
    pub same_count: usize,
    pub total: usize,
}

impl OfferSummary {
    fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Upgrade => self.upgrade_count += 1,
            ChangeKind::BuyAnother => self.buy_another_count += 1,
            ChangeKind::Renew => self.renew_count += 1,
            ChangeKind::Same => self.same_count += 1,
        }
        self.total += 1;
    }
}

/// All candidates classified against one membership, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct OfferReport {
    pub offers: Vec<ClassifiedOffer>,
    pub summary: OfferSummary,
}

impl OfferReport {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Format as human-readable text, grouped by kind.
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!(
                "{} offer(s): {} upgrade, {} buy another, {} renew",
                self.summary.total,
                self.summary.upgrade_count,
                self.summary.buy_another_count,
                self.summary.renew_count
            ),
            String::new(),
        ];

        for kind in [
            ChangeKind::Upgrade,
            ChangeKind::Renew,
            ChangeKind::BuyAnother,
            ChangeKind::Same,
        ] {
            let section: Vec<String> = self
                .offers
                .iter()
                .filter(|o| o.classification.kind == kind)
                .map(|o| {
                    let mut line = format!(
                        "  {} ({}) - {}",
                        o.label(),
                        o.price,
                        o.classification.reason
                    );
                    if let Some(start) = o.classification.scheduled_start() {
                        line.push_str(&format!(", starts {}", start));
                    }
                    line
                })
                .collect();

            if !section.is_empty() {
                lines.push(format!("{}:", kind));
                lines.extend(section);
                lines.push(String::new());
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    pub fn upgrades(&self) -> impl Iterator<Item = &ClassifiedOffer> {
        self.offers.iter().filter(|o| o.classification.is_upgrade())
    }
}

/// Classify every candidate against `current`.
///
/// An invalid end date fails the whole batch.
pub fn classify_offers(
    classifier: &Classifier<'_>,
    current: &PlanInput,
    candidates: &[PlanInput],
    current_end_date: Option<&str>,
) -> Result<OfferReport, ClassifyError> {
    let mut offers = Vec::with_capacity(candidates.len());
    let mut summary = OfferSummary::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let classification = classifier.classify(current, candidate, current_end_date)?;
        summary.record(classification.kind);
        offers.push(ClassifiedOffer {
            index,
            id: candidate.id,
            name: candidate.name.clone(),
            price: candidate.price,
            classification,
        });
    }

    Ok(OfferReport { offers, summary })
}
