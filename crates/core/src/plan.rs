//! Plan and membership input types.
//!
//! A [`PlanInput`] describes either the member's current membership or a
//! candidate tariff. Both sides carry the same shape: the raw access grants,
//! the package scope tag, and the billing terms.

use std::fmt;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a training group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

/// Identifier of a club section (a set of groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section:{}", self.0)
    }
}

/// What an [`AccessGrant`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    Section,
    Group,
}

/// A single access grant as delivered by the membership backend.
///
/// The list a grant is read from (`includedGroups` or `includedSections`)
/// decides how it is interpreted; `kind` is carried for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<GrantKind>,
}

impl AccessGrant {
    pub fn group(id: u64) -> Self {
        AccessGrant {
            id,
            name: String::new(),
            kind: Some(GrantKind::Group),
        }
    }

    pub fn section(id: u64) -> Self {
        AccessGrant {
            id,
            name: String::new(),
            kind: Some(GrantKind::Section),
        }
    }
}

/// Scope tag describing how a plan's coverage is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    SingleGroup,
    MultipleGroups,
    FullSection,
    FullClub,
}

impl PackageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::SingleGroup => "single_group",
            PackageType::MultipleGroups => "multiple_groups",
            PackageType::FullSection => "full_section",
            PackageType::FullClub => "full_club",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing cadence of a plan.
///
/// Cadences the backend may introduce later are kept verbatim in
/// [`PaymentType::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentType {
    Monthly,
    SemiAnnual,
    Annual,
    SessionPack,
    Other(String),
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Monthly => "monthly",
            PaymentType::SemiAnnual => "semi_annual",
            PaymentType::Annual => "annual",
            PaymentType::SessionPack => "session_pack",
            PaymentType::Other(raw) => raw,
        }
    }

    pub fn is_session_pack(&self) -> bool {
        matches!(self, PaymentType::SessionPack)
    }
}

impl From<String> for PaymentType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "monthly" => PaymentType::Monthly,
            "semi_annual" => PaymentType::SemiAnnual,
            "annual" => PaymentType::Annual,
            "session_pack" => PaymentType::SessionPack,
            _ => PaymentType::Other(raw),
        }
    }
}

impl From<&str> for PaymentType {
    fn from(raw: &str) -> Self {
        PaymentType::from(raw.to_string())
    }
}

impl From<PaymentType> for String {
    fn from(payment_type: PaymentType) -> Self {
        match payment_type {
            PaymentType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A current membership or a candidate plan, as supplied by the caller.
///
/// Field names follow the UI contract (camelCase); the snake_case names used
/// by the REST backend are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Tariff id from the backend, used only in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display label, used only in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "included_groups")]
    pub included_groups: Vec<AccessGrant>,
    #[serde(alias = "included_sections")]
    pub included_sections: Vec<AccessGrant>,
    #[serde(alias = "package_type")]
    pub package_type: PackageType,
    #[serde(alias = "payment_type")]
    pub payment_type: PaymentType,
    #[serde(default, alias = "duration_days")]
    pub duration_days: Option<NonZeroU32>,
    pub price: Decimal,
}

impl PlanInput {
    /// A plan with no grants, no explicit duration and a zero price.
    pub fn new(package_type: PackageType, payment_type: impl Into<PaymentType>) -> Self {
        PlanInput {
            id: None,
            name: None,
            included_groups: Vec::new(),
            included_sections: Vec::new(),
            package_type,
            payment_type: payment_type.into(),
            duration_days: None,
            price: Decimal::ZERO,
        }
    }

    pub fn with_groups(mut self, ids: &[u64]) -> Self {
        self.included_groups = ids.iter().copied().map(AccessGrant::group).collect();
        self
    }

    pub fn with_sections(mut self, ids: &[u64]) -> Self {
        self.included_sections = ids.iter().copied().map(AccessGrant::section).collect();
        self
    }

    /// Sets the explicit duration. Zero clears it.
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = NonZeroU32::new(days);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
