//! Duration resolution: billing cadence to a day count.
//!
//! Establishes the total order over terms used by the classifier. An
//! explicit duration always wins; otherwise the cadence decides.

use std::fmt;
use std::num::NonZeroU32;

use serde::Serialize;

use crate::plan::PaymentType;

/// Days assumed when neither an explicit duration nor a known cadence applies.
pub const FALLBACK_DURATION_DAYS: u32 = 30;

/// Where a resolved duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// The plan carried an explicit `durationDays`.
    Explicit,
    /// Derived from a recognized cadence.
    Cadence,
    /// A session pack without an explicit duration.
    SessionPackDefault,
    /// A cadence this resolver does not know.
    UnrecognizedFallback,
}

impl DurationSource {
    /// True when the day count is a guess rather than data.
    pub fn is_fallback(self) -> bool {
        matches!(
            self,
            DurationSource::SessionPackDefault | DurationSource::UnrecognizedFallback
        )
    }
}

impl fmt::Display for DurationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationSource::Explicit => write!(f, "explicit"),
            DurationSource::Cadence => write!(f, "cadence"),
            DurationSource::SessionPackDefault => write!(f, "session_pack_default"),
            DurationSource::UnrecognizedFallback => write!(f, "unrecognized_fallback"),
        }
    }
}

/// A resolved duration. `days` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationResolution {
    pub days: u32,
    pub source: DurationSource,
}

/// Resolve a plan's term length, reporting where the number came from.
pub fn resolve_duration(
    payment_type: &PaymentType,
    explicit_days: Option<NonZeroU32>,
) -> DurationResolution {
    if let Some(days) = explicit_days {
        return DurationResolution {
            days: days.get(),
            source: DurationSource::Explicit,
        };
    }

    match payment_type {
        PaymentType::Annual => cadence(365),
        PaymentType::SemiAnnual => cadence(180),
        PaymentType::Monthly => cadence(30),
        PaymentType::SessionPack => {
            tracing::warn!(
                fallback_days = FALLBACK_DURATION_DAYS,
                "session_pack plan has no explicit duration"
            );
            DurationResolution {
                days: FALLBACK_DURATION_DAYS,
                source: DurationSource::SessionPackDefault,
            }
        }
        PaymentType::Other(raw) => {
            tracing::warn!(
                payment_type = %raw,
                fallback_days = FALLBACK_DURATION_DAYS,
                "unrecognized payment type, using fallback duration"
            );
            DurationResolution {
                days: FALLBACK_DURATION_DAYS,
                source: DurationSource::UnrecognizedFallback,
            }
        }
    }
}

/// Day-count projection of [`resolve_duration`].
pub fn resolve_duration_days(payment_type: &PaymentType, explicit_days: Option<NonZeroU32>) -> u32 {
    resolve_duration(payment_type, explicit_days).days
}

fn cadence(days: u32) -> DurationResolution {
    DurationResolution {
        days,
        source: DurationSource::Cadence,
    }
}
