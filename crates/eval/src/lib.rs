//! Membership change classifier.
//!
//! Takes the member's current membership and a candidate plan, and decides
//! whether the purchase is an UPGRADE, a parallel purchase (BUY_ANOTHER) or a
//! RENEW. Upgrades are scheduled to start the day after the current
//! membership ends.
//!
//! The classifier is pure: no I/O, no shared state. It is safe to call from
//! any number of threads.

pub mod classify;
pub mod error;
pub mod offers;
pub mod schedule;

pub use classify::{classify, ChangeKind, Classification, Classifier, RuleId};
pub use error::ClassifyError;
pub use offers::{classify_offers, ClassifiedOffer, OfferReport, OfferSummary};
