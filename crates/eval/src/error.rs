/// Errors raised by the classifier.
///
/// Classification itself is total; only the membership end date supplied by
/// the caller can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// `currentEndDate` is not a `YYYY-MM-DD` calendar date.
    #[error("invalid membership end date '{input}': {source}")]
    DateParse {
        input: String,
        #[source]
        source: time::error::Parse,
    },

    /// The day after `currentEndDate` is not representable.
    #[error("membership end date '{input}' has no following day")]
    DateOutOfRange { input: String },
}
