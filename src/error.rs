//! Typed failures surfaced by the scoring core.

use thiserror::Error;

/// Errors reported synchronously to the caller; nothing here is retried.
///
/// A failure is terminal for the record or shipment group it affects and
/// must not take down unrelated groups.
#[derive(Debug, Error)]
pub enum RaterError {
    /// A weather or transport value outside the fixed lookup tables.
    ///
    /// Distinct from an unseen one-hot category, which deliberately encodes
    /// as all zeros (the usual unseen-at-inference convention).
    #[error("unknown {field} category: {value:?}")]
    UnknownCategory { field: &'static str, value: String },

    /// A required raw input field is missing from the source data.
    #[error("input schema missing required field: {0}")]
    SchemaError(String),

    /// Weight triple not normalized, or with a non-positive sum.
    #[error("invalid weight triple: {0}")]
    InvalidWeights(String),

    /// A caller bug reached the selector (e.g. an empty shipment group).
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),
}
