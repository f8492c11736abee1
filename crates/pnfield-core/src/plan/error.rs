use thiserror::Error;

/// Errors returned while parsing a decode plan.
///
/// # Examples
/// ```
/// use pnfield_core::{DecodePlan, FieldRegistry, PlanError};
///
/// let mut registry = FieldRegistry::new();
/// let err = DecodePlan::parse("u16,word", &mut registry).unwrap_err();
/// assert!(matches!(err, PlanError::UnknownShape { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("decode plan is empty")]
    Empty,
    #[error("unknown shape '{shape}' in item {index}")]
    UnknownShape { index: usize, shape: String },
    #[error("shape '{shape}' in item {index} needs a byte length (e.g. {shape}:4)")]
    MissingLength { index: usize, shape: String },
    #[error("invalid length '{value}' in item {index}")]
    InvalidLength { index: usize, value: String },
    #[error("shape '{shape}' in item {index} does not take a length")]
    UnexpectedLength { index: usize, shape: String },
    #[error("empty label in item {index}")]
    EmptyLabel { index: usize },
    #[error("'rest' must be the last item (found at item {index})")]
    RestNotLast { index: usize },
}
