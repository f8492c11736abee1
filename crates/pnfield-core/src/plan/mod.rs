//! Caller-supplied decode plans.
//!
//! A plan is an ordered list of generic shapes (scalars, addresses,
//! identifiers and skipped regions) applied to a frame from offset zero. It
//! carries no protocol knowledge; labels come from the caller.

pub mod error;
pub mod parser;

pub use error::PlanError;
pub use parser::{DecodePlan, Scalar, Shape, Step};
