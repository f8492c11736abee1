//! Text helpers for companion description (GSDML/XML) files.

pub mod comment;
pub mod layout;

pub use comment::{CommentStrippingReader, Lines};
