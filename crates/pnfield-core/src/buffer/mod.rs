//! Bounds-checked frame access.
//!
//! Decoders never index frame bytes directly; every read goes through
//! [`ByteBuffer`], which fails with [`BufferBoundsError`] instead of
//! panicking.

pub mod error;
pub mod reader;

pub use error::BufferBoundsError;
pub use reader::ByteBuffer;
