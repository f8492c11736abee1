use thiserror::Error;

/// Raised by [`ByteBuffer`](super::ByteBuffer) when a read would run past the
/// end of the frame.
///
/// # Examples
/// ```
/// use pnfield_core::BufferBoundsError;
///
/// let err = BufferBoundsError { offset: 4, width: 2, len: 5 };
/// assert!(err.to_string().contains("buffer too short"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("buffer too short: read of {width} bytes at offset {offset}, buffer holds {len}")]
pub struct BufferBoundsError {
    pub offset: usize,
    pub width: usize,
    pub len: usize,
}
