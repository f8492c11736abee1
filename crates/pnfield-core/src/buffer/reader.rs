use std::net::Ipv4Addr;

use super::error::BufferBoundsError;

/// Bounds-checked, read-only view over one frame.
///
/// Every read names its offset explicitly; the buffer never tracks a cursor.
#[derive(Debug, Clone, Copy)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes left after `offset`, or zero when `offset` is past the end.
    pub fn remaining(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }

    pub fn read_slice(&self, offset: usize, width: usize) -> Result<&'a [u8], BufferBoundsError> {
        let err = BufferBoundsError {
            offset,
            width,
            len: self.data.len(),
        };
        let end = offset.checked_add(width).ok_or(err)?;
        self.data.get(offset..end).ok_or(err)
    }

    /// Like [`read_slice`](Self::read_slice) but clamps the range to the
    /// buffer instead of failing.
    pub fn clamped_slice(&self, offset: usize, width: usize) -> &'a [u8] {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(width).min(self.data.len());
        &self.data[start..end]
    }

    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], BufferBoundsError> {
        let bytes = self.read_slice(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, BufferBoundsError> {
        let [b] = self.read_array::<1>(offset)?;
        Ok(b)
    }

    pub fn read_u16_be(&self, offset: usize) -> Result<u16, BufferBoundsError> {
        self.read_array(offset).map(u16::from_be_bytes)
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, BufferBoundsError> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    pub fn read_u24_be(&self, offset: usize) -> Result<u32, BufferBoundsError> {
        let [a, b, c] = self.read_array::<3>(offset)?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn read_u32_be(&self, offset: usize) -> Result<u32, BufferBoundsError> {
        self.read_array(offset).map(u32::from_be_bytes)
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, BufferBoundsError> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    pub fn read_i16_be(&self, offset: usize) -> Result<i16, BufferBoundsError> {
        self.read_array(offset).map(i16::from_be_bytes)
    }

    pub fn read_i32_be(&self, offset: usize) -> Result<i32, BufferBoundsError> {
        self.read_array(offset).map(i32::from_be_bytes)
    }

    pub fn read_ipv4(&self, offset: usize) -> Result<Ipv4Addr, BufferBoundsError> {
        self.read_array::<4>(offset).map(Ipv4Addr::from)
    }
}
