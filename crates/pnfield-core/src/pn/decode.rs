//! Cursor decoders.
//!
//! Each decoder reads one fixed-width, big-endian field at `offset`, emits a
//! single annotation covering exactly the bytes read and returns the decoded
//! value together with the advanced offset. Over-reads surface as
//! [`BufferBoundsError`] from the buffer and nothing is annotated.

use std::net::Ipv4Addr;

use uuid::Uuid;

use super::layout;
use super::uuid::{DataRepresentation, UuidDecoder};
use crate::annotation::{Annotation, AnnotationHandle, AnnotationSink, FieldValue};
use crate::buffer::{BufferBoundsError, ByteBuffer};
use crate::registry::FieldId;

fn emit<S: AnnotationSink + ?Sized>(
    sink: &mut S,
    field: FieldId,
    offset: usize,
    width: usize,
    value: FieldValue,
) -> AnnotationHandle {
    sink.add(Annotation::new(field, offset..offset + width, value))
}

/// Decode an unsigned 8-bit field.
///
/// # Examples
/// ```
/// use pnfield_core::{AnnotationTree, ByteBuffer, FieldKind, FieldRegistry, pn};
///
/// let mut registry = FieldRegistry::new();
/// let field = registry.register("Version", "pn.version", FieldKind::Uint8);
/// let mut tree = AnnotationTree::new();
/// let buf = ByteBuffer::new(&[0x07, 0x01]);
///
/// let (offset, value) = pn::dissect_u8(&buf, 1, &mut tree, field)?;
/// assert_eq!((offset, value), (2, 1));
/// assert_eq!(tree.nodes()[0].range, 1..2);
/// # Ok::<(), pnfield_core::BufferBoundsError>(())
/// ```
pub fn dissect_u8<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, u8), BufferBoundsError> {
    let value = buf.read_u8(offset)?;
    emit(sink, field, offset, layout::U8_WIDTH, FieldValue::Uint(value.into()));
    Ok((offset + layout::U8_WIDTH, value))
}

/// Decode an unsigned 16-bit field and also return its annotation handle.
pub fn dissect_u16_ret_item<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, u16, AnnotationHandle), BufferBoundsError> {
    let value = buf.read_u16_be(offset)?;
    let item = emit(sink, field, offset, layout::U16_WIDTH, FieldValue::Uint(value.into()));
    Ok((offset + layout::U16_WIDTH, value, item))
}

pub fn dissect_u16<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, u16), BufferBoundsError> {
    dissect_u16_ret_item(buf, offset, sink, field).map(|(offset, value, _)| (offset, value))
}

pub fn dissect_u32<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, u32), BufferBoundsError> {
    let value = buf.read_u32_be(offset)?;
    emit(sink, field, offset, layout::U32_WIDTH, FieldValue::Uint(value));
    Ok((offset + layout::U32_WIDTH, value))
}

pub fn dissect_i16<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, i16), BufferBoundsError> {
    let value = buf.read_i16_be(offset)?;
    emit(sink, field, offset, layout::U16_WIDTH, FieldValue::Int(value.into()));
    Ok((offset + layout::U16_WIDTH, value))
}

pub fn dissect_i32<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, i32), BufferBoundsError> {
    let value = buf.read_i32_be(offset)?;
    emit(sink, field, offset, layout::U32_WIDTH, FieldValue::Int(value));
    Ok((offset + layout::U32_WIDTH, value))
}

/// Decode a 24-bit organizationally unique identifier.
pub fn dissect_oui<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, u32), BufferBoundsError> {
    let value = buf.read_u24_be(offset)?;
    emit(sink, field, offset, layout::OUI_WIDTH, FieldValue::Oui(value));
    Ok((offset + layout::OUI_WIDTH, value))
}

pub fn dissect_mac<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, [u8; 6]), BufferBoundsError> {
    let value: [u8; 6] = buf.read_array(offset)?;
    emit(sink, field, offset, layout::MAC_WIDTH, FieldValue::Mac(value));
    Ok((offset + layout::MAC_WIDTH, value))
}

pub fn dissect_ipv4<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
) -> Result<(usize, Ipv4Addr), BufferBoundsError> {
    let value = buf.read_ipv4(offset)?;
    emit(sink, field, offset, layout::IPV4_WIDTH, FieldValue::Ipv4(value));
    Ok((offset + layout::IPV4_WIDTH, value))
}

/// Decode a 16-byte identifier through `decoder`, always with the fixed
/// PROFINET data representation.
pub fn dissect_uuid<S: AnnotationSink + ?Sized, D: UuidDecoder + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    field: FieldId,
    decoder: &D,
) -> Result<(usize, Uuid), BufferBoundsError> {
    let value = decoder.decode(buf, offset, DataRepresentation::PROFINET)?;
    emit(sink, field, offset, layout::UUID_WIDTH, FieldValue::Uuid(value));
    Ok((offset + layout::UUID_WIDTH, value))
}
