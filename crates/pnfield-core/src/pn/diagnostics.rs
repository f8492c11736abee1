//! Region emitters for bytes that are skipped rather than decoded.
//!
//! None of these read through the bounds check: they annotate the requested
//! span as-is and always return `offset + length`.

use tracing::{debug, warn};

use super::layout;
use crate::annotation::{
    Annotation, AnnotationSink, DiagnosticKind, DiagnosticSink, FieldValue,
    Severity,
};
use crate::buffer::ByteBuffer;
use crate::registry::{FieldId, FieldRegistry};

/// Selects the label of [`dissect_user_data_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDataKind {
    /// Payload awaiting fragment reassembly.
    Fragment,
    /// Substitute value data.
    Substitute,
}

fn region(field: FieldId, offset: usize, length: usize, text: String) -> Annotation {
    Annotation::new(
        field,
        offset..offset.saturating_add(length),
        FieldValue::Text(layout::REGION_VALUE.to_string()),
    )
    .with_text(text)
}

/// Mark bytes the caller's model leaves uninterpreted.
///
/// Emits a warning annotation plus an [`DiagnosticKind::UndecodedData`]
/// diagnostic tied to it.
pub fn dissect_undecoded<S: AnnotationSink + DiagnosticSink + ?Sized>(
    _buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
    length: usize,
) -> usize {
    debug!(offset, length, "undecoded region");
    let item = sink.add(
        region(
            registry.common().undecoded,
            offset,
            length,
            format!("Undecoded Data: {length} bytes"),
        )
        .with_severity(Severity::Warning),
    );
    sink.flag(
        item,
        DiagnosticKind::UndecodedData,
        format!("Undecoded Data, {length} bytes"),
    );
    offset.saturating_add(length)
}

/// Mark `[offset, offset + length)` as malformed.
///
/// The annotation covers exactly the flagged span and carries whatever of
/// those bytes the frame holds.
pub fn dissect_malformed<S: AnnotationSink + DiagnosticSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
    length: usize,
) -> usize {
    warn!(offset, length, "malformed region");
    let bytes = buf.clamped_slice(offset, length).to_vec();
    let item = sink.add(
        Annotation::new(
            registry.common().malformed,
            offset..offset.saturating_add(length),
            FieldValue::Bytes(bytes),
        )
        .with_text(format!("Malformed: {length} bytes"))
        .with_severity(Severity::Error),
    );
    sink.flag(
        item,
        DiagnosticKind::Malformed,
        format!("Malformed packet, {length} bytes"),
    );
    offset.saturating_add(length)
}

/// Label `length` bytes of user data with `text`. A zero length emits
/// nothing.
pub fn dissect_user_data<S: AnnotationSink + ?Sized>(
    _buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
    length: usize,
    text: &str,
) -> usize {
    if length != 0 {
        sink.add(region(
            registry.common().user_data,
            offset,
            length,
            format!("{text}: {length} bytes"),
        ));
    }
    offset.saturating_add(length)
}

pub fn dissect_user_data_bytes<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
    length: usize,
    kind: UserDataKind,
) -> usize {
    let field = match kind {
        UserDataKind::Fragment => registry.common().frag_bytes,
        UserDataKind::Substitute => registry.common().user_bytes,
    };
    let bytes = buf.clamped_slice(offset, length).to_vec();
    sink.add(Annotation::new(
        field,
        offset..offset.saturating_add(length),
        FieldValue::Bytes(bytes),
    ));
    offset.saturating_add(length)
}

pub fn dissect_padding<S: AnnotationSink + ?Sized>(
    _buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
    length: usize,
) -> usize {
    debug!(offset, length, "padding");
    sink.add(region(
        registry.common().padding,
        offset,
        length,
        format!("Padding: {length} byte"),
    ));
    offset.saturating_add(length)
}

/// Padding needed to bring `offset` to the next multiple of four.
pub fn align4_padding(offset: usize) -> usize {
    (layout::ALIGNMENT - offset % layout::ALIGNMENT) % layout::ALIGNMENT
}

/// Advance `offset` to a four-byte boundary, annotating the skipped bytes.
///
/// # Examples
/// ```
/// use pnfield_core::{AnnotationTree, ByteBuffer, FieldRegistry, pn};
///
/// let registry = FieldRegistry::new();
/// let mut tree = AnnotationTree::new();
/// let buf = ByteBuffer::new(&[0u8; 8]);
///
/// assert_eq!(pn::dissect_align4(&buf, 5, &mut tree, &registry), 8);
/// assert_eq!(pn::dissect_align4(&buf, 8, &mut tree, &registry), 8);
/// assert_eq!(tree.len(), 1);
/// ```
pub fn dissect_align4<S: AnnotationSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    offset: usize,
    sink: &mut S,
    registry: &FieldRegistry,
) -> usize {
    let padding = align4_padding(offset);
    if padding > 0 {
        return dissect_padding(buf, offset, sink, registry, padding);
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationTree;

    fn fixture() -> (FieldRegistry, AnnotationTree) {
        (FieldRegistry::new(), AnnotationTree::new())
    }

    #[test]
    fn undecoded_emits_warning_and_diagnostic() {
        let (registry, mut tree) = fixture();
        let data = [0u8; 8];
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_undecoded(&buf, 2, &mut tree, &registry, 4), 6);
        let node = &tree.nodes()[0];
        assert_eq!(node.range, 2..6);
        assert_eq!(node.severity, Severity::Warning);
        assert_eq!(tree.render(&registry), vec!["Undecoded Data: 4 bytes"]);
        let diag = &tree.diagnostics()[0];
        assert_eq!(diag.kind, DiagnosticKind::UndecodedData);
        assert_eq!(diag.message, "Undecoded Data, 4 bytes");
    }

    #[test]
    fn undecoded_does_not_validate_length() {
        let (registry, mut tree) = fixture();
        let data = [0u8; 2];
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_undecoded(&buf, 1, &mut tree, &registry, 0), 1);
        assert_eq!(dissect_undecoded(&buf, 1, &mut tree, &registry, 500), 501);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn malformed_spans_the_flagged_bytes() {
        let (registry, mut tree) = fixture();
        let data: Vec<u8> = (0..16).collect();
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_malformed(&buf, 8, &mut tree, &registry, 4), 12);
        let node = &tree.nodes()[0];
        assert_eq!(node.range, 8..12);
        assert_eq!(node.value, FieldValue::Bytes(vec![8, 9, 10, 11]));
        assert_eq!(node.severity, Severity::Error);
        assert_eq!(tree.diagnostics()[0].kind, DiagnosticKind::Malformed);
    }

    #[test]
    fn malformed_past_end_keeps_requested_span() {
        let (registry, mut tree) = fixture();
        let data = [1u8, 2, 3];
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_malformed(&buf, 2, &mut tree, &registry, 4), 6);
        let node = &tree.nodes()[0];
        assert_eq!(node.range, 2..6);
        assert_eq!(node.value, FieldValue::Bytes(vec![3]));
    }

    #[test]
    fn user_data_zero_length_emits_nothing() {
        let (registry, mut tree) = fixture();
        let data = [0u8; 4];
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_user_data(&buf, 3, &mut tree, &registry, 0, "IO Data"), 3);
        assert!(tree.is_empty());

        assert_eq!(dissect_user_data(&buf, 0, &mut tree, &registry, 3, "IO Data"), 3);
        assert_eq!(tree.render(&registry), vec!["IO Data: 3 bytes"]);
    }

    #[test]
    fn user_data_bytes_label_follows_kind() {
        let (registry, mut tree) = fixture();
        let data = [0xaa, 0xbb, 0xcc];
        let buf = ByteBuffer::new(&data);

        assert_eq!(
            dissect_user_data_bytes(&buf, 0, &mut tree, &registry, 2, UserDataKind::Fragment),
            2
        );
        assert_eq!(
            dissect_user_data_bytes(&buf, 2, &mut tree, &registry, 5, UserDataKind::Substitute),
            7
        );
        assert_eq!(
            tree.render(&registry),
            vec!["Fragment Data: aabb", "Substitute Data: cc"]
        );
    }

    #[test]
    fn padding_returns_offset_plus_length() {
        let (registry, mut tree) = fixture();
        let data = [0u8; 4];
        let buf = ByteBuffer::new(&data);

        assert_eq!(dissect_padding(&buf, 1, &mut tree, &registry, 2), 3);
        assert_eq!(tree.render(&registry), vec!["Padding: 2 byte"]);
    }

    #[test]
    fn align4_pads_to_next_boundary() {
        let (registry, mut tree) = fixture();
        let data = [0u8; 16];
        let buf = ByteBuffer::new(&data);

        for (offset, expected, pad) in [(0, 0, 0), (1, 4, 3), (2, 4, 2), (3, 4, 1), (12, 12, 0)] {
            let before = tree.len();
            assert_eq!(dissect_align4(&buf, offset, &mut tree, &registry), expected);
            if pad == 0 {
                assert_eq!(tree.len(), before);
            } else {
                assert_eq!(tree.nodes()[before].len(), pad);
            }
        }
    }
}
