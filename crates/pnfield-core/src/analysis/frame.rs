use tracing::warn;

use crate::annotation::{AnnotationHandle, AnnotationSink, AnnotationTree, DiagnosticSink};
use crate::buffer::{BufferBoundsError, ByteBuffer};
use crate::pn::{self, DceRpcUuidDecoder, UserDataKind};
use crate::plan::{DecodePlan, Scalar, Shape};
use crate::registry::FieldRegistry;
use crate::{AnnotationRecord, DiagnosticRecord, FrameReport};

/// Apply `plan` to `buf` from offset zero, emitting into `sink`.
///
/// Returns the final offset. A bounds error stops the walk; annotations
/// emitted before it stay in the sink.
pub fn apply_plan<S: AnnotationSink + DiagnosticSink + ?Sized>(
    buf: &ByteBuffer<'_>,
    plan: &DecodePlan,
    registry: &FieldRegistry,
    sink: &mut S,
) -> Result<usize, BufferBoundsError> {
    let uuid = DceRpcUuidDecoder;
    let mut offset = 0usize;
    for step in plan.steps() {
        offset = match step.shape {
            Shape::Field { scalar, field } => match scalar {
                Scalar::U8 => pn::dissect_u8(buf, offset, sink, field)?.0,
                Scalar::U16 => pn::dissect_u16(buf, offset, sink, field)?.0,
                Scalar::U32 => pn::dissect_u32(buf, offset, sink, field)?.0,
                Scalar::I16 => pn::dissect_i16(buf, offset, sink, field)?.0,
                Scalar::I32 => pn::dissect_i32(buf, offset, sink, field)?.0,
                Scalar::Oui => pn::dissect_oui(buf, offset, sink, field)?.0,
                Scalar::Mac => pn::dissect_mac(buf, offset, sink, field)?.0,
                Scalar::Ipv4 => pn::dissect_ipv4(buf, offset, sink, field)?.0,
                Scalar::Uuid => pn::dissect_uuid(buf, offset, sink, field, &uuid)?.0,
            },
            Shape::Padding(length) => pn::dissect_padding(buf, offset, sink, registry, length),
            Shape::Align4 => pn::dissect_align4(buf, offset, sink, registry),
            Shape::UserData(length) => {
                pn::dissect_user_data(buf, offset, sink, registry, length, &step.label)
            }
            Shape::Bytes(length) => pn::dissect_user_data_bytes(
                buf,
                offset,
                sink,
                registry,
                length,
                UserDataKind::Substitute,
            ),
            Shape::Fragment(length) => pn::dissect_user_data_bytes(
                buf,
                offset,
                sink,
                registry,
                length,
                UserDataKind::Fragment,
            ),
            Shape::Undecoded(length) => pn::dissect_undecoded(buf, offset, sink, registry, length),
            Shape::Malformed(length) => pn::dissect_malformed(buf, offset, sink, registry, length),
            Shape::Rest => {
                let remaining = buf.remaining(offset);
                if remaining == 0 {
                    offset
                } else {
                    pn::dissect_undecoded(buf, offset, sink, registry, remaining)
                }
            }
        };
    }
    Ok(offset)
}

/// Decode one frame payload into a report.
///
/// # Examples
/// ```
/// use pnfield_core::{DecodePlan, FieldRegistry, decode_frame};
///
/// let mut registry = FieldRegistry::new();
/// let plan = DecodePlan::parse("frame_id=u16,rest", &mut registry)?;
/// let report = decode_frame(&[0x80, 0x00, 0xaa], &plan, &registry);
/// assert_eq!(report.annotations[0].label, "frame_id: 32768");
/// assert_eq!(report.annotations[1].label, "Undecoded Data: 1 bytes");
/// assert!(report.error.is_none());
/// # Ok::<(), pnfield_core::PlanError>(())
/// ```
pub fn decode_frame(data: &[u8], plan: &DecodePlan, registry: &FieldRegistry) -> FrameReport {
    let buf = ByteBuffer::new(data);
    let mut tree = AnnotationTree::new();
    let outcome = apply_plan(&buf, plan, registry, &mut tree);

    let (consumed, error) = match outcome {
        Ok(offset) => (offset, None),
        Err(err) => {
            warn!(error = %err, "frame decoding aborted");
            (err.offset, Some(err.to_string()))
        }
    };

    FrameReport {
        index: 0,
        timestamp: None,
        source: None,
        bytes: data.len(),
        consumed,
        annotations: annotation_records(&tree, registry),
        diagnostics: diagnostic_records(&tree),
        error,
    }
}

pub(crate) fn annotation_records(
    tree: &AnnotationTree,
    registry: &FieldRegistry,
) -> Vec<AnnotationRecord> {
    tree.nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| AnnotationRecord {
            field: registry
                .info(node.field)
                .map(|info| info.abbrev.clone())
                .unwrap_or_default(),
            label: tree
                .label(registry, AnnotationHandle(idx))
                .unwrap_or_default(),
            start: node.range.start,
            end: node.range.end,
            value: node.value.to_string(),
            severity: node.severity,
        })
        .collect()
}

pub(crate) fn diagnostic_records(tree: &AnnotationTree) -> Vec<DiagnosticRecord> {
    tree.diagnostics()
        .iter()
        .map(|diag| DiagnosticRecord {
            annotation: diag.item.0,
            kind: diag.kind,
            abbrev: diag.kind.abbrev().to_string(),
            severity: diag.severity,
            message: diag.message.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{apply_plan, decode_frame};
    use crate::annotation::{AnnotationTree, DiagnosticKind, Severity};
    use crate::buffer::ByteBuffer;
    use crate::plan::DecodePlan;
    use crate::registry::FieldRegistry;

    #[test]
    fn plan_walks_the_whole_frame() {
        let mut registry = FieldRegistry::new();
        let plan = DecodePlan::parse("id=u16,u8,align4,station=mac,rest", &mut registry).unwrap();
        let data = [
            0x80, 0x01, 0x07, 0x00, 0x00, 0x0e, 0x8c, 0x01, 0x02, 0x03, 0xde, 0xad,
        ];
        let report = decode_frame(&data, &plan, &registry);

        let labels: Vec<&str> = report.annotations.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "id: 32769",
                "u8: 7",
                "Padding: 1 byte",
                "station: 00:0e:8c:01:02:03",
                "Undecoded Data: 2 bytes",
            ]
        );
        assert_eq!(report.consumed, data.len());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UndecodedData);
        assert_eq!(report.diagnostics[0].annotation, 4);
        assert_eq!(report.diagnostics[0].abbrev, "pn.undecoded_data");
    }

    #[test]
    fn every_scalar_step_emits_its_field() {
        let mut registry = FieldRegistry::new();
        let plan = DecodePlan::parse("u8,u16,u32,i16,i32,oui,mac,ipv4,uuid", &mut registry)
            .unwrap();
        let data = [0u8; 42];
        let report = decode_frame(&data, &plan, &registry);

        let fields: Vec<&str> = report.annotations.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "plan.u8",
                "plan.u16",
                "plan.u32",
                "plan.i16",
                "plan.i32",
                "plan.oui",
                "plan.mac",
                "plan.ipv4",
                "plan.uuid",
            ]
        );
        assert_eq!(report.consumed, 42);
        assert_eq!(report.annotations[8].start, 26);
    }

    #[test]
    fn bounds_error_keeps_partial_decode() {
        let mut registry = FieldRegistry::new();
        let plan = DecodePlan::parse("a=u16,b=u32,c=u8", &mut registry).unwrap();
        let report = decode_frame(&[0x00, 0x01, 0x02], &plan, &registry);

        assert_eq!(report.annotations.len(), 1);
        assert_eq!(report.annotations[0].label, "a: 1");
        assert_eq!(report.consumed, 2);
        assert!(report.error.unwrap().contains("buffer too short"));
    }

    #[test]
    fn rest_on_exhausted_frame_emits_nothing() {
        let mut registry = FieldRegistry::new();
        let plan = DecodePlan::parse("u16,rest", &mut registry).unwrap();
        let data = [0x12, 0x34];
        let buf = ByteBuffer::new(&data);
        let mut tree = AnnotationTree::new();

        assert_eq!(apply_plan(&buf, &plan, &registry, &mut tree).unwrap(), 2);
        assert_eq!(tree.len(), 1);
        assert!(tree.diagnostics().is_empty());
    }

    #[test]
    fn region_steps_do_not_fail_past_the_end() {
        let mut registry = FieldRegistry::new();
        let plan = DecodePlan::parse("IO Data=user:4,malformed:3,frag:2", &mut registry).unwrap();
        let report = decode_frame(&[0x01, 0x02], &plan, &registry);

        assert!(report.error.is_none());
        assert_eq!(report.consumed, 9);
        assert_eq!(report.annotations[0].label, "IO Data: 4 bytes");
        assert_eq!(report.annotations[1].start, 4);
        assert_eq!(report.annotations[1].end, 7);
        assert_eq!(report.annotations[1].severity, Severity::Error);
        assert_eq!(report.annotations[2].field, "pn.frag_bytes");
    }
}
