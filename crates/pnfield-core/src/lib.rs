//! pnfield core library: field decoding primitives for PROFINET dissectors.
//!
//! Decoders work on a bounds-checked [`ByteBuffer`] and a running offset.
//! Each primitive in [`pn`] reads one fixed-width field, emits one
//! [`Annotation`] into an [`AnnotationSink`] and returns the advanced offset.
//! Region emitters mark padding, user data, undecoded and malformed spans and
//! raise diagnostics through a [`DiagnosticSink`]. Field metadata lives in a
//! [`FieldRegistry`] built once and passed to every call.
//!
//! Around those primitives the crate provides per-capture station records
//! ([`CaptureScope`]), a reader that strips `<!-- -->` comments from
//! description files ([`CommentStrippingReader`]), shape-driven decode plans
//! ([`DecodePlan`]) and a capture pipeline producing a [`CaptureReport`].
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use pnfield_core::{AnalysisOptions, DecodePlan, FieldRegistry, analyze_pcap_file};
//!
//! let mut registry = FieldRegistry::new();
//! let plan = DecodePlan::parse("frame_id=u16,rest", &mut registry)?;
//! let report = analyze_pcap_file(
//!     Path::new("capture.pcapng"),
//!     &plan,
//!     &registry,
//!     AnalysisOptions::default(),
//! )?;
//! println!("frames decoded: {}", report.frames.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod annotation;
pub mod buffer;
pub mod plan;
pub mod pn;
pub mod registry;
pub mod station;
pub mod text;

mod analysis;
mod source;

pub use analysis::{
    AnalysisError, AnalysisOptions, ETHERTYPE_PROFINET, EthernetError, EthernetFrame,
    analyze_pcap_file, analyze_source, analyze_source_with_scope, apply_plan, decode_frame,
    parse_ethernet,
};
pub use annotation::{
    Annotation, AnnotationHandle, AnnotationSink, AnnotationTree, Diagnostic, DiagnosticKind,
    DiagnosticSink, FieldValue, Severity,
};
pub use buffer::{BufferBoundsError, ByteBuffer};
pub use plan::{DecodePlan, PlanError, Scalar, Shape, Step};
pub use registry::{CommonFields, FieldId, FieldInfo, FieldKind, FieldRegistry};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
pub use station::{CaptureScope, StationAddress, StationInfo};
pub use text::CommentStrippingReader;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of decoding a capture with one plan.
///
/// # Examples
/// ```
/// use pnfield_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, pnfield_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp; the last capture timestamp when known.
    pub generated_at: String,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded frames in capture order.
    pub frames: Vec<FrameReport>,
    /// Stations in first-seen order.
    pub stations: Vec<StationSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    pub bytes: u64,
}

/// Capture-wide counters.
///
/// # Examples
/// ```
/// use pnfield_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     packets_total: 10,
///     frames_decoded: 4,
///     frames_failed: 1,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.packets_total, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Every packet read from the source, decoded or not.
    pub packets_total: u64,
    /// Frames matching the selected EtherType.
    pub frames_decoded: u64,
    /// Decoded frames aborted by a bounds error.
    pub frames_failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One station seen as a frame source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSummary {
    /// Hardware address, colon separated.
    pub address: String,
    /// Capture index of the first frame from this station.
    pub first_frame: u64,
    pub frames: u64,
}

/// Decoding result for one frame.
///
/// A frame aborted by a bounds error keeps the annotations emitted before
/// the failure and carries the error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Packet index within the capture (zero when decoded standalone).
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Source hardware address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Payload length.
    pub bytes: usize,
    /// Offset reached by the plan; may exceed `bytes` after region steps.
    pub consumed: usize,
    pub annotations: Vec<AnnotationRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Flattened annotation for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Field abbreviation, e.g. `pn.padding`.
    pub field: String,
    /// Display line.
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub value: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Index into the frame's `annotations`.
    pub annotation: usize,
    pub kind: DiagnosticKind,
    /// Filter abbreviation of the kind.
    pub abbrev: String,
    pub severity: Severity,
    pub message: String,
}

/// Build a report with base fields filled and no frames.
///
/// # Examples
/// ```
/// use pnfield_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert!(report.frames.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> CaptureReport {
    CaptureReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "pnfield".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        frames: vec![],
        stations: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let mut report = make_stub_report("capture.pcapng", 1);
        report.capture_summary = Some(CaptureSummary {
            packets_total: 1,
            frames_decoded: 1,
            frames_failed: 0,
            time_start: None,
            time_end: None,
        });
        report.frames.push(FrameReport {
            index: 0,
            timestamp: None,
            source: None,
            bytes: 2,
            consumed: 2,
            annotations: vec![AnnotationRecord {
                field: "plan.frame_id".to_string(),
                label: "frame_id: 32768".to_string(),
                start: 0,
                end: 2,
                value: "32768".to_string(),
                severity: Severity::Info,
            }],
            diagnostics: vec![],
            error: None,
        });

        let value = serde_json::to_value(&report).expect("report json");
        let capture = value.get("capture_summary").expect("capture_summary");
        assert!(capture.get("time_start").is_none());
        assert!(capture.get("time_end").is_none());

        let frame = &value["frames"][0];
        assert!(frame.get("timestamp").is_none());
        assert!(frame.get("diagnostics").is_none());
        assert!(frame.get("error").is_none());
        assert_eq!(frame["annotations"][0]["severity"], "info");
    }

    #[test]
    fn diagnostic_records_serialize_kind_in_snake_case() {
        let record = DiagnosticRecord {
            annotation: 3,
            kind: DiagnosticKind::UndecodedData,
            abbrev: DiagnosticKind::UndecodedData.abbrev().to_string(),
            severity: Severity::Warning,
            message: "Undecoded Data, 2 bytes".to_string(),
        };
        let value = serde_json::to_value(&record).expect("record json");
        assert_eq!(value["kind"], "undecoded_data");
        assert_eq!(value["abbrev"], "pn.undecoded_data");
        assert_eq!(value["severity"], "warning");
    }
}
