//! Annotation and diagnostic sinks.
//!
//! Decoders describe what they consumed by handing an [`Annotation`] to an
//! [`AnnotationSink`], and attach follow-up findings through a
//! [`DiagnosticSink`]. Both traits are implemented by [`AnnotationTree`],
//! the in-memory sink used by the analysis layer and by tests.

pub mod tree;

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::FieldId;

pub use tree::AnnotationTree;

/// Presentation severity of an annotation or diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Handle to an annotation previously accepted by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationHandle(pub(crate) usize);

/// Decoded value carried by an annotation.
///
/// `Display` renders the natural representation of each shape.
///
/// # Examples
/// ```
/// use pnfield_core::FieldValue;
///
/// let mac = FieldValue::Mac([0x00, 0x0e, 0x8c, 0x01, 0x02, 0x03]);
/// assert_eq!(mac.to_string(), "00:0e:8c:01:02:03");
/// assert_eq!(FieldValue::Oui(0x000e8c).to_string(), "0x000e8c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Uint(u32),
    Int(i32),
    Oui(u32),
    Mac([u8; 6]),
    Ipv4(Ipv4Addr),
    Uuid(Uuid),
    Text(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Uint(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Oui(v) => write!(f, "0x{v:06x}"),
            FieldValue::Mac(bytes) => {
                for (idx, b) in bytes.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            FieldValue::Ipv4(addr) => write!(f, "{addr}"),
            FieldValue::Uuid(uuid) => write!(f, "{}", uuid.hyphenated()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Bytes(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// One presentation record: which field, which bytes, what value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub field: FieldId,
    pub range: Range<usize>,
    pub value: FieldValue,
    /// Preformatted display text overriding `name: value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub severity: Severity,
    /// Text appended after creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub appended: String,
}

impl Annotation {
    pub fn new(field: FieldId, range: Range<usize>, value: FieldValue) -> Self {
        Self {
            field,
            range,
            value,
            text: None,
            severity: Severity::Info,
            appended: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receives annotations produced by decoders.
pub trait AnnotationSink {
    fn add(&mut self, annotation: Annotation) -> AnnotationHandle;

    /// Append follow-up text to an annotation returned earlier. Unknown
    /// handles are ignored.
    fn append_text(&mut self, item: AnnotationHandle, text: &str);
}

/// Kind of diagnostic raised against an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Bytes intentionally left uninterpreted.
    UndecodedData,
    /// Bytes that violate the expected structure.
    Malformed,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::UndecodedData => Severity::Warning,
            DiagnosticKind::Malformed => Severity::Error,
        }
    }

    /// Filter abbreviation of the expert entry, e.g. `pn.undecoded_data`.
    pub fn abbrev(self) -> &'static str {
        match self {
            DiagnosticKind::UndecodedData => "pn.undecoded_data",
            DiagnosticKind::Malformed => "pn.malformed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub item: AnnotationHandle,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

/// Receives diagnostics tied to existing annotations.
pub trait DiagnosticSink {
    fn flag(&mut self, item: AnnotationHandle, kind: DiagnosticKind, message: String);
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use uuid::Uuid;

    use super::{DiagnosticKind, FieldValue, Severity};

    #[test]
    fn values_render_naturally() {
        assert_eq!(FieldValue::Uint(513).to_string(), "513");
        assert_eq!(FieldValue::Int(-2).to_string(), "-2");
        assert_eq!(
            FieldValue::Ipv4(Ipv4Addr::new(192, 168, 0, 1)).to_string(),
            "192.168.0.1"
        );
        let uuid = Uuid::from_bytes([
            0xde, 0xa0, 0x00, 0x00, 0x6c, 0x97, 0x11, 0xd1, 0x82, 0x71, 0x00, 0xa0, 0x24, 0x42,
            0xdf, 0x7d,
        ]);
        assert_eq!(
            FieldValue::Uuid(uuid).to_string(),
            "dea00000-6c97-11d1-8271-00a02442df7d"
        );
        assert_eq!(FieldValue::Bytes(vec![0xab, 0x01]).to_string(), "ab01");
    }

    #[test]
    fn diagnostic_kinds_carry_severity() {
        assert_eq!(DiagnosticKind::UndecodedData.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::Malformed.severity(), Severity::Error);
        assert!(Severity::Error > Severity::Warning);
    }
}
