use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationHandle, AnnotationSink};

/// Per-frame summary shown in the packet list.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketInfo {
    pub info: String,
}

impl PacketInfo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Append `text` to both the info column and an existing annotation.
pub fn append_info<S: AnnotationSink + ?Sized>(
    pinfo: &mut PacketInfo,
    sink: &mut S,
    item: AnnotationHandle,
    text: &str,
) {
    pinfo.info.push_str(text);
    sink.append_text(item, text);
}
