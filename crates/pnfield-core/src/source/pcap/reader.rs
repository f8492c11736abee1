use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::error::PcapSourceError;
use super::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Legacy,
    Ng,
}

/// Sniff the container format from the leading magic, leaving the reader
/// at the start of the file.
///
/// # Errors
/// Returns `PcapSourceError::Io` when fewer than four bytes can be read or
/// the reader cannot be rewound.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<CaptureFormat, PcapSourceError> {
    let mut magic = [0u8; layout::MAGIC_LEN];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    if magic == layout::PCAPNG_MAGIC {
        Ok(CaptureFormat::Ng)
    } else {
        Ok(CaptureFormat::Legacy)
    }
}

/// Link type of a pcapng interface; frames from undeclared interfaces are
/// taken to be Ethernet.
pub fn interface_linktype(linktypes: &[Linktype], if_id: u32) -> Linktype {
    usize::try_from(if_id)
        .ok()
        .and_then(|idx| linktypes.get(idx).copied())
        .unwrap_or(Linktype::ETHERNET)
}

pub fn ng_ts_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ticks = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ticks as f64 / layout::TS_TICKS_PER_SECOND
}

pub fn legacy_ts_seconds(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) / layout::TS_TICKS_PER_SECOND
}
