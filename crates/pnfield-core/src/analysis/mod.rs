//! Composition of the capture source, Ethernet slicing and decode plans into
//! a [`CaptureReport`].

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::plan::DecodePlan;
use crate::registry::FieldRegistry;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::station::{CaptureScope, StationAddress};
use crate::{CaptureReport, CaptureSummary, DEFAULT_GENERATED_AT, StationSummary, make_stub_report};

mod ethernet;
mod frame;

pub use ethernet::{EthernetError, EthernetFrame, parse_ethernet};
pub use frame::{apply_plan, decode_frame};

/// EtherType of PROFINET real-time frames.
pub const ETHERTYPE_PROFINET: u16 = 0x8892;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Frame selection for capture analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Only frames carrying this EtherType (after any VLAN tag) are decoded.
    pub ether_type: u16,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ether_type: ETHERTYPE_PROFINET,
        }
    }
}

pub fn analyze_pcap_file(
    path: &Path,
    plan: &DecodePlan,
    registry: &FieldRegistry,
    options: AnalysisOptions,
) -> Result<CaptureReport, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(path, source, plan, registry, options)
}

pub fn analyze_source<S: PacketSource>(
    path: &Path,
    source: S,
    plan: &DecodePlan,
    registry: &FieldRegistry,
    options: AnalysisOptions,
) -> Result<CaptureReport, AnalysisError> {
    let mut scope: CaptureScope<()> = CaptureScope::new();
    analyze_source_with_scope(path, source, plan, registry, options, &mut scope)
}

/// Like [`analyze_source`], but stations are tracked in a caller-owned
/// scope so that higher-level logic can fill their record lists afterwards.
pub fn analyze_source_with_scope<S: PacketSource, T>(
    path: &Path,
    mut source: S,
    plan: &DecodePlan,
    registry: &FieldRegistry,
    options: AnalysisOptions,
    scope: &mut CaptureScope<T>,
) -> Result<CaptureReport, AnalysisError> {
    let mut packets_total = 0u64;
    let mut frames_failed = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut frames = Vec::new();
    let mut seen: HashMap<StationAddress, (u64, u64)> = HashMap::new();

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        let index = packets_total;
        packets_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let eth = match parse_ethernet(linktype, &data) {
            Ok(Some(eth)) => eth,
            Ok(None) => continue,
            Err(err) => {
                debug!(index, error = %err, "skipping frame");
                continue;
            }
        };
        if eth.ether_type != options.ether_type {
            continue;
        }

        let address = StationAddress(eth.source);
        if !scope.contains(&address) {
            scope.init_station(address);
        }
        let entry = seen.entry(address).or_insert((index, 0));
        entry.1 += 1;

        let mut report = decode_frame(eth.payload, plan, registry);
        report.index = index;
        report.timestamp = ts_to_rfc3339(ts);
        report.source = Some(address.to_string());
        if report.error.is_some() {
            frames_failed += 1;
        }
        frames.push(report);
    }
    info!(
        packets = packets_total,
        frames = frames.len(),
        stations = scope.len(),
        "capture analyzed"
    );

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        frames_decoded: frames.len() as u64,
        frames_failed,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.stations = scope
        .stations()
        .filter_map(|(address, _)| {
            let (first_frame, frames) = seen.get(address).copied()?;
            Some(StationSummary {
                address: address.to_string(),
                first_frame,
                frames,
            })
        })
        .collect();
    report.frames = frames;
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
