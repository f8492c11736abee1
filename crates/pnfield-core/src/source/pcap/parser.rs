use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader};
use tracing::debug;

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    CaptureFormat, detect_format, interface_linktype, legacy_ts_seconds, ng_ts_seconds,
};

/// Packet source reading a pcap or pcapng file.
pub struct PcapFileSource {
    inner: Container,
}

enum Container {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Linktype,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut file = File::open(path)?;
        let inner = match detect_format(&mut file)? {
            CaptureFormat::Ng => Container::Ng {
                reader: PcapNGReader::new(layout::READER_BUFFER_SIZE, file)
                    .map_err(|e| PcapSourceError::pcap("pcapng reader init", e))?,
                linktypes: Vec::new(),
            },
            CaptureFormat::Legacy => Container::Legacy {
                reader: LegacyPcapReader::new(layout::READER_BUFFER_SIZE, file)
                    .map_err(|e| PcapSourceError::pcap("pcap reader init", e))?,
                linktype: Linktype::ETHERNET,
            },
        };
        debug!(path = %path.display(), "capture opened");
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            Container::Legacy { reader, linktype } => {
                pump(reader, "pcap reader", |block| match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = header.network;
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_seconds(packet.ts_sec, packet.ts_usec)),
                        linktype: *linktype,
                        data: captured(packet.data, packet.caplen),
                    }),
                    _ => None,
                })?
            }
            Container::Ng { reader, linktypes } => {
                pump(reader, "pcapng reader", |block| match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        linktypes.push(intf.linktype);
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                        ts: Some(ng_ts_seconds(packet.ts_high, packet.ts_low)),
                        linktype: interface_linktype(linktypes, packet.if_id),
                        data: captured(packet.data, packet.caplen),
                    }),
                    _ => None,
                })?
            }
        };
        Ok(event)
    }
}

/// Copy the captured bytes of a packet. Enhanced packet blocks hand out
/// their body including the trailing 32-bit alignment padding.
fn captured(data: &[u8], caplen: u32) -> Vec<u8> {
    let len = usize::try_from(caplen).map_or(data.len(), |len| len.min(data.len()));
    data[..len].to_vec()
}

/// Drive `reader` until `on_block` turns a block into a packet or the file
/// ends.
fn pump<R, F>(
    reader: &mut R,
    context: &'static str,
    mut on_block: F,
) -> Result<Option<PacketEvent>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = on_block(block);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| PcapSourceError::pcap(context, e))?;
            }
            Err(e) => return Err(PcapSourceError::pcap(context, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::captured;

    #[test]
    fn captured_drops_block_padding() {
        let body = [0xaa, 0xbb, 0xcc, 0x00];
        assert_eq!(captured(&body, 3), vec![0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn captured_never_reads_past_the_body() {
        assert_eq!(captured(&[0x01, 0x02], 9), vec![0x01, 0x02]);
    }
}
