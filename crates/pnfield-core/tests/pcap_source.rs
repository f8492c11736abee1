mod common;

use pnfield_core::{PacketSource, PcapFileSource, SourceError};

use common::{ETHERTYPE_PROFINET, ethernet_frame, station, write_legacy_pcap, write_pcapng};

fn drain(path: &std::path::Path) -> Vec<(Option<f64>, usize)> {
    let mut source = PcapFileSource::open(path).unwrap();
    let mut packets = Vec::new();
    while let Some(event) = source.next_packet().unwrap() {
        packets.push((event.ts, event.data.len()));
    }
    packets
}

#[test]
fn pcapng_source_reads_every_packet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.pcapng");
    write_pcapng(
        &path,
        &[
            (0, ethernet_frame(station(1), ETHERTYPE_PROFINET, &[0x80, 0x00])),
            (1_500_000, ethernet_frame(station(2), ETHERTYPE_PROFINET, &[0x80])),
        ],
    );

    let packets = drain(&path);
    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0].1, 16);
    assert_eq!(packets[1].1, 15);
    let ts = packets[1].0.unwrap();
    assert!((ts - 1.5).abs() < 1e-9);
}

#[test]
fn legacy_pcap_source_reads_every_packet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.pcap");
    write_legacy_pcap(
        &path,
        &[(2_000_000, ethernet_frame(station(1), ETHERTYPE_PROFINET, &[0x00; 4]))],
    );

    let packets = drain(&path);
    assert_eq!(packets, vec![(Some(2.0), 18)]);
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.pcapng");
    std::fs::write(&path, [0x0a, 0x0d, 0x0d]).unwrap();

    let err = match PcapFileSource::open(&path) {
        Ok(_) => panic!("expected truncated file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn pcapng_frames_exclude_block_padding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unaligned.pcapng");
    let frames: Vec<(u64, Vec<u8>)> = (5..=8)
        .map(|len| (0, ethernet_frame(station(1), ETHERTYPE_PROFINET, &vec![0x11; len])))
        .collect();
    write_pcapng(&path, &frames);

    let lengths: Vec<usize> = drain(&path).into_iter().map(|(_, len)| len).collect();
    assert_eq!(lengths, vec![19, 20, 21, 22]);
}
