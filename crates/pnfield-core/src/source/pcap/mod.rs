//! pcap/pcapng file source.
//!
//! Container sniffing and timestamp conventions live in `reader`; block
//! iteration lives in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
