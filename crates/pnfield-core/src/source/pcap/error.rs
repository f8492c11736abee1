use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error ({context}): {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}

impl PcapSourceError {
    pub(super) fn pcap(context: &'static str, err: impl Display) -> Self {
        PcapSourceError::Pcap {
            context,
            message: err.to_string(),
        }
    }
}
