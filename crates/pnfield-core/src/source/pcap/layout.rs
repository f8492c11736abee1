pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const MAGIC_LEN: usize = 4;
pub const READER_BUFFER_SIZE: usize = 65536;
/// pcapng timestamps default to microsecond resolution.
pub const TS_TICKS_PER_SECOND: f64 = 1_000_000.0;
