pub const U8_WIDTH: usize = 1;
pub const U16_WIDTH: usize = 2;
pub const U32_WIDTH: usize = 4;
pub const OUI_WIDTH: usize = 3;
pub const MAC_WIDTH: usize = 6;
pub const IPV4_WIDTH: usize = 4;
pub const UUID_WIDTH: usize = 16;

pub const ALIGNMENT: usize = 4;

/// Data representation used by PROFINET on the wire: big-endian integers,
/// ASCII characters, IEEE floats. Never negotiated.
pub const PN_DREP: [u8; 2] = [0x00, 0x00];
/// Bit in the first data representation byte selecting little-endian integers.
pub const DREP_LITTLE_ENDIAN: u8 = 0x10;

/// Fixed display value used by string-typed region fields.
pub const REGION_VALUE: &str = "data";
