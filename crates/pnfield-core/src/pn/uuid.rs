use uuid::Uuid;

use super::layout;
use crate::buffer::{BufferBoundsError, ByteBuffer};

/// DCE/RPC data representation label (`drep`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRepresentation(pub [u8; 2]);

impl DataRepresentation {
    /// The fixed representation used by PROFINET fields.
    pub const PROFINET: Self = Self(layout::PN_DREP);

    pub fn is_little_endian(self) -> bool {
        self.0[0] & layout::DREP_LITTLE_ENDIAN != 0
    }
}

/// Decodes 16-byte identifiers.
pub trait UuidDecoder {
    fn decode(
        &self,
        buf: &ByteBuffer<'_>,
        offset: usize,
        drep: DataRepresentation,
    ) -> Result<Uuid, BufferBoundsError>;
}

/// GUID layout shared with DCE/RPC: `Data1` (u32), `Data2` (u16), `Data3`
/// (u16) in the byte order named by `drep`, then eight raw `Data4` bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DceRpcUuidDecoder;

impl UuidDecoder for DceRpcUuidDecoder {
    fn decode(
        &self,
        buf: &ByteBuffer<'_>,
        offset: usize,
        drep: DataRepresentation,
    ) -> Result<Uuid, BufferBoundsError> {
        buf.read_slice(offset, layout::UUID_WIDTH)?;
        let (data1, data2, data3) = if drep.is_little_endian() {
            (
                buf.read_u32_le(offset)?,
                buf.read_u16_le(offset + 4)?,
                buf.read_u16_le(offset + 6)?,
            )
        } else {
            (
                buf.read_u32_be(offset)?,
                buf.read_u16_be(offset + 4)?,
                buf.read_u16_be(offset + 6)?,
            )
        };
        let data4: [u8; 8] = buf.read_array(offset + 8)?;
        Ok(Uuid::from_fields(data1, data2, data3, &data4))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataRepresentation, DceRpcUuidDecoder, UuidDecoder};
    use crate::buffer::ByteBuffer;

    const WIRE: [u8; 16] = [
        0xde, 0xa0, 0x00, 0x01, 0x6c, 0x97, 0x11, 0xd1, 0x82, 0x71, 0x00, 0xa0, 0x24, 0x42, 0xdf,
        0x7d,
    ];

    #[test]
    fn big_endian_drep_keeps_wire_order() {
        let buf = ByteBuffer::new(&WIRE);
        let uuid = DceRpcUuidDecoder
            .decode(&buf, 0, DataRepresentation::PROFINET)
            .unwrap();
        assert_eq!(
            uuid.hyphenated().to_string(),
            "dea00001-6c97-11d1-8271-00a02442df7d"
        );
    }

    #[test]
    fn little_endian_drep_swaps_leading_fields() {
        let buf = ByteBuffer::new(&WIRE);
        let uuid = DceRpcUuidDecoder
            .decode(&buf, 0, DataRepresentation([0x10, 0x00]))
            .unwrap();
        assert_eq!(
            uuid.hyphenated().to_string(),
            "0100a0de-976c-d111-8271-00a02442df7d"
        );
    }

    #[test]
    fn short_buffer_fails() {
        let buf = ByteBuffer::new(&WIRE[..15]);
        let err = DceRpcUuidDecoder
            .decode(&buf, 0, DataRepresentation::PROFINET)
            .unwrap_err();
        assert_eq!(err.width, 16);
    }
}
