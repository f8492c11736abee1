//! PROFINET field primitives.
//!
//! - `layout`: field widths and wire constants
//! - `decode`: cursor decoders for scalar, address and identifier shapes
//! - `diagnostics`: undecoded/malformed/user-data/padding/alignment regions
//! - `uuid`: identifier decoding with an explicit data representation
//! - `info`: info-column helper
//!
//! Every operation takes the current offset and returns the next one, so
//! dissectors thread a single cursor through a frame:
//!
//! ```
//! use pnfield_core::{AnnotationTree, ByteBuffer, FieldKind, FieldRegistry, pn};
//!
//! let mut registry = FieldRegistry::new();
//! let frame_id = registry.register("FrameID", "pn_rt.frame_id", FieldKind::Uint16);
//! let mut tree = AnnotationTree::new();
//! let frame = [0x80, 0x00, 0x01, 0x02, 0x03];
//! let buf = ByteBuffer::new(&frame);
//!
//! let (offset, _) = pn::dissect_u16(&buf, 0, &mut tree, frame_id)?;
//! let offset = pn::dissect_undecoded(&buf, offset, &mut tree, &registry, buf.remaining(offset));
//! assert_eq!(offset, frame.len());
//! # Ok::<(), pnfield_core::BufferBoundsError>(())
//! ```

pub mod decode;
pub mod diagnostics;
pub mod info;
pub mod layout;
pub mod uuid;

pub use decode::{
    dissect_i16, dissect_i32, dissect_ipv4, dissect_mac, dissect_oui, dissect_u8, dissect_u16,
    dissect_u16_ret_item, dissect_u32, dissect_uuid,
};
pub use diagnostics::{
    UserDataKind, align4_padding, dissect_align4, dissect_malformed, dissect_padding,
    dissect_undecoded, dissect_user_data, dissect_user_data_bytes,
};
pub use info::{PacketInfo, append_info};
pub use self::uuid::{DataRepresentation, DceRpcUuidDecoder, UuidDecoder};
