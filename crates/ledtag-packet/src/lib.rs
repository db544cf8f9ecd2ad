//! Packet encoding for 11-row LED name tags.
//!
//! A device configuration is transmitted as one contiguous bytestream:
//! - A 64-byte big-endian header (magic `"wang"`, flash/border bits,
//!   one speed/animation byte and one length word per message, timestamp)
//! - The column-major bitmap of every message, concatenated in slot order
//!
//! Everything here is a pure computation over in-memory data. Device
//! transport is left to the caller.

pub mod bitmap;
pub mod codec;
pub mod error;
pub mod mode;
pub mod timestamp;
pub mod writer;

pub use bitmap::{Bitmap, BytePixels, HEIGHT, MAX_WIDTH_BYTES, MAX_WIDTH_PX};
pub use codec::{
    check_packet_size, decode_packet, encode_packet, DecodedPacket, PacketConfig, PacketHeader,
    SlotFrame, HEADER_SIZE, MAGIC, MAX_PACKET_SIZE, MAX_PAYLOAD, SLOT_COUNT,
};
pub use error::{PacketError, Result};
pub use mode::{flag_bits, flag_byte, mode_byte, pack_mode, unpack_mode, Animation, Speed};
pub use timestamp::DeviceTimestamp;
pub use writer::PacketWriter;
