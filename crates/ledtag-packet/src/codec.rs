use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::bitmap::{Bitmap, HEIGHT};
use crate::error::{PacketError, Result};
use crate::mode::{flag_byte, mode_byte, Animation, Speed};
use crate::timestamp::DeviceTimestamp;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 64;

/// Magic bytes: "wang".
pub const MAGIC: [u8; 4] = *b"wang";

/// Number of message slots on the device.
pub const SLOT_COUNT: usize = 8;

/// Largest bitmap payload the device accepts.
pub const MAX_PAYLOAD: usize = 4096;

/// Largest packet (header + payload) the device accepts.
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD;

/// Decoded packet header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketHeader {
    /// Bit `i` set when message `i` flashes.
    pub flash: u8,
    /// Bit `i` set when message `i` has a border.
    pub border: u8,
    /// `(speed << 4) | animation` per message.
    pub modes: [u8; SLOT_COUNT],
    /// Bitmap width in column groups per message.
    pub lengths: [u16; SLOT_COUNT],
    /// Packed [`DeviceTimestamp`] bits.
    pub timestamp: u64,
}

impl PacketHeader {
    /// Encode the header into the wire format.
    ///
    /// Wire format (big-endian):
    /// ```text
    /// ┌───────┬──────┬───────┬────────┬───────────┬────────────┬──────┬───────────┬───────┐
    /// │ Magic │ pad  │ Flash │ Border │ Modes     │ Lengths    │ pad  │ Timestamp │ pad   │
    /// │ (4B)  │ (2B) │ (1B)  │ (1B)   │ (8 x 1B)  │ (8 x 2B)   │ (4B) │ (8B)      │ (20B) │
    /// │ wang  │ 0    │       │        │           │            │ 0    │           │ 0     │
    /// └───────┴──────┴───────┴────────┴───────────┴────────────┴──────┴───────────┴───────┘
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_slice(&MAGIC);
        dst.put_bytes(0, 2);
        dst.put_u8(self.flash);
        dst.put_u8(self.border);
        dst.put_slice(&self.modes);
        for length in self.lengths {
            dst.put_u16(length);
        }
        dst.put_bytes(0, 4);
        dst.put_u64(self.timestamp);
        dst.put_bytes(0, 20);
    }

    /// Decode a header from the start of `src`.
    ///
    /// Padding bytes are not checked.
    pub fn decode(src: &[u8]) -> Result<Self> {
        if src.len() < HEADER_SIZE {
            return Err(PacketError::Truncated {
                needed: HEADER_SIZE,
                actual: src.len(),
            });
        }
        if src[0..4] != MAGIC {
            return Err(PacketError::InvalidMagic);
        }

        let mut buf = &src[4..HEADER_SIZE];
        buf.advance(2);
        let flash = buf.get_u8();
        let border = buf.get_u8();
        let mut modes = [0u8; SLOT_COUNT];
        buf.copy_to_slice(&mut modes);
        let mut lengths = [0u16; SLOT_COUNT];
        for length in &mut lengths {
            *length = buf.get_u16();
        }
        buf.advance(4);
        let timestamp = buf.get_u64();

        Ok(Self {
            flash,
            border,
            modes,
            lengths,
            timestamp,
        })
    }

    /// Total bitmap bytes declared by the length words.
    pub fn payload_len(&self) -> usize {
        self.lengths.iter().map(|l| *l as usize * HEIGHT).sum()
    }

    pub fn device_timestamp(&self) -> DeviceTimestamp {
        DeviceTimestamp::from_bits(self.timestamp)
    }
}

/// One message as handed to [`encode_packet`].
#[derive(Debug, Clone, Copy)]
pub struct SlotFrame<'a> {
    pub flash: bool,
    pub border: bool,
    pub speed: Speed,
    pub animation: Animation,
    /// Absent for inactive messages.
    pub bitmap: &'a Bitmap,
}

/// Assemble a full packet from the eight messages.
///
/// Returns an empty buffer when every bitmap is absent: there is nothing
/// to program. The result is not checked against the device limit; use
/// [`check_packet_size`] for that.
pub fn encode_packet(
    slots: &[SlotFrame<'_>; SLOT_COUNT],
    timestamp: DeviceTimestamp,
) -> Result<Bytes> {
    if slots.iter().all(|slot| slot.bitmap.is_absent()) {
        tracing::debug!("all slots empty, nothing to encode");
        return Ok(Bytes::new());
    }

    let mut lengths = [0u16; SLOT_COUNT];
    for (length, slot) in lengths.iter_mut().zip(slots) {
        *length = u16::try_from(slot.bitmap.width_bytes()).map_err(|_| {
            PacketError::PayloadTooLarge {
                size: slot.bitmap.as_bytes().len(),
                max: u16::MAX as usize * HEIGHT,
            }
        })?;
    }

    let header = PacketHeader {
        flash: flag_byte(slots.iter().map(|s| s.flash)),
        border: flag_byte(slots.iter().map(|s| s.border)),
        modes: std::array::from_fn(|i| mode_byte(slots[i].speed, slots[i].animation)),
        lengths,
        timestamp: timestamp.to_bits(),
    };

    let mut dst = BytesMut::with_capacity(HEADER_SIZE + header.payload_len());
    header.encode(&mut dst);
    for slot in slots {
        dst.put_slice(slot.bitmap.as_bytes());
    }

    tracing::debug!(
        size = dst.len(),
        lengths = ?header.lengths,
        %timestamp,
        "encoded packet"
    );
    Ok(dst.freeze())
}

/// Configuration for the device size gate.
#[derive(Debug, Clone)]
pub struct PacketConfig {
    /// Maximum packet size in bytes. Default: 4160.
    pub max_packet_size: usize,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

/// Reject packets the device cannot hold.
pub fn check_packet_size(packet: &[u8], config: &PacketConfig) -> Result<()> {
    if packet.len() > config.max_packet_size {
        tracing::warn!(
            size = packet.len(),
            max = config.max_packet_size,
            "packet exceeds device limit"
        );
        return Err(PacketError::PayloadTooLarge {
            size: packet.len(),
            max: config.max_packet_size,
        });
    }
    Ok(())
}

/// A packet split back into its header and per-message bitmaps.
#[derive(Debug, Clone)]
pub struct DecodedPacket {
    pub header: PacketHeader,
    pub bitmaps: [Bitmap; SLOT_COUNT],
}

/// Parse a complete packet, checking the length words against the payload.
pub fn decode_packet(src: &[u8]) -> Result<DecodedPacket> {
    let header = PacketHeader::decode(src)?;
    let payload = &src[HEADER_SIZE..];
    let declared = header.payload_len();
    if declared != payload.len() {
        return Err(PacketError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let mut bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
    let mut offset = 0usize;
    for (bitmap, length) in bitmaps.iter_mut().zip(header.lengths) {
        let end = offset + length as usize * HEIGHT;
        *bitmap = Bitmap::from_raw(Bytes::copy_from_slice(&payload[offset..end]))?;
        offset = end;
    }

    Ok(DecodedPacket { header, bitmaps })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(width_bytes: usize, fill: u8) -> Bitmap {
        Bitmap::from_raw(vec![fill; width_bytes * HEIGHT]).unwrap()
    }

    fn frames<'a>(bitmaps: &'a [Bitmap; SLOT_COUNT]) -> [SlotFrame<'a>; SLOT_COUNT] {
        std::array::from_fn(|i| SlotFrame {
            flash: false,
            border: false,
            speed: Speed::default(),
            animation: Animation::Left,
            bitmap: &bitmaps[i],
        })
    }

    fn ts() -> DeviceTimestamp {
        DeviceTimestamp::new(2024, 6, 1, 12, 30, 45)
    }

    #[test]
    fn test_all_absent_encodes_to_nothing() {
        let bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
        let packet = encode_packet(&frames(&bitmaps), ts()).unwrap();
        assert!(packet.is_empty());
    }

    #[test]
    fn test_single_slot_lengths_and_payload() {
        let mut bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
        bitmaps[2] = bitmap(3, 0xA5);

        let packet = encode_packet(&frames(&bitmaps), ts()).unwrap();
        assert_eq!(packet.len(), HEADER_SIZE + 3 * HEIGHT);

        let header = PacketHeader::decode(&packet).unwrap();
        assert_eq!(header.lengths, [0, 0, 3, 0, 0, 0, 0, 0]);
        assert!(packet[HEADER_SIZE..].iter().all(|b| *b == 0xA5));
    }

    #[test]
    fn test_header_layout_is_byte_exact() {
        let bitmaps: [Bitmap; SLOT_COUNT] = std::array::from_fn(|i| bitmap(i + 1, 0));
        let mut slots = frames(&bitmaps);
        slots[0].flash = true;
        slots[7].border = true;
        slots[1].speed = Speed::MAX;
        slots[1].animation = Animation::Rotate;

        let packet = encode_packet(&slots, ts()).unwrap();

        assert_eq!(&packet[0..4], b"wang");
        assert_eq!(&packet[4..6], &[0, 0]);
        assert_eq!(packet[6], 0b0000_0001);
        assert_eq!(packet[7], 0b1000_0000);
        assert_eq!(packet[8], 0x30);
        assert_eq!(packet[9], 0xFA);
        assert_eq!(&packet[16..18], &[0x00, 0x01]);
        assert_eq!(&packet[30..32], &[0x00, 0x08]);
        assert_eq!(&packet[32..36], &[0, 0, 0, 0]);
        assert_eq!(&packet[36..44], &ts().to_bits().to_be_bytes());
        assert!(packet[44..64].iter().all(|b| *b == 0));
        assert_eq!(packet.len(), HEADER_SIZE + 36 * HEIGHT);
    }

    #[test]
    fn test_decode_packet_splits_bitmaps() {
        let mut bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
        bitmaps[0] = bitmap(2, 0x11);
        bitmaps[5] = bitmap(1, 0x22);

        let packet = encode_packet(&frames(&bitmaps), ts()).unwrap();
        let decoded = decode_packet(&packet).unwrap();

        assert_eq!(decoded.header.device_timestamp(), ts());
        assert_eq!(decoded.bitmaps, bitmaps);
    }

    #[test]
    fn test_decode_invalid_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"gnaw");
        assert!(matches!(
            PacketHeader::decode(&buf),
            Err(PacketError::InvalidMagic)
        ));
    }

    #[test]
    fn test_decode_truncated_header() {
        assert!(matches!(
            PacketHeader::decode(b"wang"),
            Err(PacketError::Truncated {
                needed: HEADER_SIZE,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let mut bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
        bitmaps[0] = bitmap(2, 0xFF);
        let packet = encode_packet(&frames(&bitmaps), ts()).unwrap();

        let result = decode_packet(&packet[..packet.len() - 1]);
        assert!(matches!(
            result,
            Err(PacketError::LengthMismatch {
                declared: 22,
                actual: 21
            })
        ));
    }

    #[test]
    fn test_size_gate() {
        let config = PacketConfig::default();
        assert!(check_packet_size(&vec![0u8; MAX_PACKET_SIZE], &config).is_ok());
        assert!(matches!(
            check_packet_size(&vec![0u8; MAX_PACKET_SIZE + 1], &config),
            Err(PacketError::PayloadTooLarge {
                size: 4161,
                max: 4160
            })
        ));
    }

    #[test]
    fn test_oversize_still_encodes() {
        let bitmaps: [Bitmap; SLOT_COUNT] = std::array::from_fn(|_| bitmap(600, 0));
        let packet = encode_packet(&frames(&bitmaps), ts()).unwrap();

        assert_eq!(packet.len(), HEADER_SIZE + 8 * 600 * HEIGHT);
        assert!(check_packet_size(&packet, &PacketConfig::default()).is_err());
    }
}
