use bytes::Bytes;
use ledtag_packet::{
    check_packet_size, encode_packet, Bitmap, PacketConfig, SlotFrame, SLOT_COUNT,
};
use ledtag_raster::GlyphRasterizer;

use crate::clock::Clock;
use crate::error::{DesignError, Result};
use crate::slot::{MessageSlot, ResolveConfig};

/// The full device configuration: eight messages in device order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    slots: [MessageSlot; SLOT_COUNT],
}

impl DeviceConfig {
    /// Eight default (inactive) messages.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: [MessageSlot; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[MessageSlot; SLOT_COUNT] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [MessageSlot; SLOT_COUNT] {
        &mut self.slots
    }

    pub fn slot(&self, index: usize) -> Result<&MessageSlot> {
        self.slots
            .get(index)
            .ok_or(DesignError::SlotOutOfRange(index))
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut MessageSlot> {
        self.slots
            .get_mut(index)
            .ok_or(DesignError::SlotOutOfRange(index))
    }

    /// One bitmap per slot; inactive slots get an absent bitmap.
    pub fn resolve_bitmaps<R>(
        &self,
        rasterizer: &R,
        config: &ResolveConfig,
    ) -> Result<[Bitmap; SLOT_COUNT]>
    where
        R: GlyphRasterizer + ?Sized,
    {
        let mut bitmaps: [Bitmap; SLOT_COUNT] = Default::default();
        for (index, (bitmap, slot)) in bitmaps.iter_mut().zip(&self.slots).enumerate() {
            if slot.active {
                *bitmap = slot.resolve_bitmap_with(rasterizer, config)?;
                tracing::trace!(
                    slot = index,
                    width_bytes = bitmap.width_bytes(),
                    "resolved slot"
                );
            }
        }
        Ok(bitmaps)
    }

    /// Serialize with default rasterization tuning.
    pub fn serialize<R, C>(&self, rasterizer: &R, clock: &C) -> Result<Bytes>
    where
        R: GlyphRasterizer + ?Sized,
        C: Clock + ?Sized,
    {
        self.serialize_with(rasterizer, clock, &ResolveConfig::default())
    }

    /// Build the device bytestream.
    ///
    /// An empty result means no active slot produced a bitmap. The result
    /// may exceed the device limit; [`DeviceConfig::program_bytes`] applies
    /// that check.
    pub fn serialize_with<R, C>(
        &self,
        rasterizer: &R,
        clock: &C,
        config: &ResolveConfig,
    ) -> Result<Bytes>
    where
        R: GlyphRasterizer + ?Sized,
        C: Clock + ?Sized,
    {
        let timestamp = clock.now();
        let bitmaps = self.resolve_bitmaps(rasterizer, config)?;
        let frames: [SlotFrame<'_>; SLOT_COUNT] = std::array::from_fn(|i| SlotFrame {
            flash: self.slots[i].flash,
            border: self.slots[i].border,
            speed: self.slots[i].speed,
            animation: self.slots[i].animation,
            bitmap: &bitmaps[i],
        });
        Ok(encode_packet(&frames, timestamp)?)
    }

    /// Serialize and gate the result for programming a device.
    ///
    /// Fails with [`DesignError::EmptyConfiguration`] when there is nothing
    /// to program and with [`PacketError::PayloadTooLarge`] when the packet
    /// does not fit the device.
    pub fn program_bytes<R, C>(
        &self,
        rasterizer: &R,
        clock: &C,
        packet: &PacketConfig,
    ) -> Result<Bytes>
    where
        R: GlyphRasterizer + ?Sized,
        C: Clock + ?Sized,
    {
        let bytes = self.serialize(rasterizer, clock)?;
        if bytes.is_empty() {
            return Err(DesignError::EmptyConfiguration);
        }
        check_packet_size(&bytes, packet)?;
        tracing::info!(size = bytes.len(), "design ready to program");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use ledtag_packet::{
        decode_packet, Animation, DeviceTimestamp, PacketError, PacketHeader, Speed, HEADER_SIZE,
        HEIGHT, MAGIC,
    };
    use ledtag_raster::MonoFontRasterizer;

    use super::*;
    use crate::clock::{FixedClock, LocalClock};
    use crate::slot::tests::MockRasterizer;

    fn clock() -> FixedClock {
        FixedClock(DeviceTimestamp::new(2024, 5, 17, 9, 41, 3))
    }

    fn inline(width_bytes: usize) -> MessageSlot {
        let bitmap = Bitmap::from_raw(vec![0xAAu8; width_bytes * HEIGHT]).unwrap();
        MessageSlot::with_bitmap(bitmap)
    }

    #[test]
    fn all_inactive_serializes_to_nothing() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[3] = inline(2);
        config.slots_mut()[3].active = false;

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn active_slots_without_content_serialize_to_nothing() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = MessageSlot::with_text("");

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        assert!(bytes.is_empty());
        assert!(matches!(
            config.program_bytes(&MonoFontRasterizer, &clock(), &PacketConfig::default()),
            Err(DesignError::EmptyConfiguration)
        ));
    }

    #[test]
    fn single_inline_slot() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[4] = inline(3);

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        let header = PacketHeader::decode(&bytes).unwrap();

        assert_eq!(header.lengths, [0, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(bytes.len() - HEADER_SIZE, 3 * HEIGHT);
    }

    #[test]
    fn header_constants_and_padding() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = MessageSlot::with_text("Hello");

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();

        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(&bytes[4..6], &[0, 0]);
        assert_eq!(&bytes[32..36], &[0, 0, 0, 0]);
        assert!(bytes[44..64].iter().all(|b| *b == 0));
        assert_eq!(&bytes[36..44], &clock().now().to_bits().to_be_bytes());
    }

    #[test]
    fn flags_are_independent_of_active() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = inline(1);
        config.slots_mut()[2].flash = true;
        config.slots_mut()[5].border = true;
        config.slots_mut()[7].flash = true;
        config.slots_mut()[7].border = true;

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        let header = PacketHeader::decode(&bytes).unwrap();

        assert_eq!(header.flash, 0b1000_0100);
        assert_eq!(header.border, 0b1010_0000);
    }

    #[test]
    fn mode_bytes_follow_slot_settings() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = inline(1);
        config.slots_mut()[0].speed = Speed::MAX;
        config.slots_mut()[0].animation = Animation::Rotate;
        config.slots_mut()[1].speed = Speed::MIN;
        config.slots_mut()[1].animation = Animation::Left;
        config.slots_mut()[2].animation = Animation::Laser;

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        let header = PacketHeader::decode(&bytes).unwrap();

        assert_eq!(header.modes[0], 0xFA);
        assert_eq!(header.modes[1], 0x00);
        assert_eq!(header.modes[2], 0x38);
        assert_eq!(header.modes[3], 0x30);
    }

    #[test]
    fn payload_follows_slot_order() {
        let mut config = DeviceConfig::new();
        let first = Bitmap::from_raw(vec![1u8; HEIGHT]).unwrap();
        let second = Bitmap::from_raw(vec![6u8; 2 * HEIGHT]).unwrap();
        config.slots_mut()[1] = MessageSlot::with_bitmap(first);
        config.slots_mut()[6] = MessageSlot::with_bitmap(second);

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        let decoded = decode_packet(&bytes).unwrap();

        assert_eq!(decoded.bitmaps[1].as_bytes(), &[1u8; HEIGHT]);
        assert_eq!(decoded.bitmaps[6].as_bytes(), &[6u8; 2 * HEIGHT]);
        assert!(bytes[HEADER_SIZE..HEADER_SIZE + HEIGHT].iter().all(|b| *b == 1));
    }

    #[test]
    fn oversize_is_flagged_but_still_serialized() {
        let slots: [MessageSlot; SLOT_COUNT] = std::array::from_fn(|_| inline(600));
        let config = DeviceConfig::from_slots(slots);

        let bytes = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 8 * 600 * HEIGHT);

        let err = config
            .program_bytes(&MonoFontRasterizer, &clock(), &PacketConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DesignError::Packet(PacketError::PayloadTooLarge { max: 4160, .. })
        ));
    }

    #[test]
    fn program_bytes_passes_small_designs() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = MessageSlot::with_text("OK");

        let bytes = config
            .program_bytes(&MonoFontRasterizer, &clock(), &PacketConfig::default())
            .unwrap();
        assert_eq!(bytes, config.serialize(&MonoFontRasterizer, &clock()).unwrap());
    }

    #[test]
    fn inactive_slots_are_not_rasterized() {
        let rasterizer = MockRasterizer::new(8, 8);
        let mut config = DeviceConfig::new();
        config.slots_mut()[0] = MessageSlot::with_text("on");
        config.slots_mut()[1] = MessageSlot::with_text("off");
        config.slots_mut()[1].active = false;

        let bitmaps = config
            .resolve_bitmaps(&rasterizer, &ResolveConfig::default())
            .unwrap();

        assert_eq!(rasterizer.requests.borrow().len(), 1);
        assert_eq!(bitmaps[0].width_bytes(), 1);
        assert!(bitmaps[1].is_absent());
    }

    #[test]
    fn serialization_differs_only_in_timestamp() {
        let mut config = DeviceConfig::new();
        config.slots_mut()[2] = MessageSlot::with_text("time");

        let a = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        let b = config.serialize(&MonoFontRasterizer, &clock()).unwrap();
        assert_eq!(a, b);

        let live = config.serialize(&MonoFontRasterizer, &LocalClock).unwrap();
        assert_eq!(live.len(), a.len());
        assert_eq!(&live[..36], &a[..36]);
        assert_eq!(&live[44..], &a[44..]);
    }

    #[test]
    fn slot_index_is_checked() {
        let mut config = DeviceConfig::new();
        assert!(config.slot(7).is_ok());
        assert!(matches!(config.slot(8), Err(DesignError::SlotOutOfRange(8))));
        assert!(matches!(
            config.slot_mut(9),
            Err(DesignError::SlotOutOfRange(9))
        ));
    }
}
