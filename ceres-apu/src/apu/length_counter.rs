use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

pub(super) enum LengthCalculationResult {
    DisableChannel,
    None,
}

// MAX is the reload value on trigger, 64 for all channels except wave, which is 256
#[derive(Default, Debug)]
pub(super) struct LengthCounter<const MAX: u16> {
    enabled: bool,
    remaining: u16,
}

impl<const MAX: u16> LengthCounter<MAX> {
    pub(super) const fn remaining(&self) -> u16 {
        self.remaining
    }

    pub(super) const fn write_enabled(&mut self, val: u8) {
        self.enabled = val & 0x40 != 0;
    }

    pub(super) const fn write_len(&mut self, val: u8) {
        self.remaining = MAX - (val as u16 & (MAX - 1));
    }

    pub(super) const fn trigger(&mut self) {
        if self.remaining == 0 {
            self.remaining = MAX;
        }
    }

    pub(super) const fn step(&mut self) -> LengthCalculationResult {
        if self.enabled && self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                return LengthCalculationResult::DisableChannel;
            }
        }

        LengthCalculationResult::None
    }

    #[cfg(test)]
    pub(super) const fn set_remaining(&mut self, remaining: u16) {
        self.remaining = remaining;
    }
}

impl<const MAX: u16> Snapshot for LengthCounter<MAX> {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.enabled = reader.read_bool()?;
        self.remaining = reader.read_u16()?.min(MAX);
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_bool(self.enabled);
        writer.write_u16(self.remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_counter_never_expires() {
        for len in 0..64 {
            let mut counter = LengthCounter::<64>::default();
            counter.write_len(len);
            let before = counter.remaining();

            for _ in 0..128 {
                assert!(
                    matches!(counter.step(), LengthCalculationResult::None),
                    "length {len} expired while disabled"
                );
            }
            assert_eq!(counter.remaining(), before, "length {len} moved while disabled");
        }
    }

    #[test]
    fn expires_exactly_once() {
        let mut counter = LengthCounter::<64>::default();
        counter.write_enabled(0x40);
        counter.write_len(62);
        assert_eq!(counter.remaining(), 2, "64 - 62");

        assert!(matches!(counter.step(), LengthCalculationResult::None), "1 left");
        assert!(
            matches!(counter.step(), LengthCalculationResult::DisableChannel),
            "reached zero"
        );
        for _ in 0..8 {
            assert!(
                matches!(counter.step(), LengthCalculationResult::None),
                "idle at zero"
            );
        }
    }

    #[test]
    fn trigger_reloads_only_when_expired() {
        let mut wave = LengthCounter::<256>::default();
        wave.trigger();
        assert_eq!(wave.remaining(), 256, "reload to max");

        wave.write_len(0xFF);
        wave.trigger();
        assert_eq!(wave.remaining(), 1, "kept when not zero");
    }
}
