use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};
use tracing::trace;

const MAX_FREQUENCY: u16 = 0x7FF;

pub(super) trait SweepTrait: Default + Snapshot {
    fn step(&mut self) -> SweepCalculationResult;
    fn trigger(&mut self, frequency: u16) -> SweepCalculationResult;
    fn write(&mut self, val: u8) -> SweepCalculationResult;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
enum SweepDirection {
    #[default]
    Add = 0,
    Sub = 1,
}

impl From<u8> for SweepDirection {
    fn from(val: u8) -> Self {
        if val & 8 == 0 { Self::Add } else { Self::Sub }
    }
}

impl From<SweepDirection> for u8 {
    fn from(val: SweepDirection) -> Self {
        (val as Self) << 3
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum SweepCalculationResult {
    DisableChannel,
    None,
    UpdateFrequency { frequency: u16 },
}

#[derive(Debug, Default)]
pub(super) struct Sweep {
    dir: SweepDirection,
    enabled: bool,
    // a subtraction was computed since the last trigger
    negate_used: bool,
    pace: u8,             // 3 bits
    shadow_frequency: u16, // between 0 and 0x7FF
    shift: u8,            // 3 bits
    timer: u8,            // 3 bits
}

impl Sweep {
    fn calculate(&mut self, update: bool) -> SweepCalculationResult {
        if !self.enabled {
            return SweepCalculationResult::None;
        }

        self.negate_used = matches!(self.dir, SweepDirection::Sub);

        let delta = self.shadow_frequency >> self.shift;
        let frequency = match self.dir {
            SweepDirection::Add => self.shadow_frequency + delta,
            SweepDirection::Sub => self.shadow_frequency - delta,
        };

        if frequency > MAX_FREQUENCY {
            trace!(target: "apu", frequency, "sweep overflow disables channel 1");
            SweepCalculationResult::DisableChannel
        } else if update && self.shift != 0 {
            self.shadow_frequency = frequency;
            SweepCalculationResult::UpdateFrequency { frequency }
        } else {
            SweepCalculationResult::None
        }
    }
}

impl SweepTrait for Sweep {
    fn step(&mut self) -> SweepCalculationResult {
        if self.pace == 0 {
            return SweepCalculationResult::None;
        }

        self.timer = self.timer.wrapping_sub(1) & 7;
        if self.timer != 0 {
            return SweepCalculationResult::None;
        }

        self.timer = self.pace;

        // hardware computes twice, the second time only to check for overflow
        let updated = self.calculate(true);
        match self.calculate(false) {
            SweepCalculationResult::DisableChannel => SweepCalculationResult::DisableChannel,
            SweepCalculationResult::None | SweepCalculationResult::UpdateFrequency { .. } => {
                updated
            }
        }
    }

    fn trigger(&mut self, frequency: u16) -> SweepCalculationResult {
        self.shadow_frequency = frequency;
        self.timer = self.pace;
        self.enabled = self.pace != 0 || self.shift != 0;
        self.negate_used = false;

        if self.shift == 0 {
            SweepCalculationResult::None
        } else {
            self.calculate(false)
        }
    }

    fn write(&mut self, val: u8) -> SweepCalculationResult {
        let dir = SweepDirection::from(val);
        // leaving subtraction mode after a subtraction was used kills the channel
        let quirk = self.negate_used
            && matches!(self.dir, SweepDirection::Sub)
            && matches!(dir, SweepDirection::Add);

        self.pace = (val >> 4) & 7;
        self.dir = dir;
        self.shift = val & 7;

        if quirk {
            trace!(target: "apu", "sweep negate cleared after subtraction, disabling channel 1");
            SweepCalculationResult::DisableChannel
        } else {
            SweepCalculationResult::None
        }
    }
}

impl Snapshot for Sweep {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.dir = SweepDirection::from(reader.read_u8()?);
        self.enabled = reader.read_bool()?;
        self.negate_used = reader.read_bool()?;
        self.pace = reader.read_u8()? & 7;
        self.shadow_frequency = reader.read_u16()? & MAX_FREQUENCY;
        self.shift = reader.read_u8()? & 7;
        self.timer = reader.read_u8()? & 7;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_u8(u8::from(self.dir));
        writer.write_bool(self.enabled);
        writer.write_bool(self.negate_used);
        writer.write_u8(self.pace);
        writer.write_u16(self.shadow_frequency);
        writer.write_u8(self.shift);
        writer.write_u8(self.timer);
    }
}

// Channel 2 has no sweep unit
impl SweepTrait for () {
    fn step(&mut self) -> SweepCalculationResult {
        SweepCalculationResult::None
    }

    fn trigger(&mut self, _: u16) -> SweepCalculationResult {
        SweepCalculationResult::None
    }

    fn write(&mut self, _: u8) -> SweepCalculationResult {
        SweepCalculationResult::None
    }
}

impl Snapshot for () {
    fn load(&mut self, _: &mut Reader<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn save(&self, _: &mut Writer<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_on_trigger() {
        let mut sweep = Sweep::default();
        // pace 0, add, shift 1
        assert_eq!(sweep.write(0x01), SweepCalculationResult::None);
        assert_eq!(
            sweep.trigger(0x7FF),
            SweepCalculationResult::DisableChannel,
            "0x7FF + 0x3FF overflows"
        );
    }

    #[test]
    fn trigger_check_does_not_commit() {
        let mut sweep = Sweep::default();
        // pace 1, add, shift 1
        sweep.write(0x11);
        assert_eq!(sweep.trigger(0x100), SweepCalculationResult::None);
        assert_eq!(
            sweep.step(),
            SweepCalculationResult::UpdateFrequency { frequency: 0x180 },
            "first step commits 0x100 + 0x80"
        );
    }

    #[test]
    fn second_calculation_detects_overflow() {
        let mut sweep = Sweep::default();
        sweep.write(0x11);
        assert_eq!(sweep.trigger(0x500), SweepCalculationResult::None, "0x780 fits");
        assert_eq!(
            sweep.step(),
            SweepCalculationResult::DisableChannel,
            "0x780 committed, 0x780 + 0x3C0 overflows"
        );
    }

    #[test]
    fn zero_shift_never_updates() {
        let mut sweep = Sweep::default();
        // pace 1, add, shift 0
        sweep.write(0x10);
        assert_eq!(sweep.trigger(0x100), SweepCalculationResult::None);
        for _ in 0..8 {
            assert_eq!(sweep.step(), SweepCalculationResult::None, "shift 0 only checks");
        }
    }

    #[test]
    fn zero_shift_still_checks_overflow() {
        let mut sweep = Sweep::default();
        sweep.write(0x10);
        assert_eq!(sweep.trigger(0x400), SweepCalculationResult::None);
        assert_eq!(
            sweep.step(),
            SweepCalculationResult::DisableChannel,
            "0x400 + 0x400 overflows even without update"
        );
    }

    #[test]
    fn negate_clear_after_subtraction_disables() {
        let mut sweep = Sweep::default();
        // pace 1, sub, shift 1
        sweep.write(0x19);
        assert_eq!(sweep.trigger(0x400), SweepCalculationResult::None);
        assert_eq!(
            sweep.write(0x11),
            SweepCalculationResult::DisableChannel,
            "subtraction was computed on trigger"
        );
    }

    #[test]
    fn negate_clear_without_subtraction_is_harmless() {
        let mut sweep = Sweep::default();
        // pace 1, sub, shift 0: no calculation on trigger
        sweep.write(0x18);
        assert_eq!(sweep.trigger(0x400), SweepCalculationResult::None);
        assert_eq!(sweep.write(0x10), SweepCalculationResult::None);
    }
}
