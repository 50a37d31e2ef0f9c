use super::sweep::{SweepCalculationResult, SweepTrait};
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

pub(super) enum FrequencyCalculationResult {
    DisableChannel,
    None,
}

// Counts master cycles down to the next waveform step. A timer at zero is
// stopped until the channel is triggered.
#[derive(Default)]
pub(super) struct FrequencyTimer<const PERIOD_MUL: u16, Sweep: SweepTrait> {
    frequency: u16, // 11 bit
    sweep: Sweep,
    timer: u16,
}

impl<const PERIOD_MUL: u16, S: SweepTrait> FrequencyTimer<PERIOD_MUL, S> {
    pub(super) fn write_sweep(&mut self, val: u8) -> FrequencyCalculationResult {
        let result = self.sweep.write(val);
        self.apply(result)
    }

    #[cfg(test)]
    pub(super) const fn frequency(&self) -> u16 {
        self.frequency
    }

    pub(super) const fn write_low(&mut self, val: u8) {
        self.frequency = (self.frequency & 0x700) | val as u16;
    }

    pub(super) const fn write_high(&mut self, val: u8) {
        self.frequency = ((val as u16 & 7) << 8) | (self.frequency & 0xFF);
    }

    pub(super) fn trigger(&mut self) -> FrequencyCalculationResult {
        self.timer = Self::period(self.frequency);
        let result = self.sweep.trigger(self.frequency);
        self.apply(result)
    }

    // true when the waveform advances this cycle
    pub(super) const fn step(&mut self) -> bool {
        if self.timer == 0 {
            return false;
        }

        self.timer -= 1;
        if self.timer == 0 {
            self.timer = Self::period(self.frequency);
            return true;
        }

        false
    }

    pub(super) fn step_sweep(&mut self) -> FrequencyCalculationResult {
        let result = self.sweep.step();
        self.apply(result)
    }

    const fn apply(&mut self, result: SweepCalculationResult) -> FrequencyCalculationResult {
        match result {
            SweepCalculationResult::DisableChannel => FrequencyCalculationResult::DisableChannel,
            SweepCalculationResult::UpdateFrequency { frequency } => {
                self.frequency = frequency;
                self.timer = Self::period(frequency);
                FrequencyCalculationResult::None
            }
            SweepCalculationResult::None => FrequencyCalculationResult::None,
        }
    }

    const fn period(frequency: u16) -> u16 {
        const MAX_FREQUENCY: u16 = 0x800; // 2^11
        PERIOD_MUL * (MAX_FREQUENCY - frequency)
    }
}

impl<const PERIOD_MUL: u16> FrequencyTimer<PERIOD_MUL, ()> {
    // no sweep to consult, a trigger only reloads the period
    pub(super) const fn restart(&mut self) {
        self.timer = Self::period(self.frequency);
    }
}

impl<const PERIOD_MUL: u16, S: SweepTrait> Snapshot for FrequencyTimer<PERIOD_MUL, S> {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.frequency = reader.read_u16()? & 0x7FF;
        self.timer = reader.read_u16()?;
        self.sweep.load(reader)
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_u16(self.frequency);
        writer.write_u16(self.timer);
        self.sweep.save(writer);
    }
}
