use super::{
    envelope::Envelope,
    frequency_timer::{FrequencyCalculationResult, FrequencyTimer},
    length_counter::{LengthCalculationResult, LengthCounter},
    sweep::{Sweep, SweepTrait},
};
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

pub(super) type Square1 = Square<Sweep>;
pub(super) type Square2 = Square<()>;

#[derive(Default)]
pub(super) struct Square<S: SweepTrait> {
    pub(super) enabled: bool,
    pub(super) length: LengthCounter<64>,
    envelope: Envelope,
    frequency: FrequencyTimer<4, S>,

    duty: u8,  // 2 bits
    phase: u8, // 3 bits
    duty_output: bool,
    output: u8,
}

impl<S: SweepTrait> Square<S> {
    pub(super) fn write(&mut self, offset: u16, val: u8) {
        match offset {
            0 => {
                if matches!(
                    self.frequency.write_sweep(val),
                    FrequencyCalculationResult::DisableChannel
                ) {
                    self.enabled = false;
                }
            }
            1 => {
                self.duty = val >> 6;
                self.length.write_len(val);
            }
            2 => {
                self.envelope.write(val);
                if !self.envelope.dac_enabled() {
                    self.enabled = false;
                }
            }
            3 => self.frequency.write_low(val),
            4 => {
                self.length.write_enabled(val);
                self.frequency.write_high(val);

                if val & 0x80 != 0 {
                    self.trigger();
                }
            }
            _ => (),
        }
    }

    fn trigger(&mut self) {
        self.enabled = self.envelope.dac_enabled();
        self.envelope.trigger();

        if matches!(
            self.frequency.trigger(),
            FrequencyCalculationResult::DisableChannel
        ) {
            self.enabled = false;
        }

        self.length.trigger();
    }

    pub(super) fn run(&mut self) {
        // Shape of the duty waveform, bit n is the output at phase n
        const DUTY_WAV: [u8; 4] = [
            0b0100_0000, // ______-_ : 12.5%
            0b1100_0000, // ______-- : 25%
            0b1111_0000, // ____---- : 50%
            0b0011_1111, // ------__ : 75%
        ];

        if self.frequency.step() {
            self.phase = (self.phase + 1) & 7;
            self.duty_output = DUTY_WAV[usize::from(self.duty & 3)] & (1 << self.phase) != 0;
        }

        self.output = if self.enabled && self.duty_output {
            self.envelope.volume()
        } else {
            0
        };
    }

    pub(super) const fn step_length(&mut self) {
        if matches!(self.length.step(), LengthCalculationResult::DisableChannel) {
            self.enabled = false;
        }
    }

    pub(super) const fn step_envelope(&mut self) {
        if self.enabled {
            self.envelope.step();
        }
    }

    pub(super) fn step_sweep(&mut self) {
        if self.enabled
            && matches!(
                self.frequency.step_sweep(),
                FrequencyCalculationResult::DisableChannel
            )
        {
            self.enabled = false;
        }
    }

    pub(super) const fn output(&self) -> u8 {
        self.output
    }

    pub(super) const fn active(&self) -> bool {
        self.enabled && self.length.remaining() != 0
    }

    #[cfg(test)]
    pub(super) const fn envelope_volume(&self) -> u8 {
        self.envelope.volume()
    }

    #[cfg(test)]
    pub(super) const fn frequency(&self) -> u16 {
        self.frequency.frequency()
    }
}

impl<S: SweepTrait> Snapshot for Square<S> {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.enabled = reader.read_bool()?;
        self.length.load(reader)?;
        self.envelope.load(reader)?;
        self.frequency.load(reader)?;
        self.duty = reader.read_u8()? & 3;
        self.phase = reader.read_u8()? & 7;
        self.duty_output = reader.read_bool()?;
        self.output = reader.read_u8()? & 0xF;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_bool(self.enabled);
        self.length.save(writer);
        self.envelope.save(writer);
        self.frequency.save(writer);
        writer.write_u8(self.duty);
        writer.write_u8(self.phase);
        writer.write_bool(self.duty_output);
        writer.write_u8(self.output);
    }
}
