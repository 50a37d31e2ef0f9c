use super::{
    frequency_timer::FrequencyTimer,
    length_counter::{LengthCalculationResult, LengthCounter},
};
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

const WAVE_RAM_SIZE: usize = 0x10;
const WAVE_SAMPLE_SIZE: usize = WAVE_RAM_SIZE * 2;
// a shift of 4 empties any nibble
const MUTE_SHIFT: u8 = 4;

pub(super) struct Wave {
    pub(super) enabled: bool,
    pub(super) length: LengthCounter<256>,
    dac_enabled: bool,
    frequency: FrequencyTimer<2, ()>,

    output: u8,
    pattern: [u8; WAVE_SAMPLE_SIZE], // one nibble per entry
    position: u8,                    // 5 bits
    sample: u8,
    volume_shift: u8,
}

impl Default for Wave {
    fn default() -> Self {
        Self {
            enabled: false,
            length: LengthCounter::default(),
            dac_enabled: false,
            frequency: FrequencyTimer::default(),
            output: 0,
            pattern: [0; WAVE_SAMPLE_SIZE],
            position: 0,
            sample: 0,
            volume_shift: MUTE_SHIFT,
        }
    }
}

impl Wave {
    // wave RAM survives the APU being powered off
    pub(super) fn power(&mut self) {
        let pattern = self.pattern;
        *self = Self {
            pattern,
            ..Self::default()
        };
    }

    pub(super) fn write(&mut self, offset: u16, val: u8) {
        match offset {
            0 => {
                self.dac_enabled = val & 0x80 != 0;
                if !self.dac_enabled {
                    self.enabled = false;
                }
            }
            1 => self.length.write_len(val),
            2 => {
                self.volume_shift = match (val >> 5) & 3 {
                    0 => MUTE_SHIFT,
                    1 => 0,
                    2 => 1,
                    _ => 2,
                };
            }
            3 => self.frequency.write_low(val),
            4 => {
                self.length.write_enabled(val);
                self.frequency.write_high(val);

                if val & 0x80 != 0 {
                    self.enabled = self.dac_enabled;
                    self.frequency.restart();
                    self.position = 0;
                    self.length.trigger();
                }
            }
            _ => (),
        }
    }

    pub(super) fn write_pattern(&mut self, offset: u16, val: u8) {
        // upper nibble plays first
        let index = usize::from(offset & 0xF) * 2;
        self.pattern[index] = val >> 4;
        self.pattern[index + 1] = val & 0xF;
    }

    #[cfg(test)]
    pub(super) fn read_pattern(&self, offset: u16) -> u8 {
        let index = usize::from(offset & 0xF) * 2;
        (self.pattern[index] << 4) | self.pattern[index + 1]
    }

    pub(super) fn run(&mut self) {
        if self.frequency.step() {
            self.position = (self.position + 1) & 0x1F;
            self.sample = self.pattern[usize::from(self.position)];
        }

        self.output = if self.enabled {
            self.sample >> self.volume_shift
        } else {
            0
        };
    }

    pub(super) const fn step_length(&mut self) {
        if matches!(self.length.step(), LengthCalculationResult::DisableChannel) {
            self.enabled = false;
        }
    }

    pub(super) const fn output(&self) -> u8 {
        self.output
    }

    pub(super) const fn active(&self) -> bool {
        self.enabled && self.length.remaining() != 0
    }
}

impl Snapshot for Wave {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.enabled = reader.read_bool()?;
        self.length.load(reader)?;
        self.dac_enabled = reader.read_bool()?;
        self.frequency.load(reader)?;
        self.output = reader.read_u8()? & 0xF;
        self.pattern.load(reader)?;
        for nibble in &mut self.pattern {
            *nibble &= 0xF;
        }
        self.position = reader.read_u8()? & 0x1F;
        self.sample = reader.read_u8()? & 0xF;
        self.volume_shift = reader.read_u8()?.min(MUTE_SHIFT);
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_bool(self.enabled);
        self.length.save(writer);
        writer.write_bool(self.dac_enabled);
        self.frequency.save(writer);
        writer.write_u8(self.output);
        self.pattern.save(writer);
        writer.write_u8(self.position);
        writer.write_u8(self.sample);
        writer.write_u8(self.volume_shift);
    }
}
