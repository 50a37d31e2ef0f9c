use super::{
    envelope::Envelope,
    length_counter::{LengthCalculationResult, LengthCounter},
};
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

const LFSR_RESET: u16 = 0x7FFF;

#[derive(Default)]
pub(super) struct Noise {
    pub(super) enabled: bool,
    pub(super) length: LengthCounter<64>,
    envelope: Envelope,

    clock_shift: u8, // 4 bits
    divisor_code: u8,
    // linear feedback shift register, 15 bits
    lfsr: u16,
    narrow: bool,
    output: u8,
    timer: u32,
}

impl Noise {
    pub(super) fn write(&mut self, offset: u16, val: u8) {
        match offset {
            1 => self.length.write_len(val),
            2 => {
                self.envelope.write(val);
                if !self.envelope.dac_enabled() {
                    self.enabled = false;
                }
            }
            3 => {
                self.clock_shift = val >> 4;
                self.narrow = val & 8 != 0;
                self.divisor_code = val & 7;
                self.timer = self.period();
            }
            4 => {
                self.length.write_enabled(val);

                if val & 0x80 != 0 {
                    self.enabled = self.envelope.dac_enabled();
                    self.envelope.trigger();
                    self.lfsr = LFSR_RESET;
                    self.timer = self.period();
                    self.length.trigger();
                }
            }
            // offset 0 is unmapped
            _ => (),
        }
    }

    const fn period(&self) -> u32 {
        let divisor: u32 = match self.divisor_code {
            0 => 8,
            1 => 16,
            2 => 32,
            3 => 48,
            4 => 64,
            5 => 80,
            6 => 96,
            _ => 112,
        };

        divisor << self.clock_shift
    }

    pub(super) fn run(&mut self) {
        if self.timer != 0 {
            self.timer -= 1;

            if self.timer == 0 {
                self.timer = self.period();

                // clock shifts 14 and 15 receive no clocks
                if self.clock_shift < 14 {
                    let xor_bit = (self.lfsr & 1) ^ ((self.lfsr & 2) >> 1);
                    self.lfsr = (self.lfsr >> 1) | (xor_bit << 14);
                    if self.narrow {
                        self.lfsr = (self.lfsr & !(1 << 6)) | (xor_bit << 6);
                    }
                }
            }
        }

        self.output = if self.enabled && self.lfsr & 1 == 0 {
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

    pub(super) const fn output(&self) -> u8 {
        self.output
    }

    pub(super) const fn active(&self) -> bool {
        self.enabled && self.length.remaining() != 0
    }
}

impl Snapshot for Noise {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.enabled = reader.read_bool()?;
        self.length.load(reader)?;
        self.envelope.load(reader)?;
        self.clock_shift = reader.read_u8()? & 0xF;
        self.divisor_code = reader.read_u8()? & 7;
        self.lfsr = reader.read_u16()? & LFSR_RESET;
        self.narrow = reader.read_bool()?;
        self.output = reader.read_u8()? & 0xF;
        self.timer = reader.read_u32()?;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_bool(self.enabled);
        self.length.save(writer);
        self.envelope.save(writer);
        writer.write_u8(self.clock_shift);
        writer.write_u8(self.divisor_code);
        writer.write_u16(self.lfsr);
        writer.write_bool(self.narrow);
        writer.write_u8(self.output);
        writer.write_u32(self.timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggered(nr43: u8) -> Noise {
        let mut noise = Noise::default();
        noise.write(2, 0xF0);
        noise.write(3, nr43);
        noise.write(4, 0x80);
        noise
    }

    // shifts the LFSR once with the fastest clock (divisor 8, shift 0)
    fn clock(noise: &mut Noise) {
        for _ in 0..8 {
            noise.run();
        }
    }

    #[test]
    fn first_shifts_from_reset() {
        let mut noise = triggered(0x00);
        clock(&mut noise);
        // bits 0 and 1 are equal, a zero enters at bit 14
        assert_eq!(noise.lfsr, 0x3FFF, "15 bit mode");
        assert_eq!(noise.output(), 0, "bit 0 still set");

        let mut narrow = triggered(0x08);
        clock(&mut narrow);
        assert_eq!(narrow.lfsr, 0x3FBF, "7 bit mode also feeds bit 6");
    }

    #[test]
    fn narrow_mode_repeats_every_127_clocks() {
        let mut noise = triggered(0x08);
        let mut history = [0_u8; 254];
        for bit in &mut history {
            clock(&mut noise);
            *bit = u8::from(noise.lfsr & 1 == 0);
        }
        assert_eq!(history[..127], history[127..], "7 bit period");
    }

    #[test]
    fn high_clock_shifts_freeze_lfsr() {
        let mut noise = triggered(0xE0);
        for _ in 0..(8 << 14) * 2 {
            noise.run();
        }
        assert_eq!(noise.lfsr, LFSR_RESET, "shift 14 never clocks");
    }

    #[test]
    fn amplitude_from_shifted_out_bit() {
        let mut noise = triggered(0x00);
        // 0x7FFF needs 15 clocks before a zero reaches bit 0
        for _ in 0..14 {
            clock(&mut noise);
            assert_eq!(noise.output(), 0, "ones are silent");
        }
        clock(&mut noise);
        assert_eq!(noise.output(), 0xF, "zero bit outputs the envelope volume");
    }
}
