use super::{Apu, AudioCallback};
use crate::{
    Mmio, NR10, NR14, NR24, NR30, NR34, NR44, NR50, NR51, NR52, REGISTERS_END, REGISTERS_START,
    WAVE_RAM_END, WAVE_RAM_START,
    mmio::{NOISE_START, SQUARE2_START},
};
use tracing::debug;

// Bits that always read back as 1, indexed from 0xFF10
static UNUSABLE_BITS: [u8; 0x30] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10..=NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // NR20..=NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30..=NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // NR40..=NR44
    0x00, 0x00, 0x70, // NR50..=NR52
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // unmapped
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // wave RAM
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

impl<A: AudioCallback> Mmio for Apu<A> {
    #[inline]
    fn read(&self, addr: u16) -> u8 {
        if !(REGISTERS_START..=REGISTERS_END).contains(&addr) {
            return 0xFF;
        }

        let core = &self.core;
        if addr == NR52 {
            return (u8::from(core.mixer.enabled()) << 7) | 0x70 | core.channels.active();
        }

        let index = usize::from(addr - REGISTERS_START);
        core.registers[index] | UNUSABLE_BITS[index]
    }

    #[inline]
    fn write(&mut self, addr: u16, val: u8) {
        if !(REGISTERS_START..=REGISTERS_END).contains(&addr) {
            return;
        }

        self.core.registers[usize::from(addr - REGISTERS_START)] = val;

        if addr == NR52 {
            self.write_nr52(val);
            return;
        }

        let core = &mut self.core;
        // wave RAM stays writable while powered off
        if !core.mixer.enabled() && addr < WAVE_RAM_START {
            return;
        }

        match addr {
            NR10..=NR14 => core.channels.ch1.write(addr - NR10, val),
            SQUARE2_START..=NR24 => core.channels.ch2.write(addr - SQUARE2_START, val),
            NR30..=NR34 => core.channels.ch3.write(addr - NR30, val),
            NOISE_START..=NR44 => core.channels.ch4.write(addr - NOISE_START, val),
            NR50 => core.mixer.write_nr50(val),
            NR51 => core.mixer.write_nr51(val),
            WAVE_RAM_START..=WAVE_RAM_END => {
                core.channels.ch3.write_pattern(addr - WAVE_RAM_START, val);
            }
            _ => (),
        }
    }
}

impl<A: AudioCallback> Apu<A> {
    fn write_nr52(&mut self, val: u8) {
        let enabled = val & 0x80 != 0;
        let was_enabled = self.core.mixer.enabled();
        self.core.mixer.set_enabled(enabled);

        match (enabled, was_enabled) {
            (true, true) => (),
            (true, false) => {
                self.core.sequencer.reset();
                debug!(target: "apu", "powered on");
            }
            (false, true) => {
                self.power_off();
                debug!(target: "apu", "powered off");
            }
            (false, false) => self.power_off(),
        }
    }

    // wave RAM and the shadow bank survive
    fn power_off(&mut self) {
        let core = &mut self.core;
        core.channels.power();
        core.mixer.power();
        core.sequencer.reset();
    }
}
