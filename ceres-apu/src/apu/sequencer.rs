use super::Channels;
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

// 512 Hz divider: length at 256 Hz, sweep at 128 Hz, envelope at 64 Hz
#[derive(Debug, Default)]
pub(super) struct Sequencer {
    step: u8, // 3 bits
}

impl Sequencer {
    pub(super) fn advance(&mut self, channels: &mut Channels) {
        if self.step & 1 == 0 {
            channels.ch1.step_length();
            channels.ch2.step_length();
            channels.ch3.step_length();
            channels.ch4.step_length();
        }

        match self.step {
            2 | 6 => channels.ch1.step_sweep(),
            7 => {
                channels.ch1.step_envelope();
                channels.ch2.step_envelope();
                channels.ch4.step_envelope();
            }
            _ => (),
        }

        self.step = (self.step + 1) & 7;
    }

    pub(super) const fn reset(&mut self) {
        self.step = 0;
    }

    pub(super) const fn step(&self) -> u8 {
        self.step
    }
}

impl Snapshot for Sequencer {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.step = reader.read_u8()? & 7;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_u8(self.step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_expires_on_expected_tick() {
        let mut channels = Channels::default();
        channels.ch1.write(1, 32); // length 64 - 32
        channels.ch1.write(2, 0xF0);
        channels.ch1.write(4, 0xC0);

        let mut sequencer = Sequencer::default();
        // steps 0, 2, 4... clock length, the 32nd clock lands on advance 62
        for tick in 0..256 {
            sequencer.advance(&mut channels);
            assert_eq!(
                channels.ch1.enabled,
                tick < 62,
                "tick {tick}, remaining {}",
                channels.ch1.length.remaining()
            );
        }
    }

    #[test]
    fn envelope_only_on_step_7() {
        let mut channels = Channels::default();
        // volume 15, decrease, period 1
        channels.ch2.write(2, 0xF1);
        channels.ch2.write(4, 0x80);

        let mut sequencer = Sequencer::default();
        for _ in 0..7 {
            sequencer.advance(&mut channels);
        }
        assert_eq!(channels.ch2.envelope_volume(), 15, "steps 0 to 6");

        sequencer.advance(&mut channels);
        assert_eq!(channels.ch2.envelope_volume(), 14, "step 7");
        assert_eq!(sequencer.step(), 0, "wrapped");
    }

    #[test]
    fn sweep_on_steps_2_and_6() {
        let mut channels = Channels::default();
        // pace 1, add, shift 7, frequency 0x100
        channels.ch1.write(0, 0x17);
        channels.ch1.write(2, 0xF0);
        channels.ch1.write(3, 0x00);
        channels.ch1.write(4, 0x81);

        let mut sequencer = Sequencer::default();
        let mut frequencies = [0; 8];
        for frequency in &mut frequencies {
            sequencer.advance(&mut channels);
            *frequency = channels.ch1.frequency();
        }

        assert_eq!(
            frequencies,
            [0x100, 0x100, 0x102, 0x102, 0x102, 0x102, 0x104, 0x104],
            "0x100 >> 7 added on steps 2 and 6"
        );
    }
}
