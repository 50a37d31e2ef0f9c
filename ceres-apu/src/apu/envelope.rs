use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
enum EnvelopeDirection {
    #[default]
    Decrease,
    Increase,
}

impl From<u8> for EnvelopeDirection {
    fn from(val: u8) -> Self {
        if val & 8 == 0 {
            Self::Decrease
        } else {
            Self::Increase
        }
    }
}

impl From<EnvelopeDirection> for u8 {
    fn from(val: EnvelopeDirection) -> Self {
        match val {
            EnvelopeDirection::Decrease => 0,
            EnvelopeDirection::Increase => 8,
        }
    }
}

#[derive(Default, Debug)]
pub(super) struct Envelope {
    direction: EnvelopeDirection,
    period: u8, // 3 bits, 0 disables the envelope
    timer: u8,  // 3 bits
    volume: u8, // 4 bits
    volume_written: u8,
}

impl Envelope {
    // DAC is powered unless the upper 5 bits of NRx2 are clear
    pub(super) const fn dac_enabled(&self) -> bool {
        self.volume_written != 0 || matches!(self.direction, EnvelopeDirection::Increase)
    }

    pub(super) const fn step(&mut self) {
        use EnvelopeDirection::{Decrease, Increase};

        if self.period == 0 {
            return;
        }

        self.timer = self.timer.wrapping_sub(1) & 7;
        if self.timer != 0 {
            return;
        }

        self.timer = self.period;
        match self.direction {
            Increase if self.volume < 0xF => self.volume += 1,
            Decrease if self.volume > 0 => self.volume -= 1,
            Increase | Decrease => (),
        }
    }

    pub(super) const fn trigger(&mut self) {
        self.timer = self.period;
        self.volume = self.volume_written;
    }

    pub(super) const fn volume(&self) -> u8 {
        self.volume
    }

    pub(super) fn write(&mut self, val: u8) {
        self.volume_written = val >> 4;
        self.direction = EnvelopeDirection::from(val);
        self.period = val & 7;
    }
}

impl Snapshot for Envelope {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.direction = EnvelopeDirection::from(reader.read_u8()?);
        self.period = reader.read_u8()? & 7;
        self.timer = reader.read_u8()? & 7;
        self.volume = reader.read_u8()? & 0xF;
        self.volume_written = reader.read_u8()? & 0xF;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_u8(u8::from(self.direction));
        writer.write_u8(self.period);
        writer.write_u8(self.timer);
        writer.write_u8(self.volume);
        writer.write_u8(self.volume_written);
    }
}
