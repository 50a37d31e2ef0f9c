use super::Frame;
use crate::{
    Error,
    state::{Reader, Snapshot, Writer},
};

// channel amplitudes are 4 bit, four of them sum to 0..=60
const DC_OFFSET: i32 = 0x4000;
const AMPLITUDE_STEP: i32 = 0x200;

#[derive(Debug, Default)]
pub(super) struct Mixer {
    enabled: bool,
    left_vin: bool,
    left_volume: u8, // 3 bits
    // NR51: bit n routes channel n + 1 right, bit n + 4 routes it left
    panning: u8,
    right_vin: bool,
    right_volume: u8, // 3 bits
}

impl Mixer {
    pub(super) const fn enabled(&self) -> bool {
        self.enabled
    }

    pub(super) const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(super) fn power(&mut self) {
        *self = Self {
            enabled: self.enabled,
            ..Self::default()
        };
    }

    pub(super) const fn write_nr50(&mut self, val: u8) {
        self.right_volume = val & 7;
        self.right_vin = val & 8 != 0;
        self.left_volume = (val >> 4) & 7;
        self.left_vin = val & 0x80 != 0;
    }

    pub(super) const fn write_nr51(&mut self, val: u8) {
        self.panning = val;
    }

    pub(super) fn run(&self, outputs: [u8; 4]) -> Frame {
        if !self.enabled {
            return Frame::default();
        }

        let mut center = 0;
        let mut left = 0;
        let mut right = 0;

        for (i, out) in outputs.into_iter().enumerate() {
            let out = i32::from(out);
            center += out;
            if self.panning & (0x10 << i) != 0 {
                left += out;
            }
            if self.panning & (1 << i) != 0 {
                right += out;
            }
        }

        Frame {
            center: Self::to_sample(center, 7),
            left: Self::to_sample(left, self.left_volume),
            right: Self::to_sample(right, self.right_volume),
        }
    }

    // centers the 0..=60 sum around zero, scales by volume + 1 out of 8 and
    // halves the result to leave headroom
    fn to_sample(sum: i32, volume: u8) -> i16 {
        let centered = sum * AMPLITUDE_STEP - DC_OFFSET;
        let scaled = centered * (i32::from(volume) + 1) / 8;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "|scaled| <= 0x4000, halved it always fits"
        )]
        {
            (scaled >> 1) as i16
        }
    }
}

impl Snapshot for Mixer {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.enabled = reader.read_bool()?;
        self.left_vin = reader.read_bool()?;
        self.left_volume = reader.read_u8()? & 7;
        self.panning = reader.read_u8()?;
        self.right_vin = reader.read_bool()?;
        self.right_volume = reader.read_u8()? & 7;
        Ok(())
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_bool(self.enabled);
        writer.write_bool(self.left_vin);
        writer.write_u8(self.left_volume);
        writer.write_u8(self.panning);
        writer.write_bool(self.right_vin);
        writer.write_u8(self.right_volume);
    }
}
