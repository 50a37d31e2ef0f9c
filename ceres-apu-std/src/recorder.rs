use ceres_apu::{AudioCallback, Frame, Sample};
use std::{
    io::Write,
    sync::{Arc, Mutex},
};

/// Collects the stereo output of the APU as interleaved (left, right) samples.
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct PcmRecorder {
    samples: Arc<Mutex<Vec<Sample>>>,
}

impl PcmRecorder {
    #[must_use]
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.lock().map_or(0, |samples| samples.len() / 2)
    }

    #[must_use]
    #[inline]
    pub fn samples(&self) -> Vec<Sample> {
        self.samples
            .lock()
            .map_or_else(|_| Vec::new(), |samples| samples.clone())
    }

    /// Writes every sample as signed 16 bit little-endian PCM.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    #[inline]
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let bytes: Vec<u8> = self
            .samples()
            .into_iter()
            .flat_map(Sample::to_le_bytes)
            .collect();
        writer.write_all(&bytes)
    }
}

impl AudioCallback for PcmRecorder {
    fn audio_sample(&self, frame: Frame) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.push(frame.left());
            samples.push(frame.right());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_left_and_right() {
        let recorder = PcmRecorder::default();
        recorder.audio_sample(Frame::new(0, 1, -1));
        recorder.audio_sample(Frame::new(0, 0x1234, -0x2000));

        assert_eq!(recorder.frames(), 2);
        assert_eq!(recorder.samples(), [1, -1, 0x1234, -0x2000]);
    }

    #[test]
    fn clones_share_the_buffer() {
        let recorder = PcmRecorder::default();
        recorder.clone().audio_sample(Frame::new(0, 5, 6));
        assert_eq!(recorder.samples(), [5, 6]);
    }

    #[test]
    fn raw_pcm_is_little_endian() {
        let recorder = PcmRecorder::default();
        recorder.audio_sample(Frame::new(0, 0x1234, -2));

        let mut out = Vec::new();
        assert!(recorder.write_raw(&mut out).is_ok(), "writing to a Vec can't fail");
        assert_eq!(out, [0x34, 0x12, 0xFE, 0xFF]);
    }
}
