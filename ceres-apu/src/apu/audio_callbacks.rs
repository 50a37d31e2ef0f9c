pub type Sample = i16;

/// One mixed output sample. `center` is the mono mix of every channel,
/// independent of panning and master volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub(super) center: Sample,
    pub(super) left: Sample,
    pub(super) right: Sample,
}

impl Frame {
    #[must_use]
    #[inline]
    pub const fn new(center: Sample, left: Sample, right: Sample) -> Self {
        Self {
            center,
            left,
            right,
        }
    }

    #[must_use]
    #[inline]
    pub const fn center(self) -> Sample {
        self.center
    }

    #[must_use]
    #[inline]
    pub const fn left(self) -> Sample {
        self.left
    }

    #[must_use]
    #[inline]
    pub const fn right(self) -> Sample {
        self.right
    }
}

/// Host audio sink. Called once per master cycle, buffering and resampling
/// are up to the implementor.
pub trait AudioCallback {
    fn audio_sample(&self, frame: Frame);
}
