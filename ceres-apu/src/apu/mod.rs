pub use self::audio_callbacks::{AudioCallback, Frame, Sample};
use self::{
    mixer::Mixer,
    noise::Noise,
    sequencer::Sequencer,
    square::{Square1, Square2},
    wave::Wave,
};
use crate::{
    Error, ExitReason, Scheduler, SyncMode, T_CYCLES_PER_SECOND,
    state::{Reader, Snapshot, Writer},
};
use alloc::vec::Vec;
use tracing::debug;

mod audio_callbacks;
mod envelope;
mod frequency_timer;
mod length_counter;
mod mixer;
mod noise;
mod registers;
mod sequencer;
mod square;
mod sweep;
mod wave;

// low 13 bits of the cycle counter, 8192 cycles per sequencer step
const SEQUENCER_MASK: u32 = 0x1FFF;
const REGISTERS_SIZE: usize = 0x30;

#[derive(Default)]
struct Channels {
    ch1: Square1,
    ch2: Square2,
    ch3: Wave,
    ch4: Noise,
}

impl Channels {
    // NR52 bits 0..=3
    fn active(&self) -> u8 {
        u8::from(self.ch1.active())
            | (u8::from(self.ch2.active()) << 1)
            | (u8::from(self.ch3.active()) << 2)
            | (u8::from(self.ch4.active()) << 3)
    }

    fn run(&mut self) {
        self.ch1.run();
        self.ch2.run();
        self.ch3.run();
        self.ch4.run();
    }

    const fn outputs(&self) -> [u8; 4] {
        [
            self.ch1.output(),
            self.ch2.output(),
            self.ch3.output(),
            self.ch4.output(),
        ]
    }

    fn power(&mut self) {
        self.ch1 = Square1::default();
        self.ch2 = Square2::default();
        self.ch3.power();
        self.ch4 = Noise::default();
    }
}

impl Snapshot for Channels {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.ch1.load(reader)?;
        self.ch2.load(reader)?;
        self.ch3.load(reader)?;
        self.ch4.load(reader)
    }

    fn save(&self, writer: &mut Writer<'_>) {
        self.ch1.save(writer);
        self.ch2.save(writer);
        self.ch3.save(writer);
        self.ch4.save(writer);
    }
}

// Everything a save state restores. Loads go into a fresh value that replaces
// the live one only after the whole block parsed.
struct Core {
    channels: Channels,
    // cycles ahead of the CPU, negative while the APU owes cycles
    clock: i64,
    counter: u32,
    mixer: Mixer,
    registers: [u8; REGISTERS_SIZE],
    sequencer: Sequencer,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            channels: Channels::default(),
            clock: 0,
            counter: 0,
            mixer: Mixer::default(),
            registers: [0; REGISTERS_SIZE],
            sequencer: Sequencer::default(),
        }
    }
}

impl Snapshot for Core {
    fn load(&mut self, reader: &mut Reader<'_>) -> Result<(), Error> {
        self.counter = reader.read_u32()? % T_CYCLES_PER_SECOND;
        self.clock = reader.read_i64()?;
        self.sequencer.load(reader)?;
        self.registers.load(reader)?;
        self.mixer.load(reader)?;
        self.channels.load(reader)
    }

    fn save(&self, writer: &mut Writer<'_>) {
        writer.write_u32(self.counter);
        writer.write_i64(self.clock);
        self.sequencer.save(writer);
        self.registers.save(writer);
        self.mixer.save(writer);
        self.channels.save(writer);
    }
}

pub struct Apu<A: AudioCallback> {
    audio_callback: A,
    core: Core,
}

impl<A: AudioCallback> Apu<A> {
    /// Credits cycles the CPU has run, the next [`Self::enter`] runs until the
    /// APU catches up.
    #[inline]
    pub fn add_cpu_cycles(&mut self, cycles: u32) {
        self.core.clock -= i64::from(cycles);
    }

    #[must_use]
    #[inline]
    pub const fn audio_callback(&self) -> &A {
        &self.audio_callback
    }

    #[must_use]
    #[inline]
    pub const fn clock(&self) -> i64 {
        self.core.clock
    }

    /// Free running master cycle counter, wraps every second of emulated time.
    #[must_use]
    #[inline]
    pub const fn counter(&self) -> u32 {
        self.core.counter
    }

    /// Runs the APU thread until it yields to the CPU or the scheduler asks
    /// for a synchronization point. At least one cycle runs per call unless a
    /// synchronization is pending.
    #[inline]
    pub fn enter<S: Scheduler + ?Sized>(&mut self, scheduler: &S) -> ExitReason {
        loop {
            if matches!(scheduler.sync_mode(), SyncMode::All) {
                return ExitReason::SynchronizeEvent;
            }

            self.run_cycle();

            self.core.clock += 1;
            if self.core.clock >= 0 {
                return ExitReason::Yield;
            }
        }
    }

    /// Restores a state produced by [`Self::save_state`].
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is not a save state of a compatible
    /// version. The APU is left untouched on error.
    #[inline]
    pub fn load_state(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.core = Reader::new(buf).load_state()?;
        debug!(target: "apu", counter = self.core.counter, "state loaded");
        Ok(())
    }

    #[must_use]
    #[inline]
    pub fn new(audio_callback: A) -> Self {
        let mut apu = Self {
            audio_callback,
            core: Core::default(),
        };
        apu.power();
        apu
    }

    /// Power on reset: clears every register, the cycle counter and the
    /// sequencer, and resets the channels including wave RAM.
    #[inline]
    pub fn power(&mut self) {
        self.core = Core::default();
        debug!(target: "apu", "power on");
    }

    /// Runs a single master cycle and pushes its frame to the audio callback.
    #[inline]
    pub fn run_cycle(&mut self) {
        let core = &mut self.core;
        if core.counter & SEQUENCER_MASK == 0 {
            core.sequencer.advance(&mut core.channels);
        }

        core.channels.run();
        let frame = core.mixer.run(core.channels.outputs());
        self.audio_callback.audio_sample(frame);

        core.counter += 1;
        if core.counter == T_CYCLES_PER_SECOND {
            core.counter = 0;
        }
    }

    #[inline]
    pub fn save_state(&self, buf: &mut Vec<u8>) {
        Writer::new(buf).save_state(&self.core);
        debug!(target: "apu", counter = self.core.counter, "state saved");
    }

    #[must_use]
    #[inline]
    pub const fn sequencer_step(&self) -> u8 {
        self.core.sequencer.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mmio, NR10, NR11, NR12, NR13, NR14, NR50, NR51, NR52};
    use core::cell::RefCell;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Frame>>);

    impl AudioCallback for Recorder {
        fn audio_sample(&self, frame: Frame) {
            self.0.borrow_mut().push(frame);
        }
    }

    #[test]
    fn one_frame_per_cycle() {
        let mut apu = Apu::new(Recorder::default());
        apu.add_cpu_cycles(100);
        assert_eq!(apu.enter(&SyncMode::None), ExitReason::Yield);
        assert_eq!(apu.audio_callback().0.borrow().len(), 100, "100 cycles owed");
        assert_eq!(apu.counter(), 100);
        assert_eq!(apu.clock(), 0, "caught up with the CPU");
    }

    #[test]
    fn sync_request_stops_before_the_cycle() {
        let mut apu = Apu::new(Recorder::default());
        apu.add_cpu_cycles(10);
        assert_eq!(apu.enter(&SyncMode::All), ExitReason::SynchronizeEvent);
        assert_eq!(apu.counter(), 0, "no cycle ran");
        assert_eq!(apu.clock(), -10, "cycles still owed");

        assert_eq!(apu.enter(&SyncMode::None), ExitReason::Yield);
        assert_eq!(apu.counter(), 10, "resumed");
    }

    #[test]
    fn sequencer_advances_every_8192_cycles() {
        let mut apu = Apu::new(Recorder::default());
        apu.run_cycle();
        assert_eq!(apu.sequencer_step(), 1, "counter 0 advances immediately");

        for _ in 1..8192 {
            apu.run_cycle();
        }
        assert_eq!(apu.sequencer_step(), 1, "no step before 8192");

        apu.run_cycle();
        assert_eq!(apu.sequencer_step(), 2);
    }

    #[test]
    fn counter_wraps_after_one_second() {
        let mut apu = Apu::new(Recorder::default());
        apu.core.counter = T_CYCLES_PER_SECOND - 1;
        apu.run_cycle();
        assert_eq!(apu.counter(), 0);
    }

    #[test]
    #[traced_test]
    fn sweep_overflow_is_traced() {
        let mut apu = Apu::new(Recorder::default());
        apu.write(NR52, 0x80);
        apu.write(NR10, 0x01);
        apu.write(NR12, 0xF0);
        apu.write(NR13, 0xFF);
        apu.write(NR14, 0x87);

        assert_eq!(apu.read(NR52) & 1, 0, "channel 1 disabled on trigger");
        assert!(logs_contain("sweep overflow"));
    }

    #[test]
    fn save_state_round_trip() {
        let mut apu = Apu::new(Recorder::default());
        apu.write(NR52, 0x80);
        apu.write(NR50, 0x77);
        apu.write(NR51, 0xFF);
        apu.write(NR11, 0x80);
        apu.write(NR12, 0xF3);
        apu.write(NR14, 0x86);
        for _ in 0..30_000 {
            apu.run_cycle();
        }

        let mut buf = Vec::new();
        apu.save_state(&mut buf);

        let mut restored = Apu::new(Recorder::default());
        assert_eq!(restored.load_state(&buf), Ok(()));

        for _ in 0..50_000 {
            apu.run_cycle();
            restored.run_cycle();
        }

        let saved = apu.audio_callback().0.borrow();
        let copy = restored.audio_callback().0.borrow();
        assert_eq!(saved[30_000..], copy[..], "same frames after restore");
        assert_eq!(apu.read(NR52), restored.read(NR52));
    }

    #[test]
    fn load_rejects_garbage() {
        let mut apu = Apu::new(Recorder::default());
        assert_eq!(
            apu.load_state(b"NOPE\0\0\0\0"),
            Err(Error::InvalidSaveStateBlock { name: *b"NOPE" })
        );
        assert_eq!(apu.load_state(b"APU "), Err(Error::SaveStateTooShort));

        let mut buf = Vec::new();
        apu.save_state(&mut buf);
        buf.push(0);
        assert_eq!(
            apu.load_state(&buf),
            Err(Error::TrailingSaveStateData { remaining: 1 })
        );

        buf.pop();
        buf[8] = 2;
        assert_eq!(
            apu.load_state(&buf),
            Err(Error::UnsupportedSaveStateVersion { major: 2, minor: 0 })
        );
    }
}
