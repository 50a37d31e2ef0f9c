use crate::{Error, PcmRecorder, Script};
use ceres_apu::{Apu, ExitReason, Mmio, Scheduler, SyncMode};
use core::{
    num::NonZeroU32,
    sync::atomic::{AtomicBool, Ordering::Relaxed},
};
use tracing::{debug, trace};

// one video frame worth of cycles
const MAX_SLICE: u32 = 70224;

/// Scheduler side of the APU thread, raised when the host wants the APU to stop
/// at the next cycle boundary.
#[derive(Default)]
pub struct SyncSignal {
    pending: AtomicBool,
}

impl SyncSignal {
    #[inline]
    pub fn clear(&self) {
        self.pending.store(false, Relaxed);
    }

    #[must_use]
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Relaxed)
    }

    #[inline]
    pub fn request(&self) {
        self.pending.store(true, Relaxed);
    }
}

impl Scheduler for SyncSignal {
    #[inline]
    fn sync_mode(&self) -> SyncMode {
        if self.is_pending() {
            SyncMode::All
        } else {
            SyncMode::None
        }
    }
}

/// Headless machine: plays back a register script in place of the CPU and
/// runs the APU in slices between writes.
pub struct Console {
    apu: Apu<PcmRecorder>,
    cycle: u64,
    next_sync: Option<u64>,
    next_write: usize,
    script: Script,
    sync: SyncSignal,
    sync_interval: Option<NonZeroU32>,
    sync_state: Vec<u8>,
    syncs: u32,
}

impl Console {
    #[must_use]
    #[inline]
    pub fn new(script: Script, recorder: PcmRecorder, sync_interval: Option<NonZeroU32>) -> Self {
        Self {
            apu: Apu::new(recorder),
            cycle: 0,
            next_sync: sync_interval.map(|interval| u64::from(interval.get())),
            next_write: 0,
            script,
            sync: SyncSignal::default(),
            sync_interval,
            sync_state: Vec::new(),
            syncs: 0,
        }
    }

    #[must_use]
    #[inline]
    pub const fn apu(&self) -> &Apu<PcmRecorder> {
        &self.apu
    }

    #[must_use]
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Restores the APU from a save state. The script position and cycle count
    /// are host side and not affected.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is invalid.
    #[inline]
    pub fn load_state(&mut self, state: &[u8]) -> Result<(), Error> {
        self.apu.load_state(state).map_err(Error::Apu)
    }

    #[must_use]
    #[inline]
    pub const fn recorder(&self) -> &PcmRecorder {
        self.apu.audio_callback()
    }

    /// Runs `cycles` master cycles, applying every script write as its cycle
    /// comes up.
    #[inline]
    pub fn run(&mut self, cycles: u64) {
        let end = self.cycle.saturating_add(cycles);

        while self.cycle < end {
            self.apply_due_writes();

            if self.next_sync.is_some_and(|next| next <= self.cycle) {
                self.sync.request();
                self.next_sync = self
                    .sync_interval
                    .map(|interval| self.cycle + u64::from(interval.get()));
            }

            let slice = self.next_slice(end);
            self.apu.add_cpu_cycles(slice);
            while let ExitReason::SynchronizeEvent = self.apu.enter(&self.sync) {
                self.synchronize();
            }
            self.cycle += u64::from(slice);
        }
    }

    #[must_use]
    #[inline]
    pub fn save_state(&self) -> Vec<u8> {
        let mut state = Vec::new();
        self.apu.save_state(&mut state);
        state
    }

    /// State captured at the most recent synchronization point, empty if none
    /// happened yet.
    #[must_use]
    #[inline]
    pub fn sync_state(&self) -> &[u8] {
        &self.sync_state
    }

    #[must_use]
    #[inline]
    pub const fn syncs(&self) -> u32 {
        self.syncs
    }

    fn apply_due_writes(&mut self) {
        while let Some(write) = self.script.writes().get(self.next_write) {
            if write.cycle > self.cycle {
                break;
            }

            trace!(
                cycle = self.cycle,
                address = write.address,
                value = write.value,
                "register write"
            );
            self.apu.write(write.address, write.value);
            self.next_write += 1;
        }
    }

    fn next_slice(&self, end: u64) -> u32 {
        let mut limit = end;
        if let Some(write) = self.script.writes().get(self.next_write) {
            limit = limit.min(write.cycle);
        }
        if let Some(next) = self.next_sync {
            limit = limit.min(next);
        }

        u32::try_from(limit - self.cycle).map_or(MAX_SLICE, |slice| slice.min(MAX_SLICE))
    }

    fn synchronize(&mut self) {
        self.sync_state.clear();
        self.apu.save_state(&mut self.sync_state);
        self.syncs += 1;
        self.sync.clear();
        debug!(cycle = self.cycle, syncs = self.syncs, "synchronized");
    }
}
