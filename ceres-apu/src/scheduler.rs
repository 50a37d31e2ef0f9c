/// What the scheduler currently expects from the component threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Run freely, interleaving with the CPU.
    #[default]
    None,
    /// Every component must stop at its next cycle boundary, used to pause,
    /// save or load the whole system at a deterministic point.
    All,
}

/// Why [`crate::Apu::enter`] handed control back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The scheduler asked for a synchronization point, no cycle was run since
    /// the request was observed.
    SynchronizeEvent,
    /// The APU caught up with the CPU, control goes back to the CPU thread.
    Yield,
}

pub trait Scheduler {
    fn sync_mode(&self) -> SyncMode;
}

impl Scheduler for SyncMode {
    #[inline]
    fn sync_mode(&self) -> SyncMode {
        *self
    }
}
