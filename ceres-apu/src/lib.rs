//! # Ceres APU
//!
//! A cycle accurate emulation of the Game Boy audio processing unit. The unit
//! contains four sound generators (two square channels, one of them with a
//! frequency sweep, a programmable wave channel and a noise channel), the frame
//! sequencer that clocks their length counters, envelopes and sweep, and the
//! mixer that combines them into a stereo sample once every master cycle.
//!
//! The APU never owns the rest of the machine. A host drives it through three
//! seams:
//!
//! - [`Mmio`]: the bus dispatches reads and writes in `0xFF10..=0xFF3F` to it.
//! - [`Scheduler`]: [`Apu::enter`] runs cycles until the APU has caught up with
//!   the CPU or the scheduler requests a synchronization point.
//! - [`AudioCallback`]: receives one [`Frame`] per master cycle.
//!
//! ```rust,ignore
//! use ceres_apu::{Apu, ExitReason, Mmio, SyncMode};
//!
//! let mut apu = Apu::new(sink);
//! apu.write(0xFF26, 0x80);
//! apu.add_cpu_cycles(4);
//! assert_eq!(apu.enter(&SyncMode::None), ExitReason::Yield);
//! ```
//!
//! ## Tracing
//!
//! Power transitions, channel shutdowns caused by the sweep unit and save state
//! operations are reported through the `tracing` crate under the `apu` target.

extern crate alloc;

mod apu;
mod error;
mod mmio;
mod scheduler;
mod state;

pub use {
    apu::{Apu, AudioCallback, Frame, Sample},
    error::Error,
    mmio::{
        Mmio, NR10, NR11, NR12, NR13, NR14, NR21, NR22, NR23, NR24, NR30, NR31, NR32, NR33, NR34,
        NR41, NR42, NR43, NR44, NR50, NR51, NR52, REGISTERS_END, REGISTERS_START, WAVE_RAM_END,
        WAVE_RAM_START,
    },
    scheduler::{ExitReason, Scheduler, SyncMode},
};

/// Master clock frequency, the APU runs one step per tick.
pub const T_CYCLES_PER_SECOND: u32 = 0x40_0000;
