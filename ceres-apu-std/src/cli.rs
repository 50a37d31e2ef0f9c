pub use clap;
use ceres_apu::T_CYCLES_PER_SECOND;
use core::num::NonZeroU32;
use std::path::{Path, PathBuf};

pub const CERES_APU_BIN: &str = "ceres-apu";
const ABOUT: &str = "Runs the Game Boy APU headless from a register script.";
const AFTER_HELP: &str = "Register script format:

    { \"writes\": [ { \"cycle\": 0, \"address\": 65318, \"value\": 128 } ] }

Writes must be sorted by cycle. Set RUST_LOG to filter --trace output.";

#[derive(clap::Parser)]
#[command(name = CERES_APU_BIN, about = ABOUT, after_help = AFTER_HELP)]
pub struct Cli {
    #[arg(help = "JSON register script to play back")]
    script: PathBuf,
    #[arg(
        short,
        long,
        help = "Master cycles to run",
        default_value_t = u64::from(T_CYCLES_PER_SECOND)
    )]
    cycles: u64,
    #[arg(
        short,
        long,
        help = "Write the stereo output as raw signed 16 bit little-endian PCM"
    )]
    output: Option<PathBuf>,
    #[arg(short, long, help = "Write a save state of the final APU state")]
    save_state: Option<PathBuf>,
    #[arg(
        long,
        help = "Cycles between synchronization requests",
        long_help = "Cycles between synchronization requests. A save state is \
           captured at every synchronization point."
    )]
    sync_interval: Option<NonZeroU32>,
    #[arg(long, help = "Log APU events to stderr", default_value_t = false)]
    trace: bool,
}

impl Cli {
    #[must_use]
    #[inline]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    #[inline]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn save_state(&self) -> Option<&Path> {
        self.save_state.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn script(&self) -> &Path {
        &self.script
    }

    #[must_use]
    #[inline]
    pub const fn sync_interval(&self) -> Option<NonZeroU32> {
        self.sync_interval
    }

    #[must_use]
    #[inline]
    pub const fn trace(&self) -> bool {
        self.trace
    }
}
