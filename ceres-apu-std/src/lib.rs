mod cli;
mod console;
mod error;
mod logging;
mod recorder;
mod script;

pub use cli::{CERES_APU_BIN, Cli, clap};
pub use console::{Console, SyncSignal};
pub use error::Error;
pub use logging::init as init_logging;
pub use recorder::PcmRecorder;
pub use script::{Script, TimedWrite};
