use anyhow::Context;
use ceres_apu_std::{Cli, Console, PcmRecorder, Script, clap::Parser, init_logging};
use std::{fs::File, io::BufWriter};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.trace())?;

    let script = Script::from_path(args.script())
        .with_context(|| format!("loading {}", args.script().display()))?;

    let recorder = PcmRecorder::default();
    let mut console = Console::new(script, recorder.clone(), args.sync_interval());
    console.run(args.cycles());
    info!(
        cycles = console.cycle(),
        frames = recorder.frames(),
        syncs = console.syncs(),
        "finished"
    );

    if let Some(path) = args.output() {
        let mut writer = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        recorder.write_raw(&mut writer)?;
    }

    if let Some(path) = args.save_state() {
        std::fs::write(path, console.save_state())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
