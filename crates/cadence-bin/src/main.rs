// cadence-trace: replay a recorded key-state trace through the editor input engine.

mod trace;

use std::path::PathBuf;

use anyhow::Result;
use cadence_input::{InputManager, KeybindConfig, RecordingHost};
use clap::Parser;

use trace::{load_trace, run_trace};

#[derive(Parser, Debug)]
#[command(
    name = "cadence-trace",
    about = "Replay a key-state trace and print every dispatched editor action"
)]
struct Args {
    /// Path to a trace JSON file (list of { time_ms, pressed, blocked } frames).
    #[arg(long, required_unless_present = "write_default_config")]
    trace: Option<PathBuf>,

    /// Path to a keybind config JSON file. Defaults are used when omitted or missing.
    #[arg(long, env = "CADENCE_KEYBINDS")]
    config: Option<PathBuf>,

    /// Write the default keybind config to this path and exit.
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        KeybindConfig::default().save_to(path)?;
        log::info!("Wrote default keybinds to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => KeybindConfig::load_from(path)?,
        None => KeybindConfig::default(),
    };
    let mut manager: InputManager<RecordingHost> = InputManager::from_config(&config)?;
    let mut host = RecordingHost::new();

    let Some(trace_path) = &args.trace else {
        return Ok(());
    };
    let frames = load_trace(trace_path)?;
    let events = run_trace(&mut manager, &mut host, &frames)?;

    for event in &events {
        println!("{event}");
    }
    log::info!(
        "{} frames, {} events, {} host calls",
        frames.len(),
        events.len(),
        host.calls.len()
    );
    Ok(())
}
