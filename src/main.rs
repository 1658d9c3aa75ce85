use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Convert a Standard MIDI File into a flat text log of note on/off events.
///
/// Each output line has the form [time in ms][note][1 for on, 0 for off].
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The input .mid (or RIFF-wrapped .rmi) file.
    input: PathBuf,

    /// Output path; defaults to the input path with a .txt extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v for debug output).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("txt"));
    let summary = mid2txt::convert(&args.input, &output)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    if !summary.clean {
        log::warn!("input was damaged; the log may be incomplete");
    }
    println!(
        "{}: {} events from {} tracks",
        output.display(),
        summary.events,
        summary.tracks
    );
    Ok(())
}
