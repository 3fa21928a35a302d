use anyhow::{Context, Result};
use clap::Parser;
use srtsync::config::{Config, TextEncoding};
use srtsync::interactive::run_interactive_wizard;
use srtsync::pipeline::{derive_output_name, print_summary, resynchronize_file_with, ResyncConfig};
use srtsync::subtitle::{difference_between, parse_offset, ShiftPolicy};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "srtsync")]
#[command(version, about = "Shift SubRip subtitle timing by a constant offset")]
#[command(long_about = "Resynchronize an .srt file by moving every timestamp by the same amount. \
Run without arguments for an interactive wizard.")]
struct Cli {
    /// Subtitle file to resynchronize (omit to start the interactive wizard)
    input: Option<PathBuf>,

    /// Offset in milliseconds (1500, -250) or as a signed timestamp (-00:00:02,500)
    #[arg(short, long, allow_hyphen_values = true, conflicts_with_all = ["from", "to"])]
    shift: Option<String>,

    /// A cue's current start time, used with --to to derive the offset
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Where that cue should start instead
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Output file or directory (defaults to <input>.resync.srt next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Text encoding label, e.g. windows-1250, utf-8 (defaults to the configured encoding)
    #[arg(short, long)]
    encoding: Option<String>,

    /// File name to use when the output is a directory
    #[arg(short, long)]
    name: Option<String>,

    /// Fail instead of clamping when a timestamp would leave 00:00:00,000..99:59:59,999
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn resolve_offset(cli: &Cli) -> Result<i64> {
    match (&cli.shift, &cli.from, &cli.to) {
        (Some(shift), _, _) => Ok(parse_offset(shift)?),
        (None, Some(from), Some(to)) => difference_between(to, from)
            .context("--from and --to must be timestamps like 00:01:02,345"),
        _ => anyhow::bail!("No offset given. Use --shift <OFFSET> or --from <TS> --to <TS>"),
    }
}

/// Directory the output is written into when no --output is given.
fn default_destination(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ref label) = cli.encoding {
        config.encoding = label
            .parse::<TextEncoding>()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if cli.strict {
        config.shift_policy = ShiftPolicy::Reject;
    }
    config.validate().context("Configuration validation failed")?;

    let Some(input) = cli.input.clone() else {
        let wizard = run_interactive_wizard(&config)?;
        let result =
            resynchronize_file_with(&wizard.input, &wizard.output_dir, &wizard.resync_config)?;
        print_summary(&result);
        return Ok(());
    };

    let offset_ms = resolve_offset(&cli)?;

    let mut resync_config = ResyncConfig::from_config(&config, offset_ms);
    let dest = match cli.output {
        Some(ref output) => {
            resync_config.output_name = cli.name.clone();
            output.clone()
        }
        None => {
            resync_config.output_name =
                Some(cli.name.clone().unwrap_or_else(|| derive_output_name(&input)));
            default_destination(&input)
        }
    };

    info!("Input:    {}", input.display());
    info!("Output:   {}", dest.display());
    info!("Encoding: {}", resync_config.encoding);
    info!("Policy:   {}", resync_config.policy);

    let result = resynchronize_file_with(&input, &dest, &resync_config)
        .with_context(|| format!("Failed to resynchronize {}", input.display()))?;
    print_summary(&result);

    Ok(())
}
