use crate::config::{Config, TextEncoding};
use crate::error::Result;
use crate::file::{read_document, save_document};
use crate::subtitle::{resynchronize_with, ResyncStats, ShiftPolicy};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Settings for resynchronizing one subtitle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResyncConfig {
    /// Encoding the source is read with and the output is written with.
    pub encoding: TextEncoding,
    /// Signed shift in milliseconds.
    pub offset_ms: i64,
    /// What to do with timestamps pushed out of range.
    pub policy: ShiftPolicy,
    /// File name for the output when the destination is a directory.
    /// Defaults to the source file name.
    pub output_name: Option<String>,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            offset_ms: 0,
            policy: ShiftPolicy::default(),
            output_name: None,
        }
    }
}

impl ResyncConfig {
    pub fn from_config(config: &Config, offset_ms: i64) -> Self {
        Self {
            encoding: config.encoding,
            offset_ms,
            policy: config.shift_policy,
            output_name: None,
        }
    }
}

/// Result of resynchronizing a file.
#[derive(Debug, Clone)]
pub struct ResyncResult {
    /// File that was written.
    pub output_path: PathBuf,
    /// Offset that was applied.
    pub offset_ms: i64,
    /// Line and timestamp counters.
    pub stats: ResyncStats,
    /// Wall time for read, shift and write.
    pub elapsed: Duration,
}

/// Read `source`, shift it by `offset_ms`, and save it to `dest` as `output_name`.
///
/// Out-of-range timestamps are clamped. See [`resynchronize_file_with`] for the
/// strict variant.
pub fn resynchronize_file(
    source: &Path,
    source_encoding: TextEncoding,
    offset_ms: i64,
    dest: &Path,
    output_name: Option<&str>,
) -> Result<ResyncResult> {
    let config = ResyncConfig {
        encoding: source_encoding,
        offset_ms,
        policy: ShiftPolicy::Clamp,
        output_name: output_name.map(str::to_string),
    };
    resynchronize_file_with(source, dest, &config)
}

/// Read `source`, shift it as described by `config`, and save it to `dest`.
pub fn resynchronize_file_with(
    source: &Path,
    dest: &Path,
    config: &ResyncConfig,
) -> Result<ResyncResult> {
    let start_time = Instant::now();

    info!("Shifting {:?} by {}ms", source, config.offset_ms);
    let document = read_document(source, config.encoding)?;

    let (shifted, stats) = resynchronize_with(&document, config.offset_ms, config.policy)?;
    if stats.clamped > 0 {
        warn!(
            "{} timestamps were clamped to the valid range",
            stats.clamped
        );
    }

    let shifted = match &config.output_name {
        Some(name) => shifted.into_owned().with_name(name.clone()),
        None => shifted.into_owned(),
    };

    let output_path = save_document(&shifted, dest)?;

    let elapsed = start_time.elapsed();
    info!(
        "Wrote {} timing lines to {:?} in {:.2}s",
        stats.timing_lines,
        output_path,
        elapsed.as_secs_f64()
    );

    Ok(ResyncResult {
        output_path,
        offset_ms: config.offset_ms,
        stats,
        elapsed,
    })
}

/// Print a summary of a finished resynchronization.
pub fn print_summary(result: &ResyncResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    Resynchronization Complete                 ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:       {}", result.output_path.display());
    println!("  Offset:       {}", format_offset(result.offset_ms));
    println!("  Lines:        {}", result.stats.lines);
    println!("  Timing lines: {}", result.stats.timing_lines);
    if result.stats.clamped > 0 {
        println!("  Clamped:      {}", result.stats.clamped);
    }
    println!("  Time:         {:.3}s", result.elapsed.as_secs_f64());
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

/// Default output file name for `input`: `Movie.srt` becomes `Movie.resync.srt`.
pub fn derive_output_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default();
    format!("{}.resync.srt", stem.to_string_lossy())
}

/// Render an offset as `+1.500s` / `-0.250s`.
pub fn format_offset(offset_ms: i64) -> String {
    let sign = if offset_ms < 0 { '-' } else { '+' };
    let magnitude = offset_ms.unsigned_abs();
    format!("{}{}.{:03}s", sign, magnitude / 1000, magnitude % 1000)
}
