use crate::config::{Config, TextEncoding};
use crate::pipeline::{derive_output_name, format_offset, ResyncConfig};
use crate::subtitle::parse_offset;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: &[&str] = &["srt"];

const ENCODINGS: &[(&str, &str)] = &[
    ("windows-1250", "Central European (Windows)"),
    ("utf-8", "Unicode"),
    ("windows-1252", "Western European (Windows)"),
    ("iso-8859-2", "Central European (ISO)"),
    ("windows-1251", "Cyrillic (Windows)"),
    ("iso-8859-1", "Western European (ISO)"),
];

pub struct InteractiveResult {
    pub input: PathBuf,
    /// Directory the output is written into, under `resync_config.output_name`.
    pub output_dir: PathBuf,
    pub resync_config: ResyncConfig,
}

pub fn run_interactive_wizard(config: &Config) -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Select source file
    let input = select_source_file()?;

    // Step 2: Offset
    let offset_ms = enter_offset()?;

    // Step 3: Encoding
    let encoding = select_encoding(config.encoding)?;

    // Step 4: Output name
    let output_name: String = Input::new()
        .with_prompt("Output file name")
        .default(derive_output_name(&input))
        .interact_text()?;
    let output_dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Step 5: Confirm
    print_summary(&input, &output_dir.join(&output_name), offset_ms, encoding);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    if encoding != config.encoding {
        offer_save_encoding(config, encoding)?;
    }

    println!();

    Ok(InteractiveResult {
        input,
        output_dir,
        resync_config: ResyncConfig {
            encoding,
            offset_ms,
            policy: config.shift_policy,
            output_name: Some(output_name),
        },
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        srtsync - Subtitle Resynchronizer          ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn select_source_file() -> anyhow::Result<PathBuf> {
    println!("{}", style("Select subtitle file:").bold());

    let files = scan_subtitle_files(".")?;

    if files.is_empty() {
        println!("  No subtitle files found in current directory.\n");
        return enter_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        enter_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn enter_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter file path")
        .interact_text()?;
    let path = PathBuf::from(path.trim());
    if !path.is_file() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn scan_subtitle_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn enter_offset() -> anyhow::Result<i64> {
    println!(
        "\n  Positive offsets delay subtitles, negative ones show them earlier."
    );
    println!("  Examples: 1500, -250, +00:01:00,000, -00:00:02,500\n");

    let text: String = Input::new()
        .with_prompt("Offset")
        .validate_with(|input: &String| -> Result<(), String> {
            parse_offset(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    Ok(parse_offset(&text)?)
}

fn select_encoding(current: TextEncoding) -> anyhow::Result<TextEncoding> {
    let mut items: Vec<String> = ENCODINGS
        .iter()
        .map(|(label, desc)| format!("{} - {}", label, desc))
        .collect();
    items.push("Other (enter label)...".to_string());

    let default = ENCODINGS
        .iter()
        .position(|(label, _)| label.parse::<TextEncoding>().ok() == Some(current))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select text encoding")
        .items(&items)
        .default(default)
        .interact()?;

    let label = if selection == ENCODINGS.len() {
        Input::<String>::new()
            .with_prompt("Enter encoding label (e.g., 'koi8-r')")
            .interact_text()?
    } else {
        ENCODINGS[selection].0.to_string()
    };

    let encoding: TextEncoding = label.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    if !encoding.is_writable() {
        anyhow::bail!("Encoding {} can be read but not written", encoding);
    }
    Ok(encoding)
}

fn offer_save_encoding(config: &Config, encoding: TextEncoding) -> anyhow::Result<()> {
    if Confirm::new()
        .with_prompt(format!("Use {} as the default encoding from now on?", encoding))
        .default(false)
        .interact()?
    {
        let updated = Config {
            encoding,
            ..config.clone()
        };
        let path = updated.save()?;
        println!(
            "{} Default encoding saved to {}",
            style("✓").green(),
            path.display()
        );
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn print_summary(input: &Path, output: &Path, offset_ms: i64, encoding: TextEncoding) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:     {}", style(input.display()).cyan());
    println!("  Output:    {}", style(output.display()).cyan());
    println!("  Offset:    {}", format_offset(offset_ms));
    println!("  Encoding:  {}", encoding);
    println!();
}
