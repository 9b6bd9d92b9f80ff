//! Creatorly content tool - import and sanitize blog content.
//!
//! # Usage
//!
//! ```bash
//! creatorly-content import draft.md
//! creatorly-content import --report --read-time draft.md
//! creatorly-content sanitize --strict pasted.html
//! ```

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use creatorly_content::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags, ReportFormat,
};
use creatorly_content::content::estimate_read_time;
use creatorly_content::importer;
use creatorly_content::sanitize::sanitize_with_report;

/// Content pipeline for the Creatorly blog
#[derive(Parser, Debug)]
#[command(name = "creatorly-content", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Action,

    /// Print a summary of what the conversion found
    #[arg(long, global = true)]
    report: bool,

    /// Suppress log output below errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the estimated reading time
    #[arg(long, global = true)]
    read_time: bool,

    /// Fail when the sanitizer flags a suspicious attribute
    #[arg(long, global = true)]
    strict: bool,

    /// Report output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: ReportFormat,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in .creatorlyrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .creatorlyrc
    #[arg(long)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Convert markdown-ish text to the editor's HTML subset
    Import {
        /// Input file, stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Write HTML here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Reduce pasted HTML to the allowed tag set
    Sanitize {
        /// Input file, stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Write HTML here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn init_logging(quiet: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    if let Some(path) = log_file {
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&PathBuf>, html: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{html}");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    let format = effective.format.unwrap_or(cli.format);

    init_logging(effective.quiet, effective.log_file.as_ref())?;

    match &cli.command {
        Action::Import { file, output } => {
            let text = read_input(file.as_ref())?;
            let imported = importer::import(&text).context("Import failed")?;
            write_output(output.as_ref(), &imported.html)?;
            if effective.read_time {
                eprintln!("read time: {} min", estimate_read_time(&text));
            }
            if effective.report {
                let report = &imported.report;
                match format {
                    ReportFormat::Text => eprintln!(
                        "imported: {} headings, {} links, {} list items, {} code blocks",
                        report.headings, report.links, report.list_items, report.code_blocks
                    ),
                    ReportFormat::Json => eprintln!(
                        "{}",
                        serde_json::json!({
                            "headings": report.headings,
                            "links": report.links,
                            "list_items": report.list_items,
                            "code_blocks": report.code_blocks,
                        })
                    ),
                }
            }
        }
        Action::Sanitize { file, output } => {
            let html = read_input(file.as_ref())?;
            let (clean, report) = sanitize_with_report(&html);
            if effective.strict && !report.flagged_attributes.is_empty() {
                anyhow::bail!(
                    "suspicious attributes found: {}",
                    report.flagged_attributes.join(", ")
                );
            }
            write_output(output.as_ref(), &clean)?;
            if effective.report {
                match format {
                    ReportFormat::Text => eprintln!(
                        "sanitized: {} tags unwrapped, {} attributes flagged",
                        report.unwrapped_tags.len(),
                        report.flagged_attributes.len()
                    ),
                    ReportFormat::Json => eprintln!(
                        "{}",
                        serde_json::json!({
                            "unwrapped_tags": report.unwrapped_tags,
                            "flagged_attributes": report.flagged_attributes,
                        })
                    ),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "creatorly-content",
            "import",
            "--report",
            "--read-time",
            "draft.md",
        ])
        .unwrap();
        assert!(cli.report);
        assert!(cli.read_time);
        assert!(matches!(cli.command, Action::Import { .. }));
    }

    #[test]
    fn test_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["creatorly-content", "--report", "import", "draft.md"])
            .unwrap();
        assert!(cli.report);
    }

    #[test]
    fn test_strict_after_sanitize_subcommand() {
        let cli =
            Cli::try_parse_from(["creatorly-content", "sanitize", "--strict", "pasted.html"])
                .unwrap();
        assert!(cli.strict);
        assert!(matches!(cli.command, Action::Sanitize { .. }));
    }
}
