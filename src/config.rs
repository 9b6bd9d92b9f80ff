use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub report: bool,
    pub quiet: bool,
    pub read_time: bool,
    pub strict: bool,
    pub format: Option<ReportFormat>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            report: self.report || other.report,
            quiet: self.quiet || other.quiet,
            read_time: self.read_time || other.read_time,
            strict: self.strict || other.strict,
            format: other.format.or(self.format),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("creatorly").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("creatorly")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("creatorly").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("creatorly")
                .join("config");
        }
    }

    PathBuf::from(".creatorlyrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".creatorlyrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# creatorly defaults (saved with --save)".to_string());
    if flags.report {
        lines.push("--report".to_string());
    }
    if flags.quiet {
        lines.push("--quiet".to_string());
    }
    if flags.read_time {
        lines.push("--read-time".to_string());
    }
    if flags.strict {
        lines.push("--strict".to_string());
    }
    if let Some(format) = flags.format {
        let format_str = match format {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        };
        lines.push(format!("--format {}", format_str));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--report" {
            flags.report = true;
        } else if token == "--quiet" {
            flags.quiet = true;
        } else if token == "--read-time" {
            flags.read_time = true;
        } else if token == "--strict" {
            flags.strict = true;
        } else if token == "--format" {
            if let Some(next) = tokens.get(i + 1) {
                flags.format = parse_format(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--format=") {
            flags.format = parse_format(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_format(s: &str) -> Option<ReportFormat> {
    match s {
        "text" => Some(ReportFormat::Text),
        "json" => Some(ReportFormat::Json),
        _ => None,
    }
}
