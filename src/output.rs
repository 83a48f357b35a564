//! CLI output formatting.
//!
//! Every command prints either human-readable lines or, with `--json`, one
//! JSON object. The primary line names what happened; indented context lines
//! follow:
//!
//! ```text
//! image holiday.jpg → media/processed_holiday.webp
//!     Size: 48213 bytes
//! ```
//!
//! Formatting is split from printing so the text is unit testable.

use crate::format::{FormatCategory, classify};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of one CLI command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Report {
    Converted {
        kind: String,
        source: String,
        output: PathBuf,
        bytes: u64,
    },
    Classified {
        file: String,
        category: String,
    },
    Deleted {
        path: PathBuf,
    },
}

impl Report {
    /// Report for a finished conversion; the size is read back from disk.
    pub fn converted(kind: impl Into<String>, source: &Path, output: PathBuf) -> Self {
        let bytes = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
        Self::Converted {
            kind: kind.into(),
            source: source.display().to_string(),
            output,
            bytes,
        }
    }

    pub fn classified(file: &str) -> Self {
        Self::Classified {
            file: file.to_string(),
            category: category_name(classify(file)).to_string(),
        }
    }
}

fn category_name(category: FormatCategory) -> &'static str {
    match category {
        FormatCategory::Image => "image",
        FormatCategory::Video => "video",
        FormatCategory::Audio => "audio",
        FormatCategory::StructuredData => "structured_data",
        FormatCategory::Unknown => "unknown",
    }
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_report(report: &Report) -> Vec<String> {
    match report {
        Report::Converted {
            kind,
            source,
            output,
            bytes,
        } => vec![
            format!("{kind} {source} → {}", output.display()),
            format!("{}Size: {bytes} bytes", indent(1)),
        ],
        Report::Classified { file, category } => vec![format!("{file}: {category}")],
        Report::Deleted { path } => vec![format!("deleted {}", path.display())],
    }
}

pub fn print_report(report: &Report, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        for line in format_report(report) {
            println!("{line}");
        }
    }
    Ok(())
}
