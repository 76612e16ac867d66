//! Help, usage and version text generation.

use crate::option::{BufferOrigin, CmdOption};
use crate::registry::ParserContext;
use serde::Deserialize;
use std::io::{self, Write};

/// Program name used in the usage line when none is registered.
const FALLBACK_NAME: &str = "PROGRAM";

/// Program metadata shown at the top of the help text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProgramInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub copyright: Option<String>,
}

impl ProgramInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }
}

fn format_placeholders(option: &CmdOption) -> String {
    option
        .schema()
        .unwrap_or(&[])
        .iter()
        .map(|k| k.placeholder())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_option_left(option: &CmdOption) -> String {
    let mut out = match (option.short_name(), option.long_name()) {
        (Some(s), Some(l)) => format!("-{}, --{}", s, l),
        (Some(s), None) => format!("-{}", s),
        (None, Some(l)) => format!("    --{}", l),
        (None, None) => String::new(),
    };
    let placeholders = format_placeholders(option);
    if !placeholders.is_empty() {
        out.push(' ');
        out.push_str(&placeholders);
    }
    out
}

fn format_option_help(option: &CmdOption) -> String {
    let mut out = option.help_text().unwrap_or("").trim().to_string();
    let mut notes = Vec::new();
    if option.is_required() {
        notes.push("required");
    }
    if option.is_default() {
        notes.push("default");
    }
    if !notes.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("({})", notes.join(", ")));
    }
    if let Some(buffer) = option
        .arg_buffer()
        .filter(|b| b.origin == BufferOrigin::CallerProvided && !b.values.is_empty())
    {
        let shown: Vec<String> = buffer.values.iter().map(|v| v.to_string()).collect();
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("[default: {}]", shown.join(" ")));
    }
    out
}

/// Render the usage line, e.g. `Usage: prog [OPTIONS] <str>`.
pub fn generate_usage(program: Option<&ProgramInfo>, options: &[CmdOption]) -> String {
    let name = program
        .and_then(|p| p.name.as_deref())
        .unwrap_or(FALLBACK_NAME);
    let mut out = format!("Usage: {} [OPTIONS]", name);
    if let Some(default) = options.iter().find(|o| o.is_default()) {
        let placeholders = format_placeholders(default);
        if !placeholders.is_empty() {
            out.push(' ');
            out.push_str(&placeholders);
        }
    }
    out.push('\n');
    out
}

/// Render `name version`, or just the name when no version is set.
pub fn generate_version(program: &ProgramInfo) -> String {
    let name = program.name.as_deref().unwrap_or(FALLBACK_NAME);
    match program.version.as_deref() {
        Some(v) if !v.trim().is_empty() => format!("{} {}\n", name, v.trim()),
        _ => format!("{}\n", name),
    }
}

/// Render the full help text.
pub fn generate_help(program: Option<&ProgramInfo>, options: &[CmdOption]) -> String {
    let mut out = String::new();

    if let Some(program) = program {
        if program.name.is_some() {
            out.push_str(&generate_version(program));
        }
        if let Some(ref copyright) = program.copyright {
            out.push_str(copyright.trim_end());
            out.push('\n');
        }
        if !out.is_empty() {
            out.push('\n');
        }
    }

    out.push_str(&generate_usage(program, options));

    let mut rows: Vec<(String, String)> = options
        .iter()
        .map(|o| (format_option_left(o), format_option_help(o)))
        .collect();
    rows.push(("-h".to_string(), "Print help".to_string()));

    out.push_str("\nOptions:\n");
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {}\n", left));
        } else {
            out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
        }
    }

    out
}

impl ParserContext<'_> {
    /// Help text for the registered table.
    pub fn help_text(&self) -> String {
        generate_help(self.program(), self.options())
    }

    /// Write help text to `out`. Option state is never touched.
    pub fn write_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.help_text().as_bytes())?;
        out.flush()
    }

    pub fn print_help(&self) -> io::Result<()> {
        self.write_help(&mut io::stdout().lock())
    }
}
