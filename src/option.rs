//! Option records and the values extracted for them.

use crate::schema::ArgKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Result returned by an option callback.
pub type CallbackResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Callback invoked with the extracted arguments once an option is fully parsed.
pub type Callback = Box<dyn FnMut(&[ArgValue]) -> CallbackResult>;

/// A single extracted argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Integer(i64),
    String(String),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            ArgValue::Integer(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(n) => Some(*n),
            ArgValue::String(_) => None,
        }
    }

    /// Whether the value has the given kind.
    pub fn is_kind(&self, kind: ArgKind) -> bool {
        matches!(
            (self, kind),
            (ArgValue::String(_), ArgKind::String) | (ArgValue::Integer(_), ArgKind::Integer)
        )
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => f.write_str(s),
            ArgValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Who allocated an option's argument buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOrigin {
    /// Supplied by the caller as default values; never released by the engine.
    CallerProvided,
    /// Allocated during extraction; released by teardown.
    EngineOwned,
}

/// Argument storage attached to an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgBuffer {
    pub values: Vec<ArgValue>,
    pub origin: BufferOrigin,
}

/// Option state flags.
///
/// `REQUIRED` and `DEFAULT` are set by the caller. `PRESENT` and `DONE` are
/// set by the parser and never cleared within a parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionFlags(u8);

impl OptionFlags {
    pub const REQUIRED: OptionFlags = OptionFlags(1 << 0);
    pub const DEFAULT: OptionFlags = OptionFlags(1 << 1);
    pub const PRESENT: OptionFlags = OptionFlags(1 << 2);
    pub const DONE: OptionFlags = OptionFlags(1 << 3);

    pub fn empty() -> Self {
        OptionFlags(0)
    }

    pub fn contains(self, other: OptionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: OptionFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for OptionFlags {
    type Output = OptionFlags;

    fn bitor(self, rhs: OptionFlags) -> OptionFlags {
        OptionFlags(self.0 | rhs.0)
    }
}

/// A recognized command-line option.
pub struct CmdOption {
    pub(crate) short: Option<String>,
    pub(crate) long: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) format: Option<String>,
    pub(crate) arg_count: u32,
    pub(crate) schema: Option<Vec<ArgKind>>,
    pub(crate) callback: Option<Callback>,
    pub(crate) args: Option<ArgBuffer>,
    pub(crate) flags: OptionFlags,
}

impl CmdOption {
    /// Create an option with no names, no arguments and no flags.
    pub fn new() -> Self {
        Self {
            short: None,
            long: None,
            help: None,
            format: None,
            arg_count: 0,
            schema: None,
            callback: None,
            args: None,
            flags: OptionFlags::empty(),
        }
    }

    /// Short name, matched as `-<name>`.
    pub fn short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    /// Long name, matched as `--<name>`.
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Argument format (see [`crate::schema`]) and the number of arguments it describes.
    pub fn format(mut self, format: impl Into<String>, arg_count: u32) -> Self {
        self.format = Some(format.into());
        self.arg_count = arg_count;
        self
    }

    pub fn required(mut self) -> Self {
        self.flags.insert(OptionFlags::REQUIRED);
        self
    }

    /// Mark this option as the one receiving bare tokens.
    pub fn default_option(mut self) -> Self {
        self.flags.insert(OptionFlags::DEFAULT);
        self
    }

    /// Pre-populate the argument buffer with default values.
    pub fn default_args(mut self, values: Vec<ArgValue>) -> Self {
        self.args = Some(ArgBuffer {
            values,
            origin: BufferOrigin::CallerProvided,
        });
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[ArgValue]) -> CallbackResult + 'static,
    {
        self.callback = Some(Box::new(f));
        self
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn arg_count(&self) -> u32 {
        self.arg_count
    }

    /// Compiled argument kinds, available after registration.
    pub fn schema(&self) -> Option<&[ArgKind]> {
        self.schema.as_deref()
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(OptionFlags::REQUIRED)
    }

    pub fn is_default(&self) -> bool {
        self.flags.contains(OptionFlags::DEFAULT)
    }

    pub fn is_present(&self) -> bool {
        self.flags.contains(OptionFlags::PRESENT)
    }

    pub fn is_done(&self) -> bool {
        self.flags.contains(OptionFlags::DONE)
    }

    /// The argument buffer, whether caller-supplied or extracted.
    pub fn arg_buffer(&self) -> Option<&ArgBuffer> {
        self.args.as_ref()
    }

    pub fn args(&self) -> Option<&[ArgValue]> {
        self.args.as_ref().map(|b| b.values.as_slice())
    }

    pub fn arg_str(&self, index: usize) -> Option<&str> {
        self.args()?.get(index)?.as_str()
    }

    pub fn arg_int(&self, index: usize) -> Option<i64> {
        self.args()?.get(index)?.as_int()
    }

    /// Name used in messages: `--long` when set, otherwise `-short`.
    pub fn display_name(&self) -> String {
        match (&self.long, &self.short) {
            (Some(long), _) => format!("--{}", long),
            (None, Some(short)) => format!("-{}", short),
            (None, None) => String::from("<unnamed>"),
        }
    }
}

impl Default for CmdOption {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CmdOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmdOption")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("help", &self.help)
            .field("format", &self.format)
            .field("arg_count", &self.arg_count)
            .field("schema", &self.schema)
            .field("callback", &self.callback.is_some())
            .field("args", &self.args)
            .field("flags", &self.flags)
            .finish()
    }
}
