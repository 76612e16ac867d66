//! Compilation of option argument formats.
//!
//! A format string describes the arguments an option consumes, one
//! character per argument separated by `-`:
//!
//! ```text
//! format = spec { '-' spec }
//! spec   = 's' | 'n'
//! ```
//!
//! `s` is a string argument and `n` an integer argument, so `"s-n-n"` and
//! `"n-s"` are valid while `"ns-n"` is not.

use thiserror::Error;

/// Separator between argument specs.
const SEPARATOR: char = '-';

/// The kind of a single option argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Raw token text (`s`)
    String,
    /// Signed 64-bit integer literal (`n`)
    Integer,
}

impl ArgKind {
    fn from_spec(c: char) -> Option<Self> {
        match c {
            's' => Some(ArgKind::String),
            'n' => Some(ArgKind::Integer),
            _ => None,
        }
    }

    /// Placeholder shown for this kind in usage and help text.
    pub fn placeholder(self) -> &'static str {
        match self {
            ArgKind::String => "<str>",
            ArgKind::Integer => "<num>",
        }
    }
}

/// Errors produced while compiling a format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("malformed argument format '{0}'")]
    Malformed(String),

    #[error("argument format '{format}' describes {found} argument(s) but {declared} declared")]
    ArgCountMismatch {
        format: String,
        declared: u32,
        found: u32,
    },

    #[error("argument format and argument count must be given together")]
    ArityMismatch,
}

/// Compile a format string against the option's declared argument count.
///
/// Returns `Ok(None)` when the option takes no arguments.
pub fn compile(format: Option<&str>, arg_count: u32) -> Result<Option<Vec<ArgKind>>, SchemaError> {
    let format = match (format, arg_count) {
        (None, 0) => return Ok(None),
        (Some(_), 0) | (None, _) => return Err(SchemaError::ArityMismatch),
        (Some(f), _) => f,
    };

    let chars: Vec<char> = format.chars().collect();
    if chars.len() % 2 == 0 {
        return Err(SchemaError::Malformed(format.to_string()));
    }

    let mut kinds = Vec::with_capacity(chars.len() / 2 + 1);
    for (i, c) in chars.iter().enumerate() {
        if i % 2 == 0 {
            let kind =
                ArgKind::from_spec(*c).ok_or_else(|| SchemaError::Malformed(format.to_string()))?;
            kinds.push(kind);
        } else if *c != SEPARATOR {
            return Err(SchemaError::Malformed(format.to_string()));
        }
    }

    let found = kinds.len() as u32;
    if found != arg_count {
        return Err(SchemaError::ArgCountMismatch {
            format: format.to_string(),
            declared: arg_count,
            found,
        });
    }

    Ok(Some(kinds))
}
