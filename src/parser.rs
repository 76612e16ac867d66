//! Token matching, argument extraction and post-parse validation.

use crate::classify::{classify, Route};
use crate::option::{ArgBuffer, ArgValue, BufferOrigin, CmdOption, OptionFlags};
use crate::registry::{EmptyInputPolicy, ParserContext};
use crate::schema::ArgKind;
use std::error::Error as StdError;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, trace};

/// Option name reserved for the built-in help action, in either route.
const HELP_NAME: &str = "h";

/// Errors that can occur while parsing a token list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown short option: -{0}")]
    UnknownShortOption(String),

    #[error("unknown long option: --{0}")]
    UnknownLongOption(String),

    #[error("option given more than once: {0}")]
    DuplicateOption(String),

    #[error("option {option} expects {expected} argument(s) but only {found} given")]
    InsufficientArguments {
        option: String,
        expected: u32,
        found: usize,
    },

    #[error("invalid integer literal for option {option}: {token}")]
    InvalidIntegerLiteral { option: String, token: String },

    #[error("no default option to receive argument: {0}")]
    NoDefaultOption(String),

    #[error("required option missing: {0}")]
    RequiredOptionMissing(String),

    #[error("callback for option {option} failed: {source}")]
    UserCallbackError {
        option: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("failed to write help text: {0}")]
    Help(#[from] io::Error),
}

/// Successful result of a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// All tokens were consumed and validated.
    Completed,
    /// The built-in help option was given; remaining tokens were skipped.
    HelpShown,
}

/// Result of resolving a routed token against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Index of the matched option.
    Found(usize),
    BuiltinHelp,
    NotFound,
}

/// Parse an integer literal with an optional sign and `0x`, `0o` or `0b` prefix.
///
/// The whole token must be consumed.
pub fn parse_integer(token: &str) -> Option<i64> {
    let (negative, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let prefixed = |lower: &str, upper: &str| {
        rest.strip_prefix(lower)
            .or_else(|| rest.strip_prefix(upper))
    };
    let (radix, digits) = if let Some(d) = prefixed("0x", "0X") {
        (16, d)
    } else if let Some(d) = prefixed("0o", "0O") {
        (8, d)
    } else if let Some(d) = prefixed("0b", "0B") {
        (2, d)
    } else {
        (10, rest)
    };

    // from_str_radix tolerates its own sign, which must not follow a prefix
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn not_found(route: Route<'_>) -> ParseError {
    match route {
        Route::Long(name) => ParseError::UnknownLongOption(name.to_string()),
        Route::Short(name) => ParseError::UnknownShortOption(name.to_string()),
        Route::DefaultArg(token) => ParseError::NoDefaultOption(token.to_string()),
    }
}

/// Consume the tokens an option's schema prescribes, starting at `cursor`.
fn extract<S: AsRef<str>>(
    option: &mut CmdOption,
    tokens: &[S],
    cursor: &mut usize,
) -> Result<(), ParseError> {
    let name = option.display_name();
    let kinds: &[ArgKind] = option.schema.as_deref().unwrap_or(&[]);

    let buffer = option.args.get_or_insert_with(|| ArgBuffer {
        values: Vec::with_capacity(kinds.len()),
        origin: BufferOrigin::EngineOwned,
    });

    for (slot, kind) in kinds.iter().enumerate() {
        let token = match tokens.get(*cursor) {
            Some(t) => t.as_ref(),
            None => {
                return Err(ParseError::InsufficientArguments {
                    option: name,
                    expected: option.arg_count,
                    found: slot,
                })
            }
        };

        let value = match kind {
            ArgKind::String => ArgValue::String(token.to_string()),
            ArgKind::Integer => match parse_integer(token) {
                Some(n) => ArgValue::Integer(n),
                None => {
                    return Err(ParseError::InvalidIntegerLiteral {
                        option: name,
                        token: token.to_string(),
                    })
                }
            },
        };
        trace!(option = %name, slot, value = %value, "extracted argument");

        if slot < buffer.values.len() {
            buffer.values[slot] = value;
        } else {
            buffer.values.push(value);
        }
        *cursor += 1;
    }

    if let Some(callback) = option.callback.as_mut() {
        callback(buffer.values.as_slice())
            .map_err(|source| ParseError::UserCallbackError { option: name, source })?;
    }

    Ok(())
}

impl ParserContext<'_> {
    /// Resolve a routed token to an option without changing any state.
    pub fn match_route(&self, route: Route<'_>) -> MatchOutcome {
        let position = match route {
            Route::Long(HELP_NAME) | Route::Short(HELP_NAME) => return MatchOutcome::BuiltinHelp,
            Route::Long(name) => self.position_long(name),
            Route::Short(name) => self.position_short(name),
            Route::DefaultArg(_) => self.default,
        };
        position.map_or(MatchOutcome::NotFound, MatchOutcome::Found)
    }

    /// Parse a token list with the program name already removed.
    ///
    /// Help text is written to standard output.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.parse_with_writer(tokens, &mut out)
    }

    /// Parse a full argument vector whose first element is the program name.
    pub fn parse_argv<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<ParseOutcome, ParseError> {
        self.parse(argv.get(1..).unwrap_or(&[]))
    }

    /// Parse a token list, writing help text (if requested) to `out`.
    pub fn parse_with_writer<S: AsRef<str>, W: Write>(
        &mut self,
        tokens: &[S],
        out: &mut W,
    ) -> Result<ParseOutcome, ParseError> {
        if tokens.is_empty() && self.empty_input_accepted() {
            debug!("empty input accepted without validation");
            return Ok(ParseOutcome::Completed);
        }

        let mut cursor = 0;
        while cursor < tokens.len() {
            let token = tokens[cursor].as_ref();
            let route = classify(token);
            debug!(token, ?route, "routing token");

            // Bare tokens are left in place for the default option's extractor.
            if !matches!(route, Route::DefaultArg(_)) {
                cursor += 1;
            }

            let index = match self.match_route(route) {
                MatchOutcome::Found(index) => index,
                MatchOutcome::BuiltinHelp => {
                    self.write_help(out)?;
                    return Ok(ParseOutcome::HelpShown);
                }
                MatchOutcome::NotFound => return Err(not_found(route)),
            };

            let option = &mut self.options[index];
            if option.is_done() {
                return Err(ParseError::DuplicateOption(option.display_name()));
            }
            option.flags.insert(OptionFlags::PRESENT);

            if option.arg_count > 0 {
                extract(option, tokens, &mut cursor)?;
            } else if let Some(callback) = option.callback.as_mut() {
                let no_args: &[ArgValue] = &[];
                callback(no_args).map_err(|source| ParseError::UserCallbackError {
                    option: option.display_name(),
                    source,
                })?;
            }
            option.flags.insert(OptionFlags::DONE);
        }

        self.validate_required()?;
        Ok(ParseOutcome::Completed)
    }

    fn empty_input_accepted(&self) -> bool {
        match self.empty_input {
            EmptyInputPolicy::AlwaysValidate => false,
            EmptyInputPolicy::DefaultArgsSatisfy => {
                if self.has_no_work() || !(self.has_required && self.default.is_some()) {
                    return true;
                }
                self.default_option()
                    .and_then(|o| o.arg_buffer())
                    .is_some_and(|b| b.origin == BufferOrigin::CallerProvided)
            }
        }
    }

    /// Fail if any required option was never matched.
    ///
    /// The message is also written to standard error.
    pub fn validate_required(&self) -> Result<(), ParseError> {
        if let Some(missing) = self
            .options
            .iter()
            .find(|o| o.is_required() && !o.is_present())
        {
            let name = missing.display_name();
            debug!(option = %name, "required option missing");
            eprintln!("required option missing: {}", name);
            return Err(ParseError::RequiredOptionMissing(name));
        }
        Ok(())
    }

    /// Release every argument buffer the engine allocated.
    ///
    /// Caller-supplied buffers are left alone; calling this again is a no-op.
    pub fn teardown(&mut self) {
        let mut released = 0usize;
        for option in self.options.iter_mut() {
            if matches!(
                option.args,
                Some(ArgBuffer {
                    origin: BufferOrigin::EngineOwned,
                    ..
                })
            ) {
                option.args = None;
                released += 1;
            }
        }
        debug!(released, "released engine-owned argument buffers");
    }
}
