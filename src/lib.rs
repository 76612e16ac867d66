//! cmdline - Declarative command-line option parsing.
//!
//! Callers describe a fixed table of options, each with short and long
//! names, help text and a typed argument format, register the table and
//! parse a token list into the same records. Results are read back from the
//! options once parsing finishes.

pub mod classify;
pub mod config;
pub mod help;
pub mod option;
pub mod parser;
pub mod registry;
pub mod schema;

pub use classify::{classify, Route};
pub use config::{Config, ConfigError, OptionConfig};
pub use help::{generate_help, generate_usage, generate_version, ProgramInfo};
pub use option::{
    ArgBuffer, ArgValue, BufferOrigin, Callback, CallbackResult, CmdOption, OptionFlags,
};
pub use parser::{parse_integer, MatchOutcome, ParseError, ParseOutcome};
pub use registry::{EmptyInputPolicy, ParserContext, RegistrationError};
pub use schema::{ArgKind, SchemaError};
