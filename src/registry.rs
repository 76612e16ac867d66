//! Option registration and the parser context built from it.

use crate::help::ProgramInfo;
use crate::option::{BufferOrigin, CmdOption, OptionFlags};
use crate::schema::{self, SchemaError};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors found while registering an option table.
///
/// Every variant carries the index of the first offending option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("option #{index} has neither a short nor a long name")]
    MissingOptionName { index: usize },

    #[error("option #{index}: malformed argument format '{format}'")]
    MalformedSchema { index: usize, format: String },

    #[error("option #{index}: argument format describes {found} argument(s) but {declared} declared")]
    ArgCountMismatch {
        index: usize,
        declared: u32,
        found: u32,
    },

    #[error("option #{index}: argument format and argument count must be given together")]
    SchemaArityMismatch { index: usize },

    #[error("option #{index}: only one default option may be registered")]
    DuplicateDefaultOption { index: usize },

    #[error("option #{index}: the default option must take at least one argument")]
    DefaultOptionWithoutArgs { index: usize },

    #[error("option #{index}: {found} default argument(s) supplied but {expected} expected")]
    DefaultArgsMismatch {
        index: usize,
        expected: u32,
        found: usize,
    },
}

impl RegistrationError {
    /// Index of the offending option in the registered table.
    pub fn index(&self) -> usize {
        match self {
            RegistrationError::MissingOptionName { index }
            | RegistrationError::MalformedSchema { index, .. }
            | RegistrationError::ArgCountMismatch { index, .. }
            | RegistrationError::SchemaArityMismatch { index }
            | RegistrationError::DuplicateDefaultOption { index }
            | RegistrationError::DefaultOptionWithoutArgs { index }
            | RegistrationError::DefaultArgsMismatch { index, .. } => *index,
        }
    }

    fn from_schema(index: usize, err: SchemaError) -> Self {
        match err {
            SchemaError::Malformed(format) => RegistrationError::MalformedSchema { index, format },
            SchemaError::ArgCountMismatch {
                declared, found, ..
            } => RegistrationError::ArgCountMismatch {
                index,
                declared,
                found,
            },
            SchemaError::ArityMismatch => RegistrationError::SchemaArityMismatch { index },
        }
    }
}

/// How an empty token list is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInputPolicy {
    /// Empty input succeeds unless there is a required option and a default
    /// option, and the default option has no caller-supplied arguments.
    #[default]
    DefaultArgsSatisfy,
    /// Empty input always goes through the required-option check.
    AlwaysValidate,
}

/// Engine view over a caller-owned option table.
///
/// The table is borrowed for the lifetime of the context; results are read
/// back from the same records once parsing finishes.
#[derive(Debug)]
pub struct ParserContext<'a> {
    pub(crate) options: &'a mut [CmdOption],
    pub(crate) default: Option<usize>,
    pub(crate) has_required: bool,
    pub(crate) program: Option<ProgramInfo>,
    pub(crate) empty_input: EmptyInputPolicy,
}

impl<'a> ParserContext<'a> {
    /// Validate an option table and build a context over it.
    ///
    /// Parser-set flags and engine-owned buffers left over from an earlier pass
    /// are cleared, so a table can be registered again for a fresh parse.
    pub fn register(options: &'a mut [CmdOption]) -> Result<Self, RegistrationError> {
        let mut default = None;
        let mut has_required = false;

        for (index, option) in options.iter_mut().enumerate() {
            if option.short.is_none() && option.long.is_none() {
                return Err(RegistrationError::MissingOptionName { index });
            }

            option.schema = schema::compile(option.format.as_deref(), option.arg_count)
                .map_err(|e| RegistrationError::from_schema(index, e))?;

            if option
                .args
                .as_ref()
                .is_some_and(|b| b.origin == BufferOrigin::EngineOwned)
            {
                option.args = None;
            }
            if let Some(ref buffer) = option.args {
                if buffer.values.len() != option.arg_count as usize {
                    return Err(RegistrationError::DefaultArgsMismatch {
                        index,
                        expected: option.arg_count,
                        found: buffer.values.len(),
                    });
                }
            }

            if option.is_required() {
                has_required = true;
            }

            if option.is_default() {
                if default.is_some() {
                    return Err(RegistrationError::DuplicateDefaultOption { index });
                }
                if option.arg_count == 0 {
                    return Err(RegistrationError::DefaultOptionWithoutArgs { index });
                }
                default = Some(index);
            }

            let mut flags = OptionFlags::empty();
            if option.is_required() {
                flags.insert(OptionFlags::REQUIRED);
            }
            if option.is_default() {
                flags.insert(OptionFlags::DEFAULT);
            }
            option.flags = flags;
        }

        debug!(
            options = options.len(),
            default = ?default,
            has_required,
            "registered option table"
        );

        Ok(Self {
            options,
            default,
            has_required,
            program: None,
            empty_input: EmptyInputPolicy::default(),
        })
    }

    /// Attach program metadata used by help rendering.
    pub fn with_program(mut self, program: ProgramInfo) -> Self {
        self.program = Some(program);
        self
    }

    pub fn with_empty_input_policy(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    pub fn program(&self) -> Option<&ProgramInfo> {
        self.program.as_ref()
    }

    pub fn options(&self) -> &[CmdOption] {
        self.options
    }

    pub fn option(&self, index: usize) -> Option<&CmdOption> {
        self.options.get(index)
    }

    /// The registered default option, if any.
    pub fn default_option(&self) -> Option<&CmdOption> {
        self.default.map(|i| &self.options[i])
    }

    pub fn find_short(&self, name: &str) -> Option<&CmdOption> {
        self.position_short(name).map(|i| &self.options[i])
    }

    pub fn find_long(&self, name: &str) -> Option<&CmdOption> {
        self.position_long(name).map(|i| &self.options[i])
    }

    /// Whether the table is empty.
    pub fn has_no_work(&self) -> bool {
        self.options.is_empty()
    }

    pub(crate) fn position_short(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.short.as_deref() == Some(name))
    }

    pub(crate) fn position_long(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.long.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::ArgValue;
    use crate::schema::ArgKind;

    #[test]
    fn test_register_compiles_schemas() {
        let mut options = vec![
            CmdOption::new().long("optimise").format("n", 1).required(),
            CmdOption::new().short("v"),
        ];
        let ctx = ParserContext::register(&mut options).unwrap();
        assert_eq!(ctx.options()[0].schema(), Some(&[ArgKind::Integer][..]));
        assert_eq!(ctx.options()[1].schema(), None);
        assert!(ctx.has_required);
        assert!(ctx.default_option().is_none());
    }

    #[test]
    fn test_register_empty_table() {
        let mut options: Vec<CmdOption> = vec![];
        let ctx = ParserContext::register(&mut options).unwrap();
        assert!(ctx.has_no_work());
    }

    #[test]
    fn test_error_missing_name_reports_index() {
        let mut options = vec![CmdOption::new().short("a"), CmdOption::new().help("nameless")];
        let result = ParserContext::register(&mut options);
        assert_eq!(
            result.unwrap_err(),
            RegistrationError::MissingOptionName { index: 1 }
        );
    }

    #[test]
    fn test_error_malformed_schema() {
        let mut options = vec![CmdOption::new().long("x").format("s-", 1)];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert!(matches!(err, RegistrationError::MalformedSchema { index: 0, .. }));
    }

    #[test]
    fn test_error_arg_count_mismatch() {
        let mut options = vec![CmdOption::new().long("x").format("s-n", 1)];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::ArgCountMismatch {
                index: 0,
                declared: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_error_schema_arity_mismatch() {
        let mut options = vec![CmdOption::new().long("x").format("s", 0)];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(err, RegistrationError::SchemaArityMismatch { index: 0 });
    }

    #[test]
    fn test_error_duplicate_default_either_order() {
        let mut options = vec![
            CmdOption::new().long("a").format("s", 1).default_option(),
            CmdOption::new().long("b").format("s", 1).default_option(),
        ];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateDefaultOption { index: 1 });

        options.reverse();
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(err.index(), 1);
        assert!(matches!(err, RegistrationError::DuplicateDefaultOption { .. }));
    }

    #[test]
    fn test_error_default_args_length() {
        let mut options = vec![CmdOption::new()
            .long("pair")
            .format("s-s", 2)
            .default_args(vec![ArgValue::String("one".to_string())])];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DefaultArgsMismatch {
                index: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_error_default_option_without_args() {
        let mut options = vec![CmdOption::new().short("x").default_option()];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert_eq!(err, RegistrationError::DefaultOptionWithoutArgs { index: 0 });
    }

    #[test]
    fn test_find_by_name() {
        let mut options = vec![CmdOption::new().short("f").long("file").format("s", 1)];
        let ctx = ParserContext::register(&mut options).unwrap();
        assert!(ctx.find_short("f").is_some());
        assert!(ctx.find_long("file").is_some());
        assert!(ctx.find_long("f").is_none());
    }
}
