use cmdline::{
    ArgValue, BufferOrigin, CmdOption, ParseError, ParseOutcome, ParserContext, ProgramInfo,
    RegistrationError,
};

fn optimiser_table() -> Vec<CmdOption> {
    vec![
        CmdOption::new()
            .long("optimise")
            .help("Specify the degree of optimisation")
            .format("n", 1)
            .required(),
        CmdOption::new()
            .short("f")
            .long("file")
            .help("Specify the input file")
            .format("s", 1)
            .required()
            .default_option(),
    ]
}

fn run(ctx: &mut ParserContext<'_>, tokens: &[&str]) -> (Result<ParseOutcome, ParseError>, String) {
    let mut sink = Vec::new();
    let result = ctx.parse_with_writer(tokens, &mut sink);
    (result, String::from_utf8(sink).unwrap())
}

#[test]
fn test_default_route_and_integer_option() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &["--optimise", "3", "myinput.txt"]);
    assert_eq!(result.unwrap(), ParseOutcome::Completed);
    drop(ctx);

    assert_eq!(options[0].args().unwrap(), &[ArgValue::Integer(3)]);
    assert_eq!(
        options[1].args().unwrap(),
        &[ArgValue::String("myinput.txt".to_string())]
    );
    assert!(options[0].is_done());
    assert!(options[1].is_done());
}

#[test]
fn test_default_option_by_name() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &["-f", "a.txt", "--optimise", "0x2A"]);
    assert_eq!(result.unwrap(), ParseOutcome::Completed);
    assert_eq!(ctx.options()[0].arg_int(0), Some(42));
    assert_eq!(ctx.options()[1].arg_str(0), Some("a.txt"));
}

#[test]
fn test_empty_input_falls_through_to_required_check() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &[]);
    assert!(matches!(result, Err(ParseError::RequiredOptionMissing(_))));
}

#[test]
fn test_help_leaves_flags_untouched() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options)
        .unwrap()
        .with_program(ProgramInfo::new("Optimiser").version("0.0.1"));

    let (result, help) = run(&mut ctx, &["-h"]);
    assert_eq!(result.unwrap(), ParseOutcome::HelpShown);
    assert!(help.starts_with("Optimiser 0.0.1\n"));
    assert!(help.contains("--optimise"));
    for option in ctx.options() {
        assert!(!option.is_present());
        assert!(!option.is_done());
        assert!(option.args().is_none());
    }
}

#[test]
fn test_unknown_long_option_has_no_side_effects() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &["--unknownopt", "1"]);
    assert!(matches!(result, Err(ParseError::UnknownLongOption(ref n)) if n == "unknownopt"));
    for option in ctx.options() {
        assert!(!option.is_present());
        assert!(option.args().is_none());
    }
}

#[test]
fn test_duplicate_by_either_name_keeps_first_args() {
    for second in ["-f", "--file"] {
        let mut options = optimiser_table();
        let mut ctx = ParserContext::register(&mut options).unwrap();

        let (result, _) = run(&mut ctx, &["--file", "first.txt", second, "second.txt"]);
        assert!(
            matches!(result, Err(ParseError::DuplicateOption(ref n)) if n == "--file"),
            "second match via {}",
            second
        );
        assert_eq!(ctx.options()[1].arg_str(0), Some("first.txt"));
    }
}

#[test]
fn test_required_check_passes_when_matched() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &["--optimise", "1"]);
    assert!(matches!(result, Err(ParseError::RequiredOptionMissing(ref n)) if n == "--file"));

    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();
    let (result, _) = run(&mut ctx, &["--optimise", "1", "--file", "x"]);
    assert!(result.is_ok());
}

#[test]
fn test_invalid_integer_literal() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();

    let (result, _) = run(&mut ctx, &["--optimise", "42x", "in.txt"]);
    assert!(matches!(
        result,
        Err(ParseError::InvalidIntegerLiteral { ref token, .. }) if token == "42x"
    ));
}

#[test]
fn test_teardown_twice() {
    let mut options = optimiser_table();
    let mut ctx = ParserContext::register(&mut options).unwrap();
    let (result, _) = run(&mut ctx, &["--optimise", "3", "in.txt"]);
    result.unwrap();

    assert_eq!(
        ctx.options()[0].arg_buffer().unwrap().origin,
        BufferOrigin::EngineOwned
    );
    ctx.teardown();
    ctx.teardown();
    assert!(ctx.options().iter().all(|o| o.args().is_none()));
}

#[test]
fn test_reregistration_starts_a_fresh_pass() {
    let mut options = optimiser_table();
    {
        let mut ctx = ParserContext::register(&mut options).unwrap();
        let (result, _) = run(&mut ctx, &["--optimise", "3", "in.txt"]);
        result.unwrap();
        ctx.teardown();
    }

    let mut ctx = ParserContext::register(&mut options).unwrap();
    assert!(!ctx.options()[0].is_present());
    let (result, _) = run(&mut ctx, &["--optimise", "5", "other.txt"]);
    result.unwrap();
    assert_eq!(ctx.options()[0].arg_int(0), Some(5));
}

#[test]
fn test_reregistration_after_partial_extraction() {
    let mut options = vec![CmdOption::new().long("pair").format("n-n", 2)];
    {
        let mut ctx = ParserContext::register(&mut options).unwrap();
        let (result, _) = run(&mut ctx, &["--pair", "1"]);
        assert!(matches!(
            result,
            Err(ParseError::InsufficientArguments {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    let mut ctx = ParserContext::register(&mut options).unwrap();
    assert!(ctx.options()[0].args().is_none());
    let (result, _) = run(&mut ctx, &["--pair", "1", "2"]);
    result.unwrap();
    assert_eq!(
        ctx.options()[0].args().unwrap(),
        &[ArgValue::Integer(1), ArgValue::Integer(2)]
    );
}

#[test]
fn test_reregistration_keeps_caller_defaults() {
    let mut options = vec![CmdOption::new()
        .long("level")
        .format("n", 1)
        .default_args(vec![ArgValue::Integer(2)])];
    {
        let mut ctx = ParserContext::register(&mut options).unwrap();
        let (result, _) = run(&mut ctx, &["--level", "5"]);
        result.unwrap();
    }

    let ctx = ParserContext::register(&mut options).unwrap();
    let buffer = ctx.options()[0].arg_buffer().unwrap();
    assert_eq!(buffer.origin, BufferOrigin::CallerProvided);
    assert_eq!(buffer.values, vec![ArgValue::Integer(5)]);
}

#[test]
fn test_malformed_formats_fail_registration() {
    for format in ["ss", "s-", "x", "s_n", "n-s-"] {
        let mut options = vec![CmdOption::new().long("bad").format(format, 1)];
        let err = ParserContext::register(&mut options).unwrap_err();
        assert!(
            matches!(err, RegistrationError::MalformedSchema { index: 0, .. }),
            "format {:?} gave {:?}",
            format,
            err
        );
    }
}
