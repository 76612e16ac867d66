//! Host program for a two-option optimiser.
//!
//! ```text
//! cargo run --example optimiser -- --optimise 3 myinput.txt
//! ```

use anyhow::{Context, Result};
use cmdline::{CmdOption, ParseOutcome, ParserContext, ProgramInfo};

fn main() -> Result<()> {
    let mut options = vec![
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
    ];

    let program = ProgramInfo::new("Optimiser")
        .version("0.0.1")
        .copyright("Copyright(C) John Doe 2021-25");

    let mut ctx = ParserContext::register(&mut options)
        .context("invalid option table")?
        .with_program(program);

    let argv: Vec<String> = std::env::args().collect();
    if ctx.parse_argv(&argv)? == ParseOutcome::HelpShown {
        return Ok(());
    }

    let level = ctx.options()[0].arg_int(0).unwrap_or_default();
    let file = ctx.options()[1].arg_str(0).unwrap_or_default().to_string();
    println!("optimising {} at level {}", file, level);

    ctx.teardown();
    Ok(())
}
