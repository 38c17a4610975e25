use clap::{Parser, ValueEnum};
use deft_expression::{FunctionalProgram, Style};
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputStyle {
    Cxx,
    Plain,
}

impl From<OutputStyle> for Style {
    fn from(style: OutputStyle) -> Self {
        match style {
            OutputStyle::Cxx => Style::Cxx,
            OutputStyle::Plain => Style::Plain,
        }
    }
}

/// Common-subexpression code generator for Deft functionals.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Path to file holding the functional's formula.
    #[arg(index = 1)]
    program_file: String,

    /// Indicates that PROGRAM_FILE should be interpreted as an in-line formula.
    #[arg(short)]
    e: bool,

    /// Differentiate the formula with respect to this variable first.
    #[arg(long, value_name = "VAR")]
    derive: Option<String>,

    /// Style of the generated code.
    #[arg(long, value_enum, default_value_t = OutputStyle::Cxx)]
    style: OutputStyle,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("parsed CLI args = {:?}", args);
    let source = if args.e {
        args.program_file
    } else {
        match fs::read_to_string(args.program_file) {
            Ok(x) => x,
            Err(err) => {
                println!("Could not read source: {}", err);
                return;
            }
        }
    };

    let mut program = match FunctionalProgram::compile(&source) {
        Ok(program) => program,
        Err(err) => {
            println!("Parsing error: {}", err);
            return;
        }
    };

    if let Some(var) = args.derive {
        if let Err(err) = program.derive(&var) {
            println!("Differentiation error: {}", err);
            return;
        }
    }

    match program.to_source(args.style.into()) {
        Ok(code) => print!("{}", code),
        Err(err) => println!("Generation error: {}", err),
    }
}
