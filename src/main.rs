use std::io::{self, Read};
use std::process::exit;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cool::config::SemantConfig;
use cool::frontend::{process_dump, process_file, AnalyzedProgram, Error};

/// Semantic analyzer of cool programs: reads ast dump, writes typed ast dump
#[derive(Parser)]
#[command(name = "semant")]
#[command(version = "0.1.0")]
#[command(about = "Static semantic analysis of cool programs", long_about = None)]
struct Cli {
    /// Print progress of the analysis to stderr
    #[arg(short = 's', long)]
    debug: bool,

    /// Require class Main with method main()
    #[arg(long)]
    require_main: bool,

    /// Path to the ast dump, stdin if not given
    #[arg(value_name = "INPUT")]
    input: Option<String>,
}

/// RUST_LOG wins, otherwise debug flag selects verbosity; logs go to stderr
fn init_logging(debug: bool) {
    let directive = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// read whole stdin or exit with error
fn read_stdin() -> String {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Failed to read standard input: {}", e);
        exit(1);
    }
    source
}

fn main() {
    let cli = Cli::parse();
    let env_config = SemantConfig::from_env();
    let config = env_config
        .with_debug(cli.debug || env_config.debug)
        .with_require_main(cli.require_main || env_config.require_main);
    init_logging(config.debug);

    let result: Result<AnalyzedProgram, Vec<Error>> = match &cli.input {
        Some(path) => process_file(path, &config),
        None => process_dump("<stdin>", &read_stdin(), &config),
    };
    match result {
        Ok(analyzed) => print!("{}", analyzed.dump()),
        Err(errors) => {
            for e in errors.iter() {
                eprintln!("{}", e);
            }
            eprintln!("Compilation halted due to static semantic errors.");
            exit(1);
        }
    }
}
