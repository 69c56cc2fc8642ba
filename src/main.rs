use std::{fs, process, sync::Once};

use clap::Parser;
use semtree::{interpreter::console::StdConsole, parse_source, run_program};

static TRACING_INIT: Once = Once::new();

/// semtree runs programs written in a small Pascal-like teaching language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells semtree to treat the contents as a path to a source file.
    #[arg(short, long)]
    file: bool,

    /// Prints the rendered top-level statements before running the program.
    #[arg(short, long)]
    dump_tree: bool,

    /// Logs parse and execution milestones to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

/// Installs the stderr log subscriber.
///
/// `--verbose` forces the `debug` level; otherwise `RUST_LOG` decides, and
/// nothing is logged when it is unset.
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = if verbose {
            EnvFilter::new("debug")
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };
        tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                        .with_target(true)
                                                        .with_level(true))
                                      .with(filter)
                                      .init();
    });
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            process::exit(1);
        })
    } else {
        args.contents
    };

    let program = match parse_source(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    };

    if args.dump_tree {
        for statement in program.render_top_level() {
            println!("{statement}");
        }
        println!("----------");
    }

    if let Err(e) = run_program(&program, &mut StdConsole) {
        eprintln!("{e}");
        process::exit(1);
    }
}
