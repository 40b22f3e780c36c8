use std::fs::{read_to_string, remove_file, write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use advcalc2ir::ir::interpret;
use advcalc2ir::{Compiler, CompilerOptions, DEFAULT_MAX_VARIABLES};

#[derive(Parser)]
#[clap(about, version, author)]
struct Args {
    /// The file to compile
    #[clap(short, long)]
    target: PathBuf,

    /// Where to write the module (defaults to the target with an `.ll` extension)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of distinct variables
    #[clap(long, default_value_t = DEFAULT_MAX_VARIABLES)]
    max_variables: usize,

    /// Execute the compiled module and print its output
    #[clap(long)]
    run: bool,

    /// Log verbosity (0 = errors only)
    #[clap(short, long, default_value_t = 1)]
    verbosity: usize,

    /// Silence all logging
    #[clap(short, long)]
    quiet: bool,
}

fn output_path(target: &Path) -> PathBuf {
    target.with_extension("ll")
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        .verbosity(args.verbosity)
        .init()
        .context("unable to initialise logging")?;

    let contents = read_to_string(&args.target).context("unable to open source file")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| output_path(&args.target));

    let mut compiler = Compiler::with_options(CompilerOptions {
        max_variables: args.max_variables,
    });
    for line in contents.lines() {
        compiler.feed(line);
    }

    match compiler.finish() {
        Ok(module) => {
            write(&output, module.to_string())
                .with_context(|| format!("unable to write {}", output.display()))?;
            info!("wrote {}", output.display());
            if args.run {
                for value in interpret(&module)? {
                    println!("{value}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                println!("{diagnostic}");
            }
            if output.exists() {
                remove_file(&output)
                    .with_context(|| format!("unable to remove {}", output.display()))?;
                info!("removed {}", output.display());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
