//! Command-line driver: preprocess, compile, and write the assembly file.
//!
//! The driver owns everything the library deliberately does not: argument
//! handling, shelling out to the system C preprocessor, and file I/O. All
//! diagnostics go to stderr and any failure exits nonzero without claiming
//! an output artifact was produced.

use clap::Parser;
use rmcc::CompileError;
use snafu::{ResultExt, Snafu};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};

#[derive(Debug, Parser)]
#[command(
  name = "rmcc",
  version,
  about = "A very basic C compiler emitting 32-bit x86 assembly"
)]
struct Cli {
  /// C source file to compile
  file: PathBuf,

  /// Print the syntax tree instead of compiling
  #[arg(long, conflicts_with = "dump_expansion")]
  dump_ast: bool,

  /// Print the macro-expanded source instead of compiling
  #[arg(long)]
  dump_expansion: bool,

  /// Path of the generated assembly file
  #[arg(short, long, default_value = "out.s")]
  output: PathBuf,
}

#[derive(Debug, Snafu)]
enum DriverError {
  #[snafu(display("macro expansion failed: could not run gcc: {source}"))]
  PreprocessorSpawn { source: std::io::Error },

  #[snafu(display("macro expansion failed:\n{stderr}"))]
  Preprocessor { stderr: String },

  #[snafu(display("macro expansion produced invalid UTF-8: {source}"))]
  PreprocessorEncoding { source: std::string::FromUtf8Error },

  #[snafu(transparent)]
  Compile { source: CompileError },

  #[snafu(display("could not write '{path}': {source}"))]
  WriteOutput {
    path: String,
    source: std::io::Error,
  },
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = run(&cli) {
    eprintln!("{err}");
    process::exit(1);
  }
}

fn run(cli: &Cli) -> Result<(), DriverError> {
  let expanded = macro_expand(&cli.file)?;

  if cli.dump_expansion {
    print!("{expanded}");
    return Ok(());
  }

  if cli.dump_ast {
    let tree = rmcc::parse_program(&expanded)?;
    print!("{}", tree.dump());
    return Ok(());
  }

  let asm = rmcc::generate_assembly(&expanded)?;
  fs::write(&cli.output, asm).context(WriteOutputSnafu {
    path: cli.output.display().to_string(),
  })?;

  println!("Written {}.", cli.output.display());
  println!("Build it with:");
  println!("    $ as --32 {} -o out.o", cli.output.display());
  println!("    $ ld -m elf_i386 -s -o out out.o");

  Ok(())
}

/// Run the source through the system C preprocessor, as the compiler has no
/// preprocessor of its own. The tokenizer skips the `#` linemarkers gcc
/// leaves in the expansion.
fn macro_expand(file: &Path) -> Result<String, DriverError> {
  let output = Command::new("gcc")
    .arg("-E")
    .arg(file)
    .output()
    .context(PreprocessorSpawnSnafu)?;

  if !output.status.success() {
    return Err(DriverError::Preprocessor {
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    });
  }

  String::from_utf8(output.stdout).context(PreprocessorEncodingSnafu)
}
