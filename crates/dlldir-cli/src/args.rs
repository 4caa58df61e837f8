use clap::Parser;
use clap::error::ErrorKind;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Flag surface of the launcher. Only ever fed the flag prefix of the
/// invocation; see [`parse_args`] for how the prefix is isolated.
#[derive(Debug, Parser)]
#[command(name = "dlldir")]
#[command(about = "Run a program with an extra native library search directory", long_about = None)]
#[command(version)]
#[command(override_usage = "dlldir [-v] [--] <dll-directory> <program> [<arg>...]")]
struct Flags {
    /// Print diagnostic information
    #[arg(short, long)]
    verbose: bool,
}

/// A fully parsed invocation: flag prefix consumed, the two mandatory
/// positionals isolated, everything after left untouched for the delegate.
#[derive(Debug)]
pub struct Cli {
    pub verbose: bool,
    pub dll_dir: PathBuf,
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

/// Parse the process arguments, exiting with the usage message on
/// malformed invocations.
pub fn parse_args() -> Cli {
    parse_tokens(env::args_os().skip(1).collect())
}

/// Flags are only recognized in a maximal prefix of the invocation,
/// ended by the first non-flag token or a bare `--`. Everything after
/// that prefix is positional: two mandatory paths, then the delegate's
/// argument vector verbatim. A `-v` appearing after the first positional
/// belongs to the delegate, not to us.
fn parse_tokens(tokens: Vec<OsString>) -> Cli {
    let mut split = tokens.len();
    let mut skip_marker = false;
    for (index, token) in tokens.iter().enumerate() {
        if token == "--" {
            split = index;
            skip_marker = true;
            break;
        }
        if !token.as_encoded_bytes().starts_with(b"-") {
            split = index;
            break;
        }
    }

    let prefix = std::iter::once(OsString::from("dlldir")).chain(tokens[..split].iter().cloned());
    let flags = match Flags::try_parse_from(prefix) {
        Ok(flags) => flags,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                std::process::exit(0);
            }
            _ => usage_error(),
        },
    };

    let mut rest = tokens.into_iter().skip(split + usize::from(skip_marker));
    let (Some(dll_dir), Some(program)) = (rest.next(), rest.next()) else {
        usage_error();
    };

    Cli {
        verbose: flags.verbose,
        dll_dir: PathBuf::from(dll_dir),
        program: PathBuf::from(program),
        args: rest.collect(),
    }
}

fn usage_error() -> ! {
    print_usage();
    std::process::exit(1);
}

/// The fixed two-line usage message printed on malformed invocations.
fn print_usage() {
    eprintln!("usage: dlldir [-v] [--] <dll-directory> <program> [<arg>...]");
    eprintln!("options: -v, --verbose  print diagnostic information");
}
