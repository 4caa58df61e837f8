use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;

use dlldir_core::prepend_env_path;

/// Variable the delegate's interpreter consults when importing modules.
const MODULE_PATH_VAR: &str = "PYTHONPATH";

/// Zip local-file, empty-archive, and spanned-archive signatures. Sniffed
/// rather than matched by extension so `.pyz` and friends count too.
const ZIP_MAGICS: [&[u8; 4]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

fn is_zip_archive(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    match File::open(path).and_then(|mut file| file.read_exact(&mut magic)) {
        Ok(()) => ZIP_MAGICS.contains(&&magic),
        Err(_) => false,
    }
}

/// Directories and zip archives are importable roots on their own: the
/// interpreter's path-running machinery puts them on the module path
/// itself. A plain script file gets no such treatment from the "run a
/// file" primitive, even though direct invocation would provide it.
fn is_importable_root(path: &Path) -> bool {
    path.is_dir() || is_zip_archive(path)
}

/// Hand control to `program` with `args` as its argument vector. Never
/// returns: either the delegate takes over the process (and its exit
/// status becomes ours, verbatim), or the transfer fails and we exit 127.
pub fn delegate(program: &Path, args: Vec<OsString>, verbose: bool) -> ! {
    if !is_importable_root(program)
        && let Some(parent) = program.parent()
    {
        prepend_env_path(MODULE_PATH_VAR, parent);
        if verbose {
            eprintln!(
                "dlldir: added {} to {}",
                parent.display(),
                MODULE_PATH_VAR
            );
        }
    }

    let mut command = Command::new(program);
    command.args(args);

    let err = transfer(command);
    eprintln!("dlldir: failed to execute {}: {}", program.display(), err);
    std::process::exit(127);
}

/// Replace the process image; only returns on failure.
#[cfg(unix)]
fn transfer(mut command: Command) -> std::io::Error {
    use std::os::unix::process::CommandExt;

    command.exec()
}

/// No in-process replacement on Windows: run the delegate as a child with
/// our (already mutated) environment and propagate its exit code.
#[cfg(windows)]
fn transfer(mut command: Command) -> std::io::Error {
    match command.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => err,
    }
}
