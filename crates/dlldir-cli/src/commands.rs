use crate::args::Cli;
use crate::exec;
use anyhow::Result;
use dlldir_core::{Strategy, resolve_path};

pub fn run(cli: Cli) -> Result<()> {
    let dll_dir = resolve_path(&cli.dll_dir);
    let program = resolve_path(&cli.program);

    let strategy = Strategy::detect()?;
    let message = strategy.inject(&dll_dir)?;
    if cli.verbose {
        eprintln!("dlldir: {message}");
    }

    exec::delegate(&program, cli.args, cli.verbose)
}
