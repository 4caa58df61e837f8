use dlldir::{parse_args, run};

fn main() {
    // Reset SIGPIPE to default behavior so a delegate piped to `head` or
    // `less` dies quietly instead of panicking the wrapper
    #[cfg(unix)]
    reset_sigpipe();

    let cli = parse_args();

    if let Err(e) = run(cli) {
        eprintln!("dlldir: {e}");
        std::process::exit(1);
    }
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
