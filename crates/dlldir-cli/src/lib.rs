// NOTE: dlldir exists because of a CPython loader quirk: when an extension
// module drags in native DLLs transitively, the interpreter ignores PATH
// while resolving them (CPython issue 80266). The wrapper injects a search
// directory through whatever mechanism the platform actually honors, then
// hands control to the target program as if it had been started directly.
//
// Control flow is strictly parse -> inject -> delegate; the delegate step
// never returns on success.

mod args;
mod commands;
mod exec;

pub use args::{Cli, parse_args};
pub use commands::run;
