//! Platform policy for making a directory visible to native library
//! resolution before control is handed to another program.
//!
//! The interesting part lives in [`Strategy`]: a closed set of injection
//! mechanisms resolved once at startup. The actual list arithmetic is kept
//! as a pure function ([`prepend_path_list`]) so the policy can be tested
//! without touching the process environment.

mod error;
mod inject;
mod path;
mod platform;

pub use error::{Error, Result};
pub use inject::{PATH_LIST_SEPARATOR, prepend_env_path, prepend_path_list};
pub use path::resolve_path;
pub use platform::Strategy;
