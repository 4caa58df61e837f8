use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Separator between entries of a search-path style variable on this
/// platform.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Build the new value of a search-path variable with `dir` prepended.
///
/// `None` yields just `dir`, with no trailing separator. An existing value
/// is kept verbatim as the suffix; entries are never deduplicated, so
/// prepending the same directory twice leaves two entries.
pub fn prepend_path_list(dir: &OsStr, existing: Option<&OsStr>, separator: char) -> OsString {
    let mut value = OsString::from(dir);
    if let Some(existing) = existing {
        let mut buf = [0u8; 4];
        value.push(separator.encode_utf8(&mut buf));
        value.push(existing);
    }
    value
}

/// Prepend `dir` to the path-list variable `var`, for this process and
/// everything it executes from now on.
pub fn prepend_env_path(var: &str, dir: &Path) {
    let existing = env::var_os(var);
    let value = prepend_path_list(dir.as_os_str(), existing.as_deref(), PATH_LIST_SEPARATOR);
    // The launcher is single-threaded; no other thread can be reading the
    // environment while we write it.
    unsafe {
        env::set_var(var, value);
    }
}
