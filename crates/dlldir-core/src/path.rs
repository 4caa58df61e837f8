use std::path::{Component, Path, PathBuf};

/// Resolve a user-supplied path to an absolute, symlink-free form.
///
/// Nonexistent paths are not an error here: they are absolutized against
/// the current directory and cleaned up lexically, then handed onward so
/// the delegate (or the exec call) reports the platform's own not-found
/// error instead of us re-validating.
pub fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        normalize_components(&absolute)
    })
}

/// Lexical cleanup for paths without a filesystem entry: `.` removed,
/// `..` folded into its parent. There is nothing on disk to chase
/// symlinks through, so lexical folding is the best available answer.
fn normalize_components(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut normalized = if let Some(component @ Component::Prefix(..)) = components.peek() {
        let prefix = PathBuf::from(component.as_os_str());
        components.next();
        prefix
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
        }
    }
    normalized
}
