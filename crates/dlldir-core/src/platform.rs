use std::path::Path;

use crate::error::Result;
use crate::inject::prepend_env_path;

/// Mechanism used to make a directory visible to native dependency
/// resolution. Resolved once at process start, applied at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Explicit registration through `AddDllDirectory`. Preferred on
    /// Windows: it leaves `PATH` untouched, and the loader consults it even
    /// for transitive DLL dependencies of extension modules, which ignore
    /// `PATH` entirely (CPython issue 80266).
    #[cfg(windows)]
    DllDirectory,

    /// Prepend to `PATH`. Fallback for Windows runtimes that predate
    /// `AddDllDirectory`; only partially mitigates the loader quirk.
    PathPrepend,

    /// Prepend to `LD_LIBRARY_PATH`. The POSIX dynamic linker honors the
    /// variable, so no special API is needed.
    LdLibraryPath,
}

impl Strategy {
    /// Pick the injection mechanism for the host platform.
    pub fn detect() -> Result<Self> {
        #[cfg(windows)]
        return Ok(if win::add_dll_directory_fn().is_some() {
            Strategy::DllDirectory
        } else {
            Strategy::PathPrepend
        });

        #[cfg(unix)]
        return Ok(Strategy::LdLibraryPath);

        #[cfg(not(any(unix, windows)))]
        return Err(crate::error::Error::UnsupportedPlatform(
            std::env::consts::OS,
        ));
    }

    /// Make `dir` visible to native dependency resolution for the rest of
    /// the process lifetime. Mutates process-wide state; returns a one-line
    /// description of what was done, for verbose output.
    pub fn inject(self, dir: &Path) -> Result<String> {
        match self {
            #[cfg(windows)]
            Strategy::DllDirectory => {
                win::add_dll_directory(dir).map_err(|source| {
                    crate::error::Error::RegisterDllDirectory {
                        path: dir.to_path_buf(),
                        source,
                    }
                })?;
                Ok(format!("added dll directory {}", dir.display()))
            }
            Strategy::PathPrepend => {
                prepend_env_path("PATH", dir);
                Ok(format!("added {} to PATH", dir.display()))
            }
            Strategy::LdLibraryPath => {
                prepend_env_path("LD_LIBRARY_PATH", dir);
                Ok(format!("added {} to LD_LIBRARY_PATH", dir.display()))
            }
        }
    }
}

#[cfg(windows)]
mod win {
    use std::ffi::{OsStr, c_void};
    use std::io;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;

    use windows_sys::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};

    type AddDllDirectoryFn = unsafe extern "system" fn(*const u16) -> *mut c_void;

    fn wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(once(0)).collect()
    }

    /// Look up `AddDllDirectory` at runtime; it is absent from kernel32 on
    /// runtimes older than KB2533623.
    pub(crate) fn add_dll_directory_fn() -> Option<AddDllDirectoryFn> {
        let kernel32 = wide(OsStr::new("kernel32.dll"));
        unsafe {
            let module = GetModuleHandleW(kernel32.as_ptr());
            if module.is_null() {
                return None;
            }
            let proc = GetProcAddress(module, c"AddDllDirectory".as_ptr().cast())?;
            Some(std::mem::transmute::<
                unsafe extern "system" fn() -> isize,
                AddDllDirectoryFn,
            >(proc))
        }
    }

    pub(crate) fn add_dll_directory(dir: &Path) -> io::Result<()> {
        let func = add_dll_directory_fn().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, "AddDllDirectory unavailable")
        })?;
        let dir_w = wide(dir.as_os_str());
        let cookie = unsafe { func(dir_w.as_ptr()) };
        if cookie.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
