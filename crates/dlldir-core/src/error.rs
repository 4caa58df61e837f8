use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(&'static str),

    #[error("failed to register dll directory {path}: {source}")]
    RegisterDllDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
