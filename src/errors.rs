//! Error types.

use std::path::PathBuf;

use crate::window::WindowHandle;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A layout file or directory could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A layout document could not be encoded or decoded.
    #[error("malformed layout document: {0}")]
    Json(#[from] serde_json::Error),
    /// Text handed over by the window system was not valid UTF-8.
    #[error("invalid text encoding: {0}")]
    Encoding(String),
    /// The configuration file exists but could not be parsed.
    #[error("invalid configuration {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A layout name that cannot be used as a file name.
    #[error("invalid layout name {0:?}")]
    InvalidName(String),
    /// A window closed between enumeration and use.
    #[error("window {0} no longer exists")]
    WindowGone(WindowHandle),
    /// The window system refused a request.
    #[error("window system error: {0}")]
    Backend(String),
    /// A capability this platform does not provide.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    /// Some resource was not found.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

pub type WinResult<T> = Result<T, Error>;
