// SPDX-License-Identifier: MPL-2.0
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Io(String),
    Config(String),
    /// The directory could not be listed while rebuilding the image list.
    DirectoryAccess(String),
    /// A path is not part of the current image list; the list must be rebuilt.
    NotFound(PathBuf),
    /// Navigation was attempted on an empty image list.
    Empty,
    Decode(String),
}

impl Error {
    /// Returns true for errors that should be shown to the user.
    ///
    /// `Empty` is a silent no-op and `NotFound` means the caller is out of sync
    /// with the list, which is fixed by rebuilding rather than reporting.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Error::Empty | Error::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::DirectoryAccess(e) => write!(f, "Directory Error: {}", e),
            Error::NotFound(path) => write!(f, "Not in image list: {}", path.display()),
            Error::Empty => write!(f, "Image list is empty"),
            Error::Decode(e) => write!(f, "Decode Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
