// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for DuoIO operations.
pub type DuoIOResult<T = ()> = core::result::Result<T, DuoIOError>;

/// Error type for DuoIO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuoIOError {
    Other(&'static str),
    /// Attempted to read or write past the end of the backing store.
    OutOfBounds,
    /// Fewer bytes were available than requested.
    ShortRead,
    Unsupported,
    #[cfg(feature = "std")]
    Os(std::io::ErrorKind),
}

impl DuoIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            DuoIOError::Other(msg) => msg,
            DuoIOError::OutOfBounds => "Out of bounds",
            DuoIOError::ShortRead => "Short read",
            DuoIOError::Unsupported => "Unsupported operation",
            #[cfg(feature = "std")]
            DuoIOError::Os(_) => "OS I/O error",
        }
    }
}

impl From<&'static str> for DuoIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        DuoIOError::Other(msg)
    }
}

impl fmt::Display for DuoIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            DuoIOError::Os(kind) => write!(f, "{} ({kind})", self.msg()),
            _ => write!(f, "{}", self.msg()),
        }
    }
}
