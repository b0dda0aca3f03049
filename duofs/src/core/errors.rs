// SPDX-License-Identifier: MIT

use core::fmt;

pub use duoio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAllocatorError {
    OutOfBlocks,
    InvalidUnit(u64),
    Other(&'static str),
}

impl FsAllocatorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsAllocatorError::OutOfBlocks => "Out of blocks",
            FsAllocatorError::InvalidUnit(_) => "Block outside the allocatable range",
            FsAllocatorError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for FsAllocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let FsAllocatorError::InvalidUnit(offset) = self {
            write!(f, " (offset: {offset})")?;
        }
        Ok(())
    }
}

/// Why a path could not be used for the requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsPathError {
    NotRooted,
    EmptyComponent,
    NameTooLong,
    ExtensionTooLong,
    BadName,
    TooDeep,
    /// Well-formed path at the wrong level for the operation.
    Misplaced,
    NotADirectory,
    IsADirectory,
    Other(&'static str),
}

impl FsPathError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsPathError::NotRooted => "Path is not absolute",
            FsPathError::EmptyComponent => "Empty path component",
            FsPathError::NameTooLong => "Name longer than 8 characters",
            FsPathError::ExtensionTooLong => "Extension longer than 3 characters",
            FsPathError::BadName => "Invalid character in name",
            FsPathError::TooDeep => "Path nested deeper than one directory",
            FsPathError::Misplaced => "Operation not permitted at this level",
            FsPathError::NotADirectory => "Not a directory",
            FsPathError::IsADirectory => "Is a directory",
            FsPathError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for FsPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(DuoIOError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(_) => "IO error",
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsFormatterError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

impl fmt::Display for FsFormatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCheckerError {
    IO(DuoIOError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsCheckerError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCheckerError::IO(_) => "IO error",
            FsCheckerError::Invalid(msg) => msg,
            FsCheckerError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsCheckerError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

impl fmt::Display for FsCheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

/// Error classes surfaced at the operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    NotFound,
    AlreadyExists,
    DirectoryFull,
    NotEmpty,
    InvalidOffset,
    AllocationFailure,
    IOFailure,
    InvalidPath,
    Other,
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(DuoIOError),
    Allocator(FsAllocatorError),
    Path(FsPathError),
    Formatter(FsFormatterError),
    Checker(FsCheckerError),
    NotFound,
    AlreadyExists,
    DirectoryFull,
    NotEmpty,
    InvalidOffset,
    /// On-disk structures do not match the layout.
    Corrupted(&'static str),
    Other(&'static str),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Allocator(e) => e.msg(),
            FsError::Path(e) => e.msg(),
            FsError::Formatter(e) => e.msg(),
            FsError::Checker(e) => e.msg(),
            FsError::NotFound => "No such file or directory",
            FsError::AlreadyExists => "Already exists",
            FsError::DirectoryFull => "Directory is full",
            FsError::NotEmpty => "Directory not empty",
            FsError::InvalidOffset => "Offset beyond end of file",
            FsError::Corrupted(msg) => msg,
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::Formatter(e) => e.source(),
            FsError::Checker(e) => e.source(),
            _ => None,
        }
    }

    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsError::NotFound => FsErrorKind::NotFound,
            FsError::AlreadyExists => FsErrorKind::AlreadyExists,
            FsError::DirectoryFull => FsErrorKind::DirectoryFull,
            FsError::NotEmpty => FsErrorKind::NotEmpty,
            FsError::InvalidOffset => FsErrorKind::InvalidOffset,
            FsError::Allocator(_) => FsErrorKind::AllocationFailure,
            FsError::IO(_) | FsError::Corrupted(_) => FsErrorKind::IOFailure,
            FsError::Formatter(FsFormatterError::IO(_)) => FsErrorKind::IOFailure,
            FsError::Checker(FsCheckerError::IO(_)) => FsErrorKind::IOFailure,
            FsError::Path(_) => FsErrorKind::InvalidPath,
            FsError::Formatter(_) | FsError::Checker(_) | FsError::Other(_) => FsErrorKind::Other,
        }
    }

    /// POSIX errno (positive) for the dispatcher boundary.
    pub fn errno(&self) -> i32 {
        match self {
            FsError::Path(e) => match e {
                FsPathError::NameTooLong | FsPathError::ExtensionTooLong => libc::ENAMETOOLONG,
                FsPathError::TooDeep | FsPathError::Misplaced => libc::EPERM,
                FsPathError::NotADirectory => libc::ENOTDIR,
                FsPathError::IsADirectory => libc::EISDIR,
                FsPathError::BadName | FsPathError::Other(_) => libc::EINVAL,
                FsPathError::NotRooted | FsPathError::EmptyComponent => libc::ENOENT,
            },
            _ => match self.kind() {
                FsErrorKind::NotFound => libc::ENOENT,
                FsErrorKind::AlreadyExists => libc::EEXIST,
                FsErrorKind::DirectoryFull | FsErrorKind::AllocationFailure => libc::ENOSPC,
                FsErrorKind::NotEmpty => libc::ENOTEMPTY,
                FsErrorKind::InvalidOffset => libc::EINVAL,
                FsErrorKind::IOFailure => libc::EIO,
                FsErrorKind::InvalidPath | FsErrorKind::Other => libc::EINVAL,
            },
        }
    }
}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsAllocatorResult<T = ()> = Result<T, FsAllocatorError>;
pub type FsPathResult<T = ()> = Result<T, FsPathError>;
pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
pub type FsCheckerResult<T = ()> = Result<T, FsCheckerError>;

crate::fs_error_wiring! {
    top => FsError {
        DuoIOError       : IO,
        FsAllocatorError : Allocator,
        FsPathError      : Path,
        FsFormatterError : Formatter,
        FsCheckerError   : Checker,
    },
    str_into => [
        FsAllocatorError,
        FsPathError,
        FsFormatterError,
        FsCheckerError,
    ],
    sub => {
        DuoIOError => [ FsFormatterError::IO, FsCheckerError::IO ],
    },
}
