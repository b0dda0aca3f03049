// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use crate::fs::duo::{constant::*, types::DuoFileEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuoKind {
    Directory,
    File,
}

/// Answer to an attribute query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuoAttr {
    pub kind: DuoKind,
    pub mode: u32,
    pub nlink: u32,
    pub size: u64,
}

impl DuoAttr {
    pub fn dir() -> Self {
        Self {
            kind: DuoKind::Directory,
            mode: DIR_MODE,
            nlink: DIR_NLINK,
            size: 0,
        }
    }

    pub fn file(size: u64) -> Self {
        Self {
            kind: DuoKind::File,
            mode: FILE_MODE,
            nlink: FILE_NLINK,
            size,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == DuoKind::Directory
    }
}

impl From<&DuoFileEntry> for DuoAttr {
    fn from(entry: &DuoFileEntry) -> Self {
        Self::file(entry.size())
    }
}

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuoDirent {
    pub name: String,
    pub kind: DuoKind,
}

impl DuoDirent {
    pub fn new(name: impl Into<String>, kind: DuoKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
