// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::{
    core::errors::*,
    fs::duo::{constant::*, utils},
};

/// One file slot of a subdirectory block.
#[repr(C, packed)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
pub struct DuoFileEntry {
    pub name: [u8; NAME_FIELD_LEN],
    pub ext: [u8; EXT_FIELD_LEN],
    /// File length in bytes.
    pub size: u64,
    /// First data block, or [`NO_BLOCK`] while the file is empty.
    pub start_block: u64,
}

const _: () = assert!(size_of::<DuoFileEntry>() == FILE_ENTRY_SIZE);

impl DuoFileEntry {
    pub fn new(name: &str, ext: &str) -> Self {
        Self {
            name: utils::encode_name(name),
            ext: utils::encode_name(ext),
            size: 0,
            start_block: NO_BLOCK,
        }
    }

    pub fn name(&self) -> FsResult<&str> {
        utils::decode_name(&self.name)
    }

    pub fn ext(&self) -> FsResult<&str> {
        utils::decode_name(&self.ext)
    }

    /// `name.ext`, or `name` alone when the extension is empty.
    pub fn display_name(&self) -> FsResult<String> {
        let name = self.name()?;
        let ext = self.ext()?;
        Ok(if ext.is_empty() {
            String::from(name)
        } else {
            format!("{name}.{ext}")
        })
    }

    pub fn matches(&self, name: &str, ext: &str) -> bool {
        utils::name_eq(&self.name, name) && utils::name_eq(&self.ext, ext)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn start_block(&self) -> u64 {
        self.start_block
    }

    pub fn is_empty(&self) -> bool {
        self.start_block == NO_BLOCK
    }
}

/// Subdirectory Block: the file table of one directory.
#[repr(C, packed)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
pub struct DuoDirBlock {
    pub file_count: u32,
    pub files: [DuoFileEntry; MAX_FILES_IN_DIR],
    pub padding: [u8; DIR_PADDING],
}

const _: () = assert!(size_of::<DuoDirBlock>() == BLOCK_SIZE);

impl DuoDirBlock {
    pub fn empty() -> Self {
        Self::new_zeroed()
    }

    pub fn count(&self) -> usize {
        self.file_count as usize
    }

    pub fn entries(&self) -> FsResult<&[DuoFileEntry]> {
        let count = self.count();
        crate::ensure!(
            count <= MAX_FILES_IN_DIR,
            FsError::Corrupted("Directory file count exceeds capacity")
        );
        Ok(&self.files[..count])
    }

    pub fn find(&self, name: &str, ext: &str) -> FsResult<Option<usize>> {
        Ok(self.entries()?.iter().position(|f| f.matches(name, ext)))
    }

    pub fn push(&mut self, entry: DuoFileEntry) -> FsResult<usize> {
        let count = self.entries()?.len();
        crate::ensure!(count < MAX_FILES_IN_DIR, FsError::DirectoryFull);
        self.files[count] = entry;
        self.file_count = (count + 1) as u32;
        Ok(count)
    }

    pub fn remove(&mut self, idx: usize) -> FsResult<DuoFileEntry> {
        let count = self.entries()?.len();
        crate::ensure!(idx < count, FsError::NotFound);
        let removed = self.files[idx];
        self.files.copy_within(idx + 1..count, idx);
        self.files[count - 1] = DuoFileEntry::new_zeroed();
        self.file_count = (count - 1) as u32;
        Ok(removed)
    }
}
