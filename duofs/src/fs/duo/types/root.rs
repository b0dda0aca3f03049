// SPDX-License-Identifier: MIT

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::{
    core::errors::*,
    fs::duo::{constant::*, utils},
};

/// One subdirectory slot of the root block.
#[repr(C, packed)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
pub struct DuoDirEntry {
    pub name: [u8; NAME_FIELD_LEN],
    /// Offset of the directory's block.
    pub start_block: u64,
}

const _: () = assert!(size_of::<DuoDirEntry>() == DIR_ENTRY_SIZE);

impl DuoDirEntry {
    pub fn new(name: &str, start_block: u64) -> Self {
        Self {
            name: utils::encode_name(name),
            start_block,
        }
    }

    pub fn name(&self) -> FsResult<&str> {
        utils::decode_name(&self.name)
    }

    pub fn start_block(&self) -> u64 {
        self.start_block
    }
}

/// Root Directory Block, always at offset 0.
#[repr(C, packed)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
pub struct DuoRootBlock {
    pub dir_count: u32,
    pub dirs: [DuoDirEntry; MAX_DIRS_IN_ROOT],
    pub padding: [u8; ROOT_PADDING],
}

const _: () = assert!(size_of::<DuoRootBlock>() == BLOCK_SIZE);

impl DuoRootBlock {
    pub fn empty() -> Self {
        Self::new_zeroed()
    }

    pub fn count(&self) -> usize {
        self.dir_count as usize
    }

    /// Valid entries, or `Corrupted` if the count exceeds the capacity.
    pub fn entries(&self) -> FsResult<&[DuoDirEntry]> {
        let count = self.count();
        crate::ensure!(
            count <= MAX_DIRS_IN_ROOT,
            FsError::Corrupted("Root directory count exceeds capacity")
        );
        Ok(&self.dirs[..count])
    }

    pub fn find(&self, name: &str) -> FsResult<Option<usize>> {
        Ok(self
            .entries()?
            .iter()
            .position(|d| utils::name_eq(&d.name, name)))
    }

    pub fn is_full(&self) -> bool {
        self.count() >= MAX_DIRS_IN_ROOT
    }

    pub fn push(&mut self, entry: DuoDirEntry) -> FsResult<usize> {
        let count = self.entries()?.len();
        crate::ensure!(count < MAX_DIRS_IN_ROOT, FsError::DirectoryFull);
        self.dirs[count] = entry;
        self.dir_count = (count + 1) as u32;
        Ok(count)
    }

    /// Removes slot `idx`, shifting later entries down to keep stored order.
    pub fn remove(&mut self, idx: usize) -> FsResult<DuoDirEntry> {
        let count = self.entries()?.len();
        crate::ensure!(idx < count, FsError::NotFound);
        let removed = self.dirs[idx];
        self.dirs.copy_within(idx + 1..count, idx);
        self.dirs[count - 1] = DuoDirEntry::new_zeroed();
        self.dir_count = (count - 1) as u32;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_block() {
        assert_eq!(MAX_DIRS_IN_ROOT, 29);
        assert_eq!(ROOT_PADDING, 15);
        assert_eq!(core::mem::offset_of!(DuoRootBlock, dirs), 4);
    }

    #[test]
    fn test_push_find_remove_keeps_order() {
        let mut root = DuoRootBlock::empty();
        root.push(DuoDirEntry::new("a", 512)).unwrap();
        root.push(DuoDirEntry::new("b", 1024)).unwrap();
        root.push(DuoDirEntry::new("c", 1536)).unwrap();

        assert_eq!(root.find("b").unwrap(), Some(1));
        let removed = root.remove(0).unwrap();
        assert_eq!(removed.start_block(), 512);

        let names: Vec<_> = root
            .entries()
            .unwrap()
            .iter()
            .map(|d| d.name().unwrap())
            .collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(root.find("a").unwrap(), None);
    }

    #[test]
    fn test_full_root_rejects_push() {
        let mut root = DuoRootBlock::empty();
        for i in 0..MAX_DIRS_IN_ROOT {
            root.push(DuoDirEntry::new("d", (i as u64 + 1) * 512)).unwrap();
        }
        assert!(root.is_full());
        assert_eq!(root.push(DuoDirEntry::new("x", 0)), Err(FsError::DirectoryFull));
    }

    #[test]
    fn test_oversized_count_is_corrupted() {
        let mut root = DuoRootBlock::empty();
        root.dir_count = MAX_DIRS_IN_ROOT as u32 + 1;
        assert!(matches!(root.entries(), Err(FsError::Corrupted(_))));
    }
}
