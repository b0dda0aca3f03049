// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};

use duoio::DuoIO;

use crate::{
    core::{allocator::FsAllocator, errors::*},
    fs::duo::{allocator::*, cursor, store::DuoStore, types::*},
};

/// A directory found in the root block.
#[derive(Debug, Clone, Copy)]
pub struct DirRef {
    pub slot: usize,
    pub entry: DuoDirEntry,
}

impl DirRef {
    pub fn block(&self) -> u64 {
        self.entry.start_block()
    }
}

/// A file found in a directory block.
#[derive(Debug, Clone, Copy)]
pub struct FileRef {
    pub dir_block: u64,
    pub slot: usize,
    pub entry: DuoFileEntry,
}

pub fn find_directory<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    name: &str,
) -> FsResult<DirRef> {
    let root = store.read_root()?;
    let slot = root.find(name)?.ok_or(FsError::NotFound)?;
    Ok(DirRef {
        slot,
        entry: root.dirs[slot],
    })
}

/// Directory names in stored order.
pub fn list_directories<IO: DuoIO + ?Sized>(store: &mut DuoStore<'_, IO>) -> FsResult<Vec<String>> {
    let root = store.read_root()?;
    root.entries()?
        .iter()
        .map(|d| d.name().map(String::from))
        .collect()
}

/// Adds a directory with a fresh, empty block.
///
/// The directory block is written before the root, so a failure in between
/// leaves only an unreferenced block behind.
pub fn create_directory<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    alloc: &mut DuoAllocator,
    name: &str,
) -> FsResult<DirRef> {
    let mut root = store.read_root()?;
    crate::ensure!(root.find(name)?.is_none(), FsError::AlreadyExists);
    crate::ensure!(!root.is_full(), FsError::DirectoryFull);

    let handle = alloc.allocate_unit()?;
    let entry = DuoDirEntry::new(name, handle.block);

    let persisted = store
        .write_dir(handle.block, &DuoDirBlock::empty())
        .and_then(|_| root.push(entry))
        .and_then(|slot| store.write_root(&root).map(|_| slot));

    match persisted {
        Ok(slot) => Ok(DirRef { slot, entry }),
        Err(e) => {
            alloc.release(&handle)?;
            Err(e)
        }
    }
}

pub fn remove_directory<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    alloc: &mut DuoAllocator,
    name: &str,
) -> FsResult {
    let mut root = store.read_root()?;
    let slot = root.find(name)?.ok_or(FsError::NotFound)?;
    let block = root.dirs[slot].start_block();

    let dir = store.read_dir(block)?;
    crate::ensure!(dir.count() == 0, FsError::NotEmpty);

    root.remove(slot)?;
    store.write_root(&root)?;
    alloc.release(&DuoHandle::new(block))?;
    Ok(())
}

pub fn find_file<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    dir: &DirRef,
    name: &str,
    ext: &str,
) -> FsResult<FileRef> {
    let block = store.read_dir(dir.block())?;
    let slot = block.find(name, ext)?.ok_or(FsError::NotFound)?;
    Ok(FileRef {
        dir_block: dir.block(),
        slot,
        entry: block.files[slot],
    })
}

/// File names (`name.ext`) in stored order.
pub fn list_files<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    dir: &DirRef,
) -> FsResult<Vec<String>> {
    let block = store.read_dir(dir.block())?;
    block.entries()?.iter().map(DuoFileEntry::display_name).collect()
}

/// Adds an empty file (size 0, no data block).
pub fn create_file<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    dir: &DirRef,
    name: &str,
    ext: &str,
) -> FsResult<FileRef> {
    let mut block = store.read_dir(dir.block())?;
    crate::ensure!(block.find(name, ext)?.is_none(), FsError::AlreadyExists);

    let entry = DuoFileEntry::new(name, ext);
    let slot = block.push(entry)?;
    store.write_dir(dir.block(), &block)?;
    Ok(FileRef {
        dir_block: dir.block(),
        slot,
        entry,
    })
}

/// Drops the entry, then returns its whole chain to the allocator.
pub fn remove_file<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    alloc: &mut DuoAllocator,
    dir: &DirRef,
    name: &str,
    ext: &str,
) -> FsResult {
    let mut block = store.read_dir(dir.block())?;
    let slot = block.find(name, ext)?.ok_or(FsError::NotFound)?;
    let chain = cursor::collect_offsets(store, block.files[slot].start_block())?;

    block.remove(slot)?;
    store.write_dir(dir.block(), &block)?;
    alloc.release(&DuoHandle::from_chain(chain))?;
    Ok(())
}

/// Writes `file.entry` back into its slot.
pub fn update_file<IO: DuoIO + ?Sized>(store: &mut DuoStore<'_, IO>, file: &FileRef) -> FsResult {
    let mut block = store.read_dir(file.dir_block)?;
    crate::ensure!(
        file.slot < block.entries()?.len(),
        FsError::Corrupted("File slot vanished from its directory")
    );
    block.files[file.slot] = file.entry;
    store.write_dir(file.dir_block, &block)
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;
    use crate::fs::duo::{constant::*, meta::DuoMeta};
    use duoio::prelude::*;

    const BLOCKS: u64 = 16;

    fn setup<'a, 'b>(io: &'a mut MemDuoIO<'b>) -> (DuoStore<'a, MemDuoIO<'b>>, DuoAllocator) {
        let meta = DuoMeta::new(BLOCKS * BLOCK_SIZE as u64);
        let alloc = DuoAllocator::new(&meta);
        (DuoStore::new(io, meta), alloc)
    }

    #[test]
    fn test_create_then_find_directory() {
        let mut buf = vec![0u8; BLOCKS as usize * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let (mut store, mut alloc) = setup(&mut io);

        let docs = create_directory(&mut store, &mut alloc, "docs").unwrap();
        let found = find_directory(&mut store, "docs").unwrap();

        assert_eq!(found.block(), docs.block());
        assert_eq!(found.block(), BLOCK_SIZE as u64);
        assert_eq!(store.read_dir(found.block()).unwrap().count(), 0);
    }

    #[test]
    fn test_duplicate_directory_is_rejected() {
        let mut buf = vec![0u8; BLOCKS as usize * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let (mut store, mut alloc) = setup(&mut io);

        create_directory(&mut store, &mut alloc, "docs").unwrap();
        let err = create_directory(&mut store, &mut alloc, "docs").unwrap_err();

        assert_eq!(err, FsError::AlreadyExists);
        assert_eq!(store.read_root().unwrap().count(), 1);
        assert_eq!(alloc.used_units(), 1);
    }

    #[test]
    fn test_remove_directory_keeps_order_and_frees_block() {
        let mut buf = vec![0u8; BLOCKS as usize * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let (mut store, mut alloc) = setup(&mut io);

        for name in ["a", "b", "c"] {
            create_directory(&mut store, &mut alloc, name).unwrap();
        }
        let b = find_directory(&mut store, "b").unwrap();
        remove_directory(&mut store, &mut alloc, "b").unwrap();

        assert_eq!(list_directories(&mut store).unwrap(), ["a", "c"]);
        assert!(!alloc.is_used(b.block()));
        assert_eq!(
            remove_directory(&mut store, &mut alloc, "b"),
            Err(FsError::NotFound)
        );
    }

    #[test]
    fn test_files_are_listed_and_removed() {
        let mut buf = vec![0u8; BLOCKS as usize * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let (mut store, mut alloc) = setup(&mut io);

        let dir = create_directory(&mut store, &mut alloc, "docs").unwrap();
        create_file(&mut store, &dir, "notes", "txt").unwrap();
        create_file(&mut store, &dir, "readme", "").unwrap();

        assert_eq!(list_files(&mut store, &dir).unwrap(), ["notes.txt", "readme"]);
        assert_eq!(
            create_file(&mut store, &dir, "notes", "txt").unwrap_err(),
            FsError::AlreadyExists
        );
        assert_eq!(
            remove_directory(&mut store, &mut alloc, "docs"),
            Err(FsError::NotEmpty)
        );

        remove_file(&mut store, &mut alloc, &dir, "notes", "txt").unwrap();
        assert_eq!(list_files(&mut store, &dir).unwrap(), ["readme"]);
        assert_eq!(
            find_file(&mut store, &dir, "notes", "txt").unwrap_err(),
            FsError::NotFound
        );
    }

    #[test]
    fn test_full_directory_rejects_new_files() {
        let mut buf = vec![0u8; BLOCKS as usize * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let (mut store, mut alloc) = setup(&mut io);

        let dir = create_directory(&mut store, &mut alloc, "docs").unwrap();
        for i in 0..MAX_FILES_IN_DIR {
            create_file(&mut store, &dir, &format!("f{i}"), "").unwrap();
        }
        assert_eq!(
            create_file(&mut store, &dir, "extra", "").unwrap_err(),
            FsError::DirectoryFull
        );
    }
}
