// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use duoio::DuoIO;

use crate::{
    core::{allocator::FsAllocator, errors::*},
    fs::duo::{
        allocator::DuoAllocator,
        attr::*,
        constant::*,
        cursor::ChainCursor,
        directory::{self, DirRef, FileRef},
        file::{self, blocks_for},
        meta::DuoMeta,
        resolver::{DuoPath, resolve_path},
        store::DuoStore,
    },
};

/// A mounted duofs image.
///
/// Holds the only handle to the backing store between `mount` and `unmount`.
/// Callers serialize access; every operation runs to completion before the next.
pub struct DuoFs<'a, IO: DuoIO + ?Sized> {
    store: DuoStore<'a, IO>,
    allocator: DuoAllocator,
}

impl<'a, IO: DuoIO + ?Sized> DuoFs<'a, IO> {
    /// Mounts an image, deriving geometry from its size.
    pub fn mount(io: &'a mut IO) -> FsResult<Self> {
        let meta = DuoMeta::from_io(io)?;
        Self::mount_with(io, meta)
    }

    /// Mounts with explicit geometry.
    ///
    /// Walks every directory and chain to seed the allocator; a bad count,
    /// link or shared block fails with `Corrupted`.
    pub fn mount_with(io: &'a mut IO, meta: DuoMeta) -> FsResult<Self> {
        crate::ensure!(
            meta.total_blocks >= MIN_IMAGE_BLOCKS,
            FsError::Corrupted("Image smaller than two blocks")
        );
        let mut allocator = DuoAllocator::new(&meta);
        let mut store = DuoStore::new(io, meta);

        let root = store.read_root()?;
        for dir in root.entries()? {
            dir.name()?;
            allocator.mark_used(dir.start_block())?;

            let block = store.read_dir(dir.start_block())?;
            for entry in block.entries()? {
                entry.name()?;
                entry.ext()?;
                let mut cursor = ChainCursor::new(&store, entry.start_block());
                for item in cursor.iter(&mut store) {
                    let (offset, _) = item?;
                    allocator.mark_used(offset)?;
                }
                crate::ensure!(
                    cursor.seen() as usize >= blocks_for(entry.size()),
                    FsError::Corrupted("Data chain shorter than file size")
                );
            }
        }

        Ok(Self { store, allocator })
    }

    /// Flushes the image and gives the backend back.
    pub fn unmount(mut self) -> FsResult<&'a mut IO> {
        self.store.flush()?;
        Ok(self.store.into_inner())
    }

    pub fn meta(&self) -> &DuoMeta {
        self.store.meta()
    }

    pub fn allocator(&self) -> &DuoAllocator {
        &self.allocator
    }

    /// `(used, free)` data blocks.
    pub fn usage(&self) -> (usize, usize) {
        (
            self.allocator.used_units(),
            self.allocator.remaining_units(),
        )
    }

    pub fn io(&mut self) -> &mut IO {
        self.store.io()
    }

    // === Lookup helpers ===

    /// Path resolution for queries: anything malformed is simply not there.
    fn lookup(path: &str) -> FsResult<DuoPath<'_>> {
        resolve_path(path).map_err(|_| FsError::NotFound)
    }

    fn open_file(&mut self, path: &str) -> FsResult<FileRef> {
        match Self::lookup(path)? {
            DuoPath::File { dir, name, ext } => {
                let dir = directory::find_directory(&mut self.store, dir)?;
                directory::find_file(&mut self.store, &dir, name, ext)
            }
            DuoPath::Root => Err(FsPathError::IsADirectory.into()),
            DuoPath::Directory { dir } => {
                directory::find_directory(&mut self.store, dir)?;
                Err(FsPathError::IsADirectory.into())
            }
        }
    }

    fn find_dir(&mut self, name: &str) -> FsResult<DirRef> {
        directory::find_directory(&mut self.store, name)
    }

    // === Operations ===

    pub fn get_attributes(&mut self, path: &str) -> FsResult<DuoAttr> {
        match Self::lookup(path)? {
            DuoPath::Root => Ok(DuoAttr::dir()),
            DuoPath::Directory { dir } => {
                self.find_dir(dir)?;
                Ok(DuoAttr::dir())
            }
            DuoPath::File { dir, name, ext } => {
                let dir = self.find_dir(dir)?;
                let file = directory::find_file(&mut self.store, &dir, name, ext)?;
                Ok(DuoAttr::from(&file.entry))
            }
        }
    }

    /// `.` and `..` followed by every entry in stored order.
    pub fn list_directory(&mut self, path: &str) -> FsResult<Vec<DuoDirent>> {
        let mut out = vec![
            DuoDirent::new(DOT_NAME, DuoKind::Directory),
            DuoDirent::new(DOTDOT_NAME, DuoKind::Directory),
        ];
        match Self::lookup(path)? {
            DuoPath::Root => {
                let names = directory::list_directories(&mut self.store)?;
                out.extend(names.into_iter().map(|n| DuoDirent::new(n, DuoKind::Directory)));
            }
            DuoPath::Directory { dir } => {
                let dir = self.find_dir(dir)?;
                let names = directory::list_files(&mut self.store, &dir)?;
                out.extend(names.into_iter().map(|n| DuoDirent::new(n, DuoKind::File)));
            }
            DuoPath::File { dir, name, ext } => {
                let dir = self.find_dir(dir)?;
                directory::find_file(&mut self.store, &dir, name, ext)?;
                return Err(FsPathError::NotADirectory.into());
            }
        }
        Ok(out)
    }

    pub fn create_directory(&mut self, path: &str) -> FsResult {
        match resolve_path(path)? {
            DuoPath::Directory { dir } => {
                directory::create_directory(&mut self.store, &mut self.allocator, dir)?;
                Ok(())
            }
            DuoPath::Root => Err(FsError::AlreadyExists),
            DuoPath::File { .. } => Err(FsPathError::Misplaced.into()),
        }
    }

    pub fn remove_directory(&mut self, path: &str) -> FsResult {
        match resolve_path(path)? {
            DuoPath::Directory { dir } => {
                directory::remove_directory(&mut self.store, &mut self.allocator, dir)
            }
            DuoPath::Root => Err(FsPathError::Misplaced.into()),
            DuoPath::File { .. } => Err(FsPathError::NotADirectory.into()),
        }
    }

    pub fn create_file(&mut self, path: &str) -> FsResult {
        match resolve_path(path)? {
            DuoPath::File { dir, name, ext } => {
                let dir = self.find_dir(dir)?;
                directory::create_file(&mut self.store, &dir, name, ext)?;
                Ok(())
            }
            DuoPath::Root | DuoPath::Directory { .. } => Err(FsPathError::Misplaced.into()),
        }
    }

    pub fn remove_file(&mut self, path: &str) -> FsResult {
        match resolve_path(path)? {
            DuoPath::File { dir, name, ext } => {
                let dir = self.find_dir(dir)?;
                directory::remove_file(&mut self.store, &mut self.allocator, &dir, name, ext)
            }
            DuoPath::Root | DuoPath::Directory { .. } => Err(FsPathError::IsADirectory.into()),
        }
    }

    pub fn read(&mut self, path: &str, buf: &mut [u8], offset: u64) -> FsResult<usize> {
        let file = self.open_file(path)?;
        file::read_at(&mut self.store, &file, offset, buf)
    }

    pub fn read_all(&mut self, path: &str) -> FsResult<Vec<u8>> {
        let file = self.open_file(path)?;
        file::read_all(&mut self.store, &file)
    }

    pub fn write(&mut self, path: &str, data: &[u8], offset: u64) -> FsResult<usize> {
        let mut file = self.open_file(path)?;
        file::write_at(&mut self.store, &mut self.allocator, &mut file, offset, data)
    }

    pub fn truncate(&mut self, path: &str, size: u64) -> FsResult {
        let mut file = self.open_file(path)?;
        file::truncate(&mut self.store, &mut self.allocator, &mut file, size)
    }

    /// Always succeeds; there is no per-open state.
    pub fn open(&mut self, _path: &str) -> FsResult {
        Ok(())
    }

    /// Always succeeds; every operation writes through.
    pub fn flush(&mut self, _path: &str) -> FsResult {
        Ok(())
    }
}
