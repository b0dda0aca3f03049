// SPDX-License-Identifier: MIT

use duoio::{DuoIO, DuoIOStructExt};

use crate::{
    core::errors::*,
    fs::duo::{constant::*, meta::*, types::*},
};

/// Whole-block access to the backing image.
///
/// Every read must be fully satisfied; a short image is an I/O error.
pub struct DuoStore<'a, IO: DuoIO + ?Sized> {
    io: &'a mut IO,
    meta: DuoMeta,
}

impl<'a, IO: DuoIO + ?Sized> DuoStore<'a, IO> {
    pub fn new(io: &'a mut IO, meta: DuoMeta) -> Self {
        Self { io, meta }
    }

    pub fn meta(&self) -> &DuoMeta {
        &self.meta
    }

    pub fn io(&mut self) -> &mut IO {
        self.io
    }

    pub fn into_inner(self) -> &'a mut IO {
        self.io
    }

    /// Rejects offsets that do not name a data or directory block.
    #[inline]
    fn check_block(&self, offset: u64) -> FsResult<u64> {
        self.meta
            .block_of(offset)
            .map(|_| offset)
            .ok_or(FsError::Corrupted("Block offset out of range"))
    }

    pub fn read_block(&mut self, offset: u64, buf: &mut [u8; BLOCK_SIZE]) -> FsResult {
        crate::ensure!(
            offset.is_multiple_of(BLOCK_SIZE as u64)
                && offset / (BLOCK_SIZE as u64) < self.meta.total_blocks,
            FsError::Corrupted("Block offset out of range")
        );
        self.io.read_at(offset, buf)?;
        Ok(())
    }

    pub fn write_block(&mut self, offset: u64, buf: &[u8; BLOCK_SIZE]) -> FsResult {
        crate::ensure!(
            offset.is_multiple_of(BLOCK_SIZE as u64)
                && offset / (BLOCK_SIZE as u64) < self.meta.total_blocks,
            FsError::Corrupted("Block offset out of range")
        );
        self.io.write_at(offset, buf)?;
        Ok(())
    }

    pub fn read_root(&mut self) -> FsResult<DuoRootBlock> {
        Ok(self.io.read_struct(ROOT_BLOCK_OFFSET)?)
    }

    pub fn write_root(&mut self, root: &DuoRootBlock) -> FsResult {
        self.io.write_struct(ROOT_BLOCK_OFFSET, root)?;
        Ok(())
    }

    pub fn read_dir(&mut self, offset: u64) -> FsResult<DuoDirBlock> {
        let offset = self.check_block(offset)?;
        Ok(self.io.read_struct(offset)?)
    }

    pub fn write_dir(&mut self, offset: u64, dir: &DuoDirBlock) -> FsResult {
        let offset = self.check_block(offset)?;
        self.io.write_struct(offset, dir)?;
        Ok(())
    }

    pub fn read_data(&mut self, offset: u64) -> FsResult<DuoDataBlock> {
        let offset = self.check_block(offset)?;
        Ok(self.io.read_struct(offset)?)
    }

    pub fn write_data(&mut self, offset: u64, block: &DuoDataBlock) -> FsResult {
        let offset = self.check_block(offset)?;
        self.io.write_struct(offset, block)?;
        Ok(())
    }

    pub fn flush(&mut self) -> FsResult {
        self.io.flush()?;
        Ok(())
    }
}
