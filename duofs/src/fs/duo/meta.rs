// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use duoio::DuoIO;

use crate::{core::errors::*, fs::duo::constant::*};

/// Geometry of a duofs image.
///
/// Units are block indices; on-disk references store byte offsets
/// (`index * BLOCK_SIZE`).
#[derive(Debug, Clone)]
pub struct DuoMeta {
    pub block_size: usize,
    pub total_blocks: u64,
    pub size_bytes: u64,
}

impl DuoMeta {
    /// Geometry for an image of `size_bytes`; a trailing partial block is ignored.
    pub fn new(size_bytes: u64) -> Self {
        Self {
            block_size: BLOCK_SIZE,
            total_blocks: size_bytes / BLOCK_SIZE as u64,
            size_bytes,
        }
    }

    /// Derives geometry from the current size of the backing image.
    pub fn from_io<IO: DuoIO + ?Sized>(io: &mut IO) -> FsResult<Self> {
        let meta = Self::new(io.capacity()?);
        crate::ensure!(
            meta.total_blocks >= MIN_IMAGE_BLOCKS,
            FsError::Corrupted("Image smaller than two blocks")
        );
        Ok(meta)
    }

    /// Block index of an on-disk offset, if aligned and inside the data region.
    pub fn block_of(&self, offset: u64) -> Option<u64> {
        if !offset.is_multiple_of(BLOCK_SIZE as u64) {
            return None;
        }
        let block = offset / BLOCK_SIZE as u64;
        self.is_valid_unit(block).then_some(block)
    }

    pub fn is_block_aligned(&self) -> bool {
        self.size_bytes.is_multiple_of(BLOCK_SIZE as u64)
    }
}

impl FsMeta<u64> for DuoMeta {
    fn unit_size(&self) -> usize {
        self.block_size
    }

    fn unit_offset(&self, block: u64) -> u64 {
        block * self.block_size as u64
    }

    fn root_unit(&self) -> u64 {
        ROOT_BLOCK_OFFSET / BLOCK_SIZE as u64
    }

    fn first_data_unit(&self) -> u64 {
        self.root_unit() + 1
    }

    fn last_data_unit(&self) -> u64 {
        self.total_blocks.saturating_sub(1)
    }

    fn total_units(&self) -> usize {
        self.total_blocks.saturating_sub(1) as usize
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}
