// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

pub use crate::core::allocator::*;

use crate::{
    core::{errors::*, utils::bitmap::BitmapOps},
    fs::duo::{constant::*, meta::*},
};

/// Blocks handed out by one allocation, as on-disk byte offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuoHandle {
    /// First block of the chain, or [`NO_BLOCK`] when empty.
    pub block: u64,
    pub chain: Vec<u64>,
}

impl DuoHandle {
    pub fn new(block: u64) -> Self {
        Self {
            block,
            chain: vec![block],
        }
    }

    pub fn from_chain(chain: Vec<u64>) -> Self {
        let block = chain.first().copied().unwrap_or(NO_BLOCK);
        Self { block, chain }
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl From<Vec<u64>> for DuoHandle {
    fn from(chain: Vec<u64>) -> Self {
        Self::from_chain(chain)
    }
}

impl FsHandle for DuoHandle {}

/// In-memory block usage map, rebuilt from the image at mount.
///
/// Bit `i` covers block `first + i`. Lowest free blocks are handed out first.
#[derive(Debug, Clone)]
pub struct DuoAllocator {
    first: u64,
    total: usize,
    block_size: u64,
    used: Vec<u8>,
    used_count: usize,
}

impl DuoAllocator {
    /// Allocator with every data block free.
    pub fn new(meta: &DuoMeta) -> Self {
        let total = meta.total_units();
        Self {
            first: meta.first_data_unit(),
            total,
            block_size: meta.unit_size() as u64,
            used: vec![0u8; total.div_ceil(8)],
            used_count: 0,
        }
    }

    #[inline]
    fn bit_of(&self, offset: u64) -> Option<usize> {
        if !offset.is_multiple_of(self.block_size) {
            return None;
        }
        let bit = (offset / self.block_size).checked_sub(self.first)? as usize;
        (bit < self.total).then_some(bit)
    }

    #[inline]
    fn offset_of(&self, bit: usize) -> u64 {
        (self.first + bit as u64) * self.block_size
    }

    pub fn is_used(&self, offset: u64) -> bool {
        self.bit_of(offset).is_some_and(|bit| self.used.get_bit(bit))
    }

    /// Records a block found in use on disk.
    ///
    /// Fails with `Corrupted` for an invalid offset or a block claimed twice.
    pub fn mark_used(&mut self, offset: u64) -> FsResult {
        let bit = self
            .bit_of(offset)
            .ok_or(FsError::Corrupted("Block offset out of range"))?;
        crate::ensure!(
            !self.used.get_bit(bit),
            FsError::Corrupted("Block referenced more than once")
        );
        self.used.set_bit(bit, true);
        self.used_count += 1;
        Ok(())
    }
}

impl FsAllocator<DuoHandle> for DuoAllocator {
    fn allocate_chain(&mut self, count: usize) -> FsAllocatorResult<DuoHandle> {
        if count > self.remaining_units() {
            return Err(FsAllocatorError::OutOfBlocks);
        }

        let mut chain = Vec::with_capacity(count);
        let mut cursor = 0;
        for _ in 0..count {
            let bit = self
                .used
                .find_first_zero(cursor, self.total)
                .ok_or(FsAllocatorError::OutOfBlocks)?;
            self.used.set_bit(bit, true);
            chain.push(self.offset_of(bit));
            cursor = bit + 1;
        }
        self.used_count += count;
        Ok(DuoHandle::from_chain(chain))
    }

    fn release(&mut self, handle: &DuoHandle) -> FsAllocatorResult {
        for &offset in &handle.chain {
            let bit = self
                .bit_of(offset)
                .ok_or(FsAllocatorError::InvalidUnit(offset))?;
            if !self.used.get_bit(bit) {
                return Err(FsAllocatorError::Other("Block is not allocated"));
            }
        }
        for &offset in &handle.chain {
            if let Some(bit) = self.bit_of(offset)
                && self.used.get_bit(bit)
            {
                self.used.set_bit(bit, false);
                self.used_count -= 1;
            }
        }
        Ok(())
    }

    fn used_units(&self) -> usize {
        self.used_count
    }

    fn remaining_units(&self) -> usize {
        self.total - self.used_count
    }
}
