// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsAllocatorError, FsAllocatorResult};

/// Marker for whatever an allocator hands back (a block, a chain of blocks).
pub trait FsHandle {}

/// Hands out and reclaims allocation units.
pub trait FsAllocator<Handle: FsHandle + Sized + Clone> {
    /// Reserves `count` units, all or nothing.
    fn allocate_chain(&mut self, count: usize) -> FsAllocatorResult<Handle>;

    fn allocate_unit(&mut self) -> FsAllocatorResult<Handle> {
        self.allocate_chain(1)
    }

    /// Frees every unit of `handle`. Nothing is freed if any unit is invalid.
    fn release(&mut self, handle: &Handle) -> FsAllocatorResult;

    fn used_units(&self) -> usize;

    fn remaining_units(&self) -> usize;
}
