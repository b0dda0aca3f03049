// SPDX-License-Identifier: MIT

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::fs::duo::constant::*;

/// One link of a file's data chain.
#[repr(C, packed)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
pub struct DuoDataBlock {
    /// Next block of the chain, or [`NO_BLOCK`] at the end.
    pub next_block: u64,
    pub data: [u8; MAX_DATA_IN_BLOCK],
}

const _: () = assert!(size_of::<DuoDataBlock>() == BLOCK_SIZE);

impl DuoDataBlock {
    pub fn empty() -> Self {
        Self::new_zeroed()
    }

    pub fn next_block(&self) -> Option<u64> {
        let next = self.next_block;
        (next != NO_BLOCK).then_some(next)
    }
}
