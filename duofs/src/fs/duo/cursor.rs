// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use duoio::DuoIO;

use crate::{
    core::{errors::*, meta::FsMeta},
    fs::duo::{constant::*, store::DuoStore, types::DuoDataBlock},
};

/// Walks a data chain block by block.
///
/// Each hop goes through the store, so misaligned or out-of-range links
/// surface as `Corrupted`. A chain longer than the image has blocks is a loop.
#[derive(Debug, Clone)]
pub struct ChainCursor {
    current: u64,
    seen: u64,
    limit: u64,
}

impl ChainCursor {
    pub fn new<IO: DuoIO + ?Sized>(store: &DuoStore<'_, IO>, start: u64) -> Self {
        Self {
            current: start,
            seen: 0,
            limit: store.meta().total_units() as u64,
        }
    }

    /// Number of blocks yielded so far.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn next_block<IO: DuoIO + ?Sized>(
        &mut self,
        store: &mut DuoStore<'_, IO>,
    ) -> Option<FsResult<(u64, DuoDataBlock)>> {
        if self.current == NO_BLOCK {
            return None;
        }
        let offset = self.current;
        self.current = NO_BLOCK;

        if self.seen >= self.limit {
            return Some(Err(FsError::Corrupted("Data chain loops")));
        }
        self.seen += 1;

        match store.read_data(offset) {
            Ok(block) => {
                self.current = block.next_block;
                Some(Ok((offset, block)))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Borrowing iterator over the remaining blocks.
    pub fn iter<'c, 's, 'a, IO: DuoIO + ?Sized>(
        &'c mut self,
        store: &'s mut DuoStore<'a, IO>,
    ) -> ChainIter<'c, 's, 'a, IO> {
        ChainIter {
            cursor: self,
            store,
        }
    }
}

pub struct ChainIter<'c, 's, 'a, IO: DuoIO + ?Sized> {
    cursor: &'c mut ChainCursor,
    store: &'s mut DuoStore<'a, IO>,
}

impl<IO: DuoIO + ?Sized> Iterator for ChainIter<'_, '_, '_, IO> {
    type Item = FsResult<(u64, DuoDataBlock)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_block(self.store)
    }
}

/// Offsets of every block in the chain starting at `start`.
pub fn collect_offsets<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    start: u64,
) -> FsResult<Vec<u64>> {
    let mut cursor = ChainCursor::new(store, start);
    cursor
        .iter(store)
        .map(|item| item.map(|(offset, _)| offset))
        .collect()
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;
    use crate::fs::duo::meta::DuoMeta;
    use duoio::prelude::*;

    fn link(store: &mut DuoStore<'_, MemDuoIO<'_>>, offset: u64, next: u64) {
        let mut block = DuoDataBlock::empty();
        block.next_block = next;
        store.write_data(offset, &block).unwrap();
    }

    #[test]
    fn test_walks_chain_in_link_order() {
        let mut buf = vec![0u8; 8 * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let mut store = DuoStore::new(&mut io, DuoMeta::new(8 * BLOCK_SIZE as u64));
        link(&mut store, 1536, 512);
        link(&mut store, 512, 2048);
        link(&mut store, 2048, NO_BLOCK);

        assert_eq!(collect_offsets(&mut store, 1536).unwrap(), [1536, 512, 2048]);
        assert!(collect_offsets(&mut store, NO_BLOCK).unwrap().is_empty());
    }

    #[test]
    fn test_loop_is_detected() {
        let mut buf = vec![0u8; 4 * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let mut store = DuoStore::new(&mut io, DuoMeta::new(4 * BLOCK_SIZE as u64));
        link(&mut store, 512, 1024);
        link(&mut store, 1024, 512);

        let err = collect_offsets(&mut store, 512).unwrap_err();
        assert_eq!(err, FsError::Corrupted("Data chain loops"));
    }

    #[test]
    fn test_bad_link_is_corruption() {
        let mut buf = vec![0u8; 4 * BLOCK_SIZE];
        let mut io = MemDuoIO::new(&mut buf);
        let mut store = DuoStore::new(&mut io, DuoMeta::new(4 * BLOCK_SIZE as u64));
        link(&mut store, 512, 777);

        let mut cursor = ChainCursor::new(&store, 512);
        assert!(cursor.next_block(&mut store).unwrap().is_ok());
        assert!(matches!(
            cursor.next_block(&mut store),
            Some(Err(FsError::Corrupted(_)))
        ));
        assert!(cursor.next_block(&mut store).is_none());
    }
}
