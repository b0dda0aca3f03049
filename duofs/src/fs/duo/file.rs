// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use duoio::DuoIO;

use crate::{
    core::{allocator::FsAllocator, errors::*},
    fs::duo::{
        allocator::*,
        constant::*,
        cursor::{self, ChainCursor},
        directory::{self, FileRef},
        store::DuoStore,
        types::DuoDataBlock,
    },
};

const PAYLOAD: u64 = MAX_DATA_IN_BLOCK as u64;

/// Number of data blocks needed to hold `len` bytes.
#[inline]
pub fn blocks_for(len: u64) -> usize {
    len.div_ceil(PAYLOAD) as usize
}

/// Copies file bytes from `offset` into `buf`.
///
/// Returns the number of bytes copied, short at end of file.
pub fn read_at<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    file: &FileRef,
    offset: u64,
    buf: &mut [u8],
) -> FsResult<usize> {
    let size = file.entry.size();
    crate::ensure!(offset <= size, FsError::InvalidOffset);

    let want = (buf.len() as u64).min(size - offset) as usize;
    if want == 0 {
        return Ok(0);
    }

    let skip = (offset / PAYLOAD) as usize;
    let mut in_block = (offset % PAYLOAD) as usize;
    let mut copied = 0;

    let mut cursor = ChainCursor::new(store, file.entry.start_block());
    for (idx, item) in cursor.iter(store).enumerate() {
        let (_, block) = item?;
        if idx < skip {
            continue;
        }
        let n = (MAX_DATA_IN_BLOCK - in_block).min(want - copied);
        buf[copied..copied + n].copy_from_slice(&block.data[in_block..in_block + n]);
        copied += n;
        in_block = 0;
        if copied == want {
            return Ok(copied);
        }
    }

    Err(FsError::Corrupted("Data chain shorter than file size"))
}

/// Writes `data` at `offset`, growing the chain as needed.
///
/// Missing blocks are reserved before anything is written. New blocks are
/// written before the block that links them in, and the directory entry
/// is updated last.
pub fn write_at<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    alloc: &mut DuoAllocator,
    file: &mut FileRef,
    offset: u64,
    data: &[u8],
) -> FsResult<usize> {
    let size = file.entry.size();
    crate::ensure!(offset <= size, FsError::InvalidOffset);
    if data.is_empty() {
        return Ok(0);
    }

    let end = offset + data.len() as u64;
    let mut blocks = cursor::collect_offsets(store, file.entry.start_block())?;
    let existing = blocks.len();
    let needed = blocks_for(end);

    let fresh = if needed > existing {
        alloc.allocate_chain(needed - existing)?
    } else {
        DuoHandle::default()
    };
    blocks.extend_from_slice(&fresh.chain);

    let first = (offset / PAYLOAD) as usize;
    let start = match (fresh.is_empty(), existing) {
        (false, n) if n > 0 => first.min(n - 1),
        _ => first,
    };

    let mut linked = false;
    for idx in (start..needed).rev() {
        if let Err(e) = rewrite_block(store, &blocks, existing, idx, offset, data) {
            return Err(abandon(alloc, &fresh, linked, e));
        }
        if idx + 1 == existing {
            linked = true;
        }
    }

    let previous = file.entry;
    if let Some(&head) = blocks.first() {
        file.entry.start_block = head;
    }
    file.entry.size = size.max(end);
    if let Err(e) = directory::update_file(store, file) {
        file.entry = previous;
        return Err(abandon(alloc, &fresh, linked, e));
    }

    Ok(data.len())
}

/// Rewrites block `idx` of `blocks`; blocks at or past the old tail get new links.
fn rewrite_block<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    blocks: &[u64],
    existing: usize,
    idx: usize,
    offset: u64,
    data: &[u8],
) -> FsResult {
    let at = blocks[idx];
    let mut block = if idx < existing {
        store.read_data(at)?
    } else {
        DuoDataBlock::empty()
    };
    if idx + 1 >= existing {
        block.next_block = blocks.get(idx + 1).copied().unwrap_or(NO_BLOCK);
    }
    copy_into_block(&mut block, idx, offset, data);
    store.write_data(at, &block)
}

/// Copies the part of `data` (written at `offset`) that falls in block `idx`.
fn copy_into_block(block: &mut DuoDataBlock, idx: usize, offset: u64, data: &[u8]) {
    let block_start = idx as u64 * PAYLOAD;
    let block_end = block_start + PAYLOAD;
    let end = offset + data.len() as u64;

    let from = offset.max(block_start);
    let to = end.min(block_end);
    if from >= to {
        return;
    }
    let dst = (from - block_start) as usize..(to - block_start) as usize;
    let src = (from - offset) as usize..(to - offset) as usize;
    block.data[dst].copy_from_slice(&data[src]);
}

/// Returns fresh blocks to the pool unless the on-disk chain already links them.
fn abandon(alloc: &mut DuoAllocator, fresh: &DuoHandle, linked: bool, err: FsError) -> FsError {
    if !linked
        && !fresh.is_empty()
        && let Err(e) = alloc.release(fresh)
    {
        return e.into();
    }
    err
}

/// Shrinks a file to `new_size` bytes and frees the blocks past it.
///
/// Growing is not supported and fails with `InvalidOffset`.
pub fn truncate<IO: DuoIO + ?Sized>(
    store: &mut DuoStore<'_, IO>,
    alloc: &mut DuoAllocator,
    file: &mut FileRef,
    new_size: u64,
) -> FsResult {
    let size = file.entry.size();
    crate::ensure!(new_size <= size, FsError::InvalidOffset);
    if new_size == size {
        return Ok(());
    }

    let blocks = cursor::collect_offsets(store, file.entry.start_block())?;
    let keep = blocks_for(new_size).min(blocks.len());

    file.entry.size = new_size;
    if keep == 0 {
        file.entry.start_block = NO_BLOCK;
    }
    directory::update_file(store, file)?;

    if keep == blocks.len() {
        return Ok(());
    }
    if keep > 0 {
        let tail = blocks[keep - 1];
        let mut block = store.read_data(tail)?;
        block.next_block = NO_BLOCK;
        store.write_data(tail, &block)?;
    }
    alloc.release(&DuoHandle::from_chain(blocks[keep..].to_vec()))?;
    Ok(())
}

/// Whole file content.
pub fn read_all<IO: DuoIO + ?Sized>(store: &mut DuoStore<'_, IO>, file: &FileRef) -> FsResult<Vec<u8>> {
    let mut out = vec![0u8; file.entry.size() as usize];
    let n = read_at(store, file, 0, &mut out)?;
    out.truncate(n);
    Ok(out)
}
