// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod errors;
pub mod stats;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod file;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::DuoIO;
    pub use super::DuoIOExt;
    pub use super::DuoIOSetLen;
    pub use super::DuoIOStructExt;
    pub use super::errors::*;
    pub use super::stats::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemDuoIO;

    #[cfg(feature = "std")]
    pub use super::file::StdDuoIO;
}

// Internal use
use errors::*;

// Constants

/// Size of the internal scratch buffer used for chunked operations.
/// 4 KiB keeps no_std stack usage reasonable.
pub const BLOCK_BUF_SIZE: usize = 4096;

// Traits

/// Backing store abstraction.
///
/// Reads and writes at absolute byte offsets of a flat image.
/// Implementations may target RAM, regular files or raw devices.
pub trait DuoIO {
    /// Writes `data` at `offset` (absolute).
    fn write_at(&mut self, offset: u64, data: &[u8]) -> DuoIOResult;

    /// Reads exactly `buf.len()` bytes into `buf` from `offset` (absolute).
    ///
    /// A read that cannot be fully satisfied is an error, never a zero-fill.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DuoIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> DuoIOResult;

    /// Current size of the backing store in bytes.
    fn capacity(&mut self) -> DuoIOResult<u64>;
}

/// Extension helpers for DuoIO.
pub trait DuoIOExt: DuoIO {
    /// Fills a region with zeroes.
    ///
    /// Used for full formats and block scrubbing.
    #[inline(always)]
    fn zero_fill(&mut self, offset: u64, len: usize) -> DuoIOResult {
        const ZERO_BUF: [u8; BLOCK_BUF_SIZE] = [0u8; BLOCK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_BUF.len());
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk;
        }
        Ok(())
    }
}

impl<T: DuoIO + ?Sized> DuoIOExt for T {}

/// Trait for resizing the backing store (if supported by the backend).
pub trait DuoIOSetLen: DuoIO {
    /// Sets the length of the storage.
    fn set_len(&mut self, len: u64) -> DuoIOResult;
}

/// Extension trait for reading and writing structs using zerocopy.
///
/// Requires the struct to implement zerocopy traits for safe conversion.
pub trait DuoIOStructExt: DuoIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> DuoIOResult<T> {
        let size = core::mem::size_of::<T>();
        assert!(size <= BLOCK_BUF_SIZE, "read_struct: type too large");
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| DuoIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> DuoIOResult {
        self.write_at(offset, val.as_bytes())
    }
}

impl<T: DuoIO + ?Sized> DuoIOStructExt for T {}
