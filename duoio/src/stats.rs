// SPDX-License-Identifier: MIT

use crate::{DuoIO, DuoIOResult};

/// Simple counters, no_std friendly.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IoStats {
    pub reads: u64,
    pub read_bytes: u64,
    pub writes: u64,
    pub write_bytes: u64,
    pub flushes: u64,

    // Requests that do not start and end on `align` boundaries
    pub unaligned_reads: u64,
    pub unaligned_writes: u64,
}

impl IoStats {
    #[inline]
    pub fn reset(&mut self) {
        *self = IoStats::default();
    }
}

/// Transparent instrumentation wrapper.
pub struct IOCounter<'a, IO: DuoIO + ?Sized> {
    inner: &'a mut IO,
    pub stats: IoStats,
    /// Alignment used to classify requests (usually the block size).
    pub align: u64,
}

impl<'a, IO: DuoIO + ?Sized> IOCounter<'a, IO> {
    #[inline]
    pub fn new(inner: &'a mut IO) -> Self {
        Self {
            inner,
            stats: IoStats::default(),
            align: 1,
        }
    }

    #[inline]
    pub fn with_align(inner: &'a mut IO, align: u64) -> Self {
        let align = if align == 0 { 1 } else { align };
        Self {
            inner,
            stats: IoStats::default(),
            align,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> IoStats {
        self.stats
    }

    #[inline]
    pub fn into_inner(self) -> &'a mut IO {
        self.inner
    }

    #[inline]
    fn is_aligned(&self, offset: u64, len: usize) -> bool {
        offset.is_multiple_of(self.align) && (len as u64).is_multiple_of(self.align)
    }
}

impl<'a, IO: DuoIO + ?Sized> DuoIO for IOCounter<'a, IO> {
    #[inline]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> DuoIOResult {
        if !self.is_aligned(offset, data.len()) {
            self.stats.unaligned_writes += 1;
        }
        self.stats.writes += 1;
        self.stats.write_bytes += data.len() as u64;
        self.inner.write_at(offset, data)
    }

    #[inline]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DuoIOResult {
        if !self.is_aligned(offset, buf.len()) {
            self.stats.unaligned_reads += 1;
        }
        self.stats.reads += 1;
        self.stats.read_bytes += buf.len() as u64;
        self.inner.read_at(offset, buf)
    }

    #[inline]
    fn flush(&mut self) -> DuoIOResult {
        self.stats.flushes += 1;
        self.inner.flush()
    }

    #[inline]
    fn capacity(&mut self) -> DuoIOResult<u64> {
        self.inner.capacity()
    }
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;
    use crate::prelude::MemDuoIO;

    #[test]
    fn test_counter_classifies_alignment() {
        let mut buf = [0u8; 2048];
        let mut mem = MemDuoIO::new(&mut buf);
        let mut io = IOCounter::with_align(&mut mem, 512);

        io.write_at(512, &[1u8; 512]).unwrap();
        io.write_at(3, &[1u8; 4]).unwrap();
        let mut out = [0u8; 512];
        io.read_at(1024, &mut out).unwrap();

        let s = io.snapshot();
        assert_eq!(s.writes, 2);
        assert_eq!(s.write_bytes, 516);
        assert_eq!(s.unaligned_writes, 1);
        assert_eq!(s.reads, 1);
        assert_eq!(s.unaligned_reads, 0);
    }
}
