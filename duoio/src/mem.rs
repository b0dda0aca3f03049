// SPDX-License-Identifier: MIT

use crate::{DuoIO, DuoIOError, DuoIOResult, DuoIOSetLen};

/// In-memory implementation of `DuoIO`.
///
/// Useful for tests and RAM-backed images.
#[derive(Debug)]
pub struct MemDuoIO<'a> {
    buffer: &'a mut [u8],
    logical_len: usize,
}

impl<'a> MemDuoIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let logical_len = buffer.len();
        Self {
            buffer,
            logical_len,
        }
    }

    #[inline]
    fn check_bounds(&self, off: u64, len: usize) -> DuoIOResult {
        let end = off
            .checked_add(len as u64)
            .ok_or(DuoIOError::OutOfBounds)?;
        if end > self.logical_len as u64 {
            return Err(DuoIOError::OutOfBounds);
        }
        Ok(())
    }
}

impl<'a> DuoIO for MemDuoIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> DuoIOResult {
        self.check_bounds(offset, data.len())?;
        let start = offset as usize;
        self.buffer[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DuoIOResult {
        self.check_bounds(offset, buf.len())?;
        let start = offset as usize;
        buf.copy_from_slice(&self.buffer[start..start + buf.len()]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> DuoIOResult {
        Ok(())
    }

    #[inline]
    fn capacity(&mut self) -> DuoIOResult<u64> {
        Ok(self.logical_len as u64)
    }
}

impl<'a> DuoIOSetLen for MemDuoIO<'a> {
    fn set_len(&mut self, new_len: u64) -> DuoIOResult {
        if new_len > self.buffer.len() as u64 {
            return Err(DuoIOError::OutOfBounds);
        }
        self.logical_len = new_len as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_rw_and_bounds() {
        let mut buf = [0u8; 64];
        let mut io = MemDuoIO::new(&mut buf);

        io.write_at(60, &[9, 9, 9, 9]).unwrap();
        let mut out = [0u8; 4];
        io.read_at(60, &mut out).unwrap();
        assert_eq!(out, [9, 9, 9, 9]);

        assert_eq!(io.write_at(61, &[0; 4]), Err(DuoIOError::OutOfBounds));
        assert_eq!(io.read_at(u64::MAX, &mut out), Err(DuoIOError::OutOfBounds));
    }

    #[test]
    fn test_mem_set_len_shrinks_view() {
        let mut buf = [0u8; 64];
        let mut io = MemDuoIO::new(&mut buf);

        io.set_len(32).unwrap();
        assert_eq!(io.capacity().unwrap(), 32);
        let mut out = [0u8; 8];
        assert!(io.read_at(30, &mut out).is_err());
        assert!(io.set_len(65).is_err());
    }
}
