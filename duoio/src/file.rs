// SPDX-License-Identifier: MIT

use std::io::{Error, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::{DuoIO, DuoIOError, DuoIOResult, DuoIOSetLen};

/// `DuoIO` over any seekable std stream, typically the image `File`.
///
/// The stream is borrowed for the whole mount: opened once by the caller,
/// released when the borrow ends.
#[derive(Debug)]
pub struct StdDuoIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdDuoIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }

    #[inline]
    pub fn into_inner(self) -> &'a mut T {
        self.io
    }
}

impl<'a, T: Read + Write + Seek> DuoIO for StdDuoIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> DuoIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DuoIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> DuoIOResult {
        self.io.flush()?;
        Ok(())
    }

    fn capacity(&mut self) -> DuoIOResult<u64> {
        Ok(self.io.seek(SeekFrom::End(0))?)
    }
}

impl<'a> DuoIOSetLen for StdDuoIO<'a, std::fs::File> {
    fn set_len(&mut self, len: u64) -> DuoIOResult {
        self.io.set_len(len)?;
        self.flush()?;
        self.io.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl From<Error> for DuoIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        match e.kind() {
            ErrorKind::UnexpectedEof => DuoIOError::ShortRead,
            kind => DuoIOError::Os(kind),
        }
    }
}
