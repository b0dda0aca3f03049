// SPDX-License-Identifier: MIT

use duoio::{DuoIO, DuoIOStructExt};

pub use crate::core::formatter::*;

use crate::fs::duo::{constant::*, meta::*, types::DuoRootBlock};

/// Lays down an empty duofs image: a root block with no directories.
///
/// A full format also zeroes every other block.
pub struct DuoFormatter<'a, IO: DuoIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a DuoMeta,
}

impl<'a, IO: DuoIO + ?Sized> DuoFormatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a DuoMeta) -> Self {
        Self { io, meta }
    }

    fn check_geometry(&self) -> FsFormatterResult {
        crate::ensure!(
            self.meta.total_blocks >= MIN_IMAGE_BLOCKS,
            FsFormatterError::Invalid("Image smaller than two blocks")
        );
        crate::ensure!(
            self.meta.is_block_aligned(),
            FsFormatterError::Invalid("Image size is not a multiple of the block size")
        );
        Ok(())
    }

    fn write_root(&mut self) -> FsFormatterResult {
        self.io.write_struct(ROOT_BLOCK_OFFSET, &DuoRootBlock::empty())?;
        Ok(())
    }
}

impl<'a, IO: DuoIO + ?Sized> FsFormatter for DuoFormatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        self.check_geometry()?;
        self.write_root()?;
        if full_format {
            zero_data_region(self.io, self.meta)?;
        }
        self.flush()
    }

    fn flush(&mut self) -> FsFormatterResult {
        self.io.flush()?;
        Ok(())
    }
}
