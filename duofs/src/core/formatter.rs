// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

use duoio::{DuoIO, DuoIOExt};

use crate::core::meta::FsMeta;

/// Lays down an empty filesystem on an image.
pub trait FsFormatter {
    /// Writes the initial structures. `full_format` also clears every data unit.
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;

    #[must_use = "flush result must be checked for errors"]
    fn flush(&mut self) -> FsFormatterResult<()> {
        Ok(())
    }
}

/// Zero-fills `first_data_unit..=last_data_unit` in one pass.
pub fn zero_data_region<M: FsMeta<u64>, IO: DuoIO + ?Sized>(
    io: &mut IO,
    meta: &M,
) -> FsFormatterResult {
    if meta.total_units() == 0 {
        return Ok(());
    }
    let start = meta.unit_offset(meta.first_data_unit());
    let len = meta.total_units() * meta.unit_size();

    io.zero_fill(start, len)?;
    Ok(())
}
