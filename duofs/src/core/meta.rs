// SPDX-License-Identifier: MIT

/// Image geometry shared by the formatter, allocator, mount and checker.
///
/// `Unit` is whatever the filesystem allocates in (block index for duo).
pub trait FsMeta<Unit: Ord + Copy> {
    /// Bytes per unit.
    fn unit_size(&self) -> usize;

    /// Byte offset of `unit` in the image.
    fn unit_offset(&self, unit: Unit) -> u64;

    /// Unit holding the root structure; never allocatable.
    fn root_unit(&self) -> Unit;

    fn first_data_unit(&self) -> Unit;

    /// Inclusive upper bound of the allocatable range.
    fn last_data_unit(&self) -> Unit;

    /// Count of units in `first_data_unit..=last_data_unit`.
    fn total_units(&self) -> usize;

    fn size_bytes(&self) -> u64;

    fn is_valid_unit(&self, unit: Unit) -> bool {
        (self.first_data_unit()..=self.last_data_unit()).contains(&unit)
    }
}
