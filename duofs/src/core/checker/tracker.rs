// SPDX-License-Identifier: MIT

//! Reachability tracker for filesystem walks.
//!
//! Records which blocks have been referenced while walking directories and
//! chains, one bit per block.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::core::utils::bitmap::BitmapOps;

/// Tracks unit reachability during FS walks.
///
/// Units are raw unit numbers; the base offset is handled internally.
#[derive(Debug, Clone)]
pub struct ReachabilityTracker {
    bitmap: Vec<u8>,
    base_unit: u64,
    count: usize,
}

impl ReachabilityTracker {
    /// Creates a tracker for `count` units starting at `base_unit`.
    pub fn new(base_unit: u64, count: usize) -> Self {
        Self {
            bitmap: vec![0u8; count.div_ceil(8)],
            base_unit,
            count,
        }
    }

    #[inline]
    fn index(&self, unit: u64) -> Option<usize> {
        let idx = unit.checked_sub(self.base_unit)? as usize;
        (idx < self.count).then_some(idx)
    }

    /// Marks a unit as reachable. Out-of-range units are ignored.
    #[inline]
    pub fn mark(&mut self, unit: u64) {
        if let Some(idx) = self.index(unit) {
            self.bitmap.set_bit(idx, true);
        }
    }

    /// Marks a unit and reports whether it was unmarked before.
    ///
    /// Returns `false` for a unit already marked or out of range.
    #[inline]
    pub fn mark_once(&mut self, unit: u64) -> bool {
        match self.index(unit) {
            Some(idx) if !self.bitmap.get_bit(idx) => {
                self.bitmap.set_bit(idx, true);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_marked(&self, unit: u64) -> bool {
        self.index(unit).is_some_and(|idx| self.bitmap.get_bit(idx))
    }

    /// Number of marked units.
    pub fn marked(&self) -> usize {
        self.bitmap.count_ones()
    }

    /// Returns the number of tracked units.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the base unit offset.
    pub fn base_unit(&self) -> u64 {
        self.base_unit
    }
}
