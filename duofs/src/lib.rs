// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
#[macro_use]
extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use crate::core::traits::*;

// Utilities
pub use crate::core::utils::path_utils::*;

// Filesystem APIs
/// Two-level directory filesystem with linked data blocks.
///
/// See [`duo::DuoFs`], [`duo::DuoFormatter`], [`duo::DuoChecker`] and [`duo::dispatch`].
pub mod duo {
    pub use super::fs::duo::prelude::*;
}
