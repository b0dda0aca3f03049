// SPDX-License-Identifier: MIT

#[macro_use]
mod macros;
pub mod allocator;
pub mod checker;
pub mod errors;
pub mod formatter;
pub mod meta;
pub mod utils;

/// Seams each filesystem implements.
pub mod traits {
    pub use super::allocator::{FsAllocator, FsHandle};
    pub use super::checker::FsChecker;
    pub use super::formatter::FsFormatter;
    pub use super::meta::FsMeta;
}

pub use errors::*;
pub use utils::{bitmap::BitmapOps, path_utils::*};
