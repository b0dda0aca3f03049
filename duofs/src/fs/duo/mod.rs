// SPDX-License-Identifier: MIT

pub mod allocator;
pub mod attr;
pub mod checker;
pub mod constant;
pub mod cursor;
pub mod directory;
pub mod file;
pub mod filesystem;
pub mod formatter;
pub mod meta;
pub mod ops;
pub mod resolver;
pub mod store;
pub mod types;
pub mod utils;

// === Public Interface ===
pub mod traits {
    pub use super::allocator::{DuoAllocator, DuoHandle};
    pub use super::checker::DuoChecker;
    pub use super::formatter::DuoFormatter;
    pub use super::meta::DuoMeta;
}

pub mod prelude {
    pub use super::attr::{DuoAttr, DuoDirent, DuoKind};
    pub use super::constant::*;
    pub use super::filesystem::DuoFs;
    pub use super::ops::{DuoOp, DuoReply, dispatch, dispatch_errno};
    pub use super::resolver::{DuoPath, DuoPathKind, resolve_path};
    pub use super::traits::*;
    pub use super::types::*;
    pub use crate::core::checker::{CoreVerifyOptions, VerifyPhases, VerifyReport};
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use duoio::prelude::*;
}
