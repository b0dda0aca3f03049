// SPDX-License-Identifier: MIT

mod data;
mod dir;
mod root;

pub use data::*;
pub use dir::*;
pub use root::*;
