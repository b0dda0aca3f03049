// SPDX-License-Identifier: MIT

pub mod bitmap;
pub mod path_utils;
