// SPDX-License-Identifier: MIT

pub mod duo;
