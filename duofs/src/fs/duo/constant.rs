// SPDX-License-Identifier: MIT

// === Disk Layout Parameters ===

pub const BLOCK_SIZE: usize = 512;
pub const MAX_FILENAME: usize = 8;
pub const MAX_EXTENSION: usize = 3;

// Name fields keep one byte for the terminating NUL.
pub const NAME_FIELD_LEN: usize = MAX_FILENAME + 1;
pub const EXT_FIELD_LEN: usize = MAX_EXTENSION + 1;

pub const COUNT_FIELD_LEN: usize = size_of::<u32>();
pub const OFFSET_FIELD_LEN: usize = size_of::<u64>();
pub const SIZE_FIELD_LEN: usize = size_of::<u64>();

// === Root Directory Block ===

pub const DIR_ENTRY_SIZE: usize = NAME_FIELD_LEN + OFFSET_FIELD_LEN;
pub const MAX_DIRS_IN_ROOT: usize = (BLOCK_SIZE - COUNT_FIELD_LEN) / DIR_ENTRY_SIZE;
pub const ROOT_PADDING: usize = BLOCK_SIZE - COUNT_FIELD_LEN - MAX_DIRS_IN_ROOT * DIR_ENTRY_SIZE;

// === Subdirectory Block ===

pub const FILE_ENTRY_SIZE: usize = NAME_FIELD_LEN + EXT_FIELD_LEN + SIZE_FIELD_LEN + OFFSET_FIELD_LEN;
pub const MAX_FILES_IN_DIR: usize = (BLOCK_SIZE - COUNT_FIELD_LEN) / FILE_ENTRY_SIZE;
pub const DIR_PADDING: usize = BLOCK_SIZE - COUNT_FIELD_LEN - MAX_FILES_IN_DIR * FILE_ENTRY_SIZE;

// === Data Block ===

pub const MAX_DATA_IN_BLOCK: usize = BLOCK_SIZE - OFFSET_FIELD_LEN;

// === Special Offsets ===

pub const ROOT_BLOCK_OFFSET: u64 = 0;
/// "No block yet" for an empty file and "end of chain" for a data block.
pub const NO_BLOCK: u64 = 0;

// === Image Geometry ===

pub const MIN_IMAGE_BLOCKS: u64 = 2;
pub const DEFAULT_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

// === Attributes ===

pub const DIR_MODE: u32 = libc::S_IFDIR as u32 | 0o755;
pub const FILE_MODE: u32 = libc::S_IFREG as u32 | 0o666;
pub const DIR_NLINK: u32 = 2;
pub const FILE_NLINK: u32 = 1;

pub const DOT_NAME: &str = ".";
pub const DOTDOT_NAME: &str = "..";
