// SPDX-License-Identifier: MIT

use core::fmt;

#[derive(Debug)]
pub enum LayoutError {
    TooManyDirectories(usize),
    TooManyFiles(String, usize),
    SizeTooSmall(u64, u64),
    InvalidName(String, &'static str),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::TooManyDirectories(max) => {
                write!(f, "The root holds at most {max} directories")
            }
            LayoutError::TooManyFiles(dir, max) => {
                write!(f, "Directory '{dir}' holds at most {max} files")
            }
            LayoutError::SizeTooSmall(size, needed) => {
                write!(f, "Image of {size} bytes cannot hold the layout (needs {needed})")
            }
            LayoutError::InvalidName(name, why) => write!(f, "Invalid name '{name}': {why}"),
        }
    }
}

impl std::error::Error for LayoutError {}
