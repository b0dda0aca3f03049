// SPDX-License-Identifier: MIT

//! Path helpers shared by the resolver and the command-line front end.
//!
//! Paths use `/` separators only.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

/// Join two path components with `/`, ensuring no duplicate slash.
pub fn join_paths(base: &str, part: &str) -> String {
    let mut out = String::new();
    out.push_str(base.trim_end_matches('/'));
    out.push('/');
    out.push_str(part.trim_start_matches('/'));
    out
}

/// Splits a file name at its first `.` into `(name, extension)`.
///
/// `notes.txt` → `("notes", Some("txt"))`, `readme` → `("readme", None)`.
/// A trailing dot yields `Some("")`.
pub fn split_name_ext(file_name: &str) -> (&str, Option<&str>) {
    match file_name.split_once('.') {
        Some((name, ext)) => (name, Some(ext)),
        None => (file_name, None),
    }
}
