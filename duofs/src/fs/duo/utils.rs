// SPDX-License-Identifier: MIT

use crate::core::errors::*;

/// Copies `name` into a NUL-padded fixed field.
///
/// The caller guarantees `name.len() < N`; extra bytes are dropped otherwise.
pub fn encode_name<const N: usize>(name: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let len = name.len().min(N.saturating_sub(1));
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
    field
}

/// Bytes of a NUL-padded field up to the first NUL.
#[inline]
pub fn name_bytes(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}

pub fn decode_name(field: &[u8]) -> FsResult<&str> {
    core::str::from_utf8(name_bytes(field)).map_err(|_| FsError::Corrupted("Name is not valid UTF-8"))
}

/// Exact, case-sensitive match of a stored field against `name`.
#[inline]
pub fn name_eq(field: &[u8], name: &str) -> bool {
    name_bytes(field) == name.as_bytes()
}
