// SPDX-License-Identifier: MIT

use crate::{
    core::{errors::*, utils::path_utils::split_name_ext},
    fs::duo::constant::*,
};

/// A syntactically valid absolute path, decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuoPath<'p> {
    Root,
    Directory { dir: &'p str },
    File { dir: &'p str, name: &'p str, ext: &'p str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuoPathKind {
    Root,
    Directory,
    File,
    Invalid,
}

impl DuoPath<'_> {
    pub fn kind(&self) -> DuoPathKind {
        match self {
            DuoPath::Root => DuoPathKind::Root,
            DuoPath::Directory { .. } => DuoPathKind::Directory,
            DuoPath::File { .. } => DuoPathKind::File,
        }
    }
}

/// Parses `/`, `/dir` or `/dir/name[.ext]`.
///
/// A single trailing `/` is accepted. Directory names carry no extension;
/// file names split at the first `.`.
pub fn resolve_path(path: &str) -> FsPathResult<DuoPath<'_>> {
    let rest = path.strip_prefix('/').ok_or(FsPathError::NotRooted)?;
    if rest.is_empty() {
        return Ok(DuoPath::Root);
    }
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    let mut parts = rest.split('/');
    let dir = parts.next().unwrap_or("");
    let file = parts.next();
    crate::ensure!(parts.next().is_none(), FsPathError::TooDeep);

    validate_dir_name(dir)?;
    let Some(file) = file else {
        return Ok(DuoPath::Directory { dir });
    };

    let (name, ext) = split_name_ext(file);
    crate::ensure!(ext != Some(""), FsPathError::BadName);
    let ext = ext.unwrap_or("");
    validate_file_name(name, ext)?;
    Ok(DuoPath::File { dir, name, ext })
}

/// Classification that never fails; malformed paths are `Invalid`.
pub fn classify(path: &str) -> DuoPathKind {
    resolve_path(path).map_or(DuoPathKind::Invalid, |p| p.kind())
}

pub fn validate_dir_name(name: &str) -> FsPathResult {
    validate_component(name, MAX_FILENAME, FsPathError::NameTooLong)
}

/// `ext` may be empty; `name` may not.
pub fn validate_file_name(name: &str, ext: &str) -> FsPathResult {
    validate_component(name, MAX_FILENAME, FsPathError::NameTooLong)?;
    if !ext.is_empty() {
        validate_component(ext, MAX_EXTENSION, FsPathError::ExtensionTooLong)?;
    }
    Ok(())
}

fn validate_component(part: &str, max: usize, too_long: FsPathError) -> FsPathResult {
    crate::ensure!(!part.is_empty(), FsPathError::EmptyComponent);
    crate::ensure!(part.len() <= max, too_long);
    crate::ensure!(
        !part.bytes().any(|b| b == b'.' || b == b'\0' || b == b'\\'),
        FsPathError::BadName
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_levels() {
        assert_eq!(resolve_path("/"), Ok(DuoPath::Root));
        assert_eq!(resolve_path("/docs"), Ok(DuoPath::Directory { dir: "docs" }));
        assert_eq!(resolve_path("/docs/"), Ok(DuoPath::Directory { dir: "docs" }));
        assert_eq!(
            resolve_path("/docs/notes.txt"),
            Ok(DuoPath::File {
                dir: "docs",
                name: "notes",
                ext: "txt"
            })
        );
        assert_eq!(
            resolve_path("/docs/readme"),
            Ok(DuoPath::File {
                dir: "docs",
                name: "readme",
                ext: ""
            })
        );
    }

    #[test]
    fn test_rejects_malformed_paths() {
        assert_eq!(resolve_path("docs"), Err(FsPathError::NotRooted));
        assert_eq!(resolve_path(""), Err(FsPathError::NotRooted));
        assert_eq!(resolve_path("/a/b/c"), Err(FsPathError::TooDeep));
        assert_eq!(resolve_path("//a"), Err(FsPathError::EmptyComponent));
        assert_eq!(resolve_path("/toolongdir"), Err(FsPathError::NameTooLong));
        assert_eq!(resolve_path("/d/toolongfi.txt"), Err(FsPathError::NameTooLong));
        assert_eq!(resolve_path("/d/a.text"), Err(FsPathError::ExtensionTooLong));
        assert_eq!(resolve_path("/d/trail."), Err(FsPathError::BadName));
        assert_eq!(resolve_path("/d/a.b.c"), Err(FsPathError::BadName));
        assert_eq!(resolve_path("/d.x"), Err(FsPathError::BadName));
        assert_eq!(resolve_path("/d/.txt"), Err(FsPathError::EmptyComponent));
    }

    #[test]
    fn test_boundary_lengths_are_accepted() {
        assert_eq!(classify("/abcdefgh"), DuoPathKind::Directory);
        assert_eq!(classify("/abcdefgh/abcdefgh.xyz"), DuoPathKind::File);
        assert_eq!(classify("/a/b/c"), DuoPathKind::Invalid);
    }
}
