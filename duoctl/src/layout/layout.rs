// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use duofs::duo::*;
use duofs::fs::duo::file::blocks_for;

use crate::layout::{error::LayoutError, size::Size};

fn default_size() -> Size {
    Size(DEFAULT_IMAGE_SIZE)
}

/// Image description read from a `layout.toml`.
///
/// ```toml
/// size = "5M"
///
/// [[dirs]]
/// name = "docs"
/// files = [{ source = "notes.txt" }, { source = "build/out.bin", name = "out.bin" }]
/// ```
#[derive(Debug, Deserialize)]
pub struct Layout {
    #[serde(skip)]
    pub base_dir: PathBuf,
    #[serde(default = "default_size")]
    pub size: Size,
    #[serde(default)]
    pub dirs: Vec<LayoutDir>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutDir {
    pub name: String,
    #[serde(default)]
    pub files: Vec<LayoutFile>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutFile {
    /// Host path, relative to the layout file.
    pub source: PathBuf,
    /// Name inside the image; defaults to the source file name.
    pub name: Option<String>,
}

impl LayoutFile {
    pub fn image_name(&self) -> anyhow::Result<String> {
        match &self.name {
            Some(name) => Ok(name.clone()),
            None => self
                .source
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("No file name in '{}'", self.source.display())),
        }
    }
}

impl Layout {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut layout = Self::from_str_in(&content, Path::new("."))?;
        layout.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .canonicalize()?
            .to_path_buf();
        Ok(layout)
    }

    pub fn from_str_in(content: &str, base_dir: &Path) -> anyhow::Result<Self> {
        let mut layout: Layout = toml::from_str(content)?;
        layout.base_dir = base_dir.to_path_buf();
        Ok(layout)
    }

    pub fn source_path(&self, file: &LayoutFile) -> PathBuf {
        self.base_dir.join(&file.source)
    }

    /// Checks names, capacities and that every host file fits.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dirs.len() > MAX_DIRS_IN_ROOT {
            return Err(LayoutError::TooManyDirectories(MAX_DIRS_IN_ROOT).into());
        }

        for dir in &self.dirs {
            resolve_path(&format!("/{}", dir.name))
                .map_err(|e| LayoutError::InvalidName(dir.name.clone(), e.msg()))?;
            if dir.files.len() > MAX_FILES_IN_DIR {
                return Err(LayoutError::TooManyFiles(dir.name.clone(), MAX_FILES_IN_DIR).into());
            }
            for file in &dir.files {
                let name = file.image_name()?;
                resolve_path(&format!("/{}/{}", dir.name, name))
                    .map_err(|e| LayoutError::InvalidName(name.clone(), e.msg()))?;
            }
        }

        let needed = self.needed_bytes()?;
        if needed > self.size.bytes() {
            return Err(LayoutError::SizeTooSmall(self.size.bytes(), needed).into());
        }
        Ok(())
    }

    /// Bytes taken by the root, the directory blocks and every data chain.
    pub fn needed_bytes(&self) -> anyhow::Result<u64> {
        let mut blocks = 1 + self.dirs.len() as u64;
        for dir in &self.dirs {
            for file in &dir.files {
                let len = fs::metadata(self.source_path(file))?.len();
                blocks += blocks_for(len) as u64;
            }
        }
        Ok(blocks * BLOCK_SIZE as u64)
    }

    pub fn file_count(&self) -> usize {
        self.dirs.iter().map(|d| d.files.len()).sum()
    }
}

impl core::fmt::Display for Layout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "\n  ┌───────────┬──────────────────────────────────────────┐")?;
        writeln!(f, "  | Directory | Files                                    |")?;
        writeln!(f, "  ├───────────┼──────────────────────────────────────────┤")?;
        for dir in &self.dirs {
            let names: Vec<String> = dir
                .files
                .iter()
                .map(|file| file.image_name().unwrap_or_else(|_| "?".into()))
                .collect();
            let mut joined = names.join(", ");
            if joined.len() > 40 {
                joined.truncate(37);
                joined.push_str("...");
            }
            writeln!(f, "  | {:<9} | {:<40} |", dir.name, joined)?;
        }
        writeln!(f, "  └───────────┴──────────────────────────────────────────┘")?;
        write!(
            f,
            "  {} directories, {} files, image size {}",
            self.dirs.len(),
            self.file_count(),
            self.size
        )
    }
}
