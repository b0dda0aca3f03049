// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{format, string::String, vec::Vec};

use duoio::prelude::*;

pub use crate::core::checker::*;

use crate::{
    core::meta::FsMeta,
    fs::duo::{
        constant::*,
        file::blocks_for,
        meta::*,
        resolver::{validate_dir_name, validate_file_name},
        types::*,
    },
};

/// Offline consistency checker for a duofs image.
///
/// Reads the image directly and never writes to it.
pub struct DuoChecker<'a, IO: DuoIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a DuoMeta,
}

/// Outcome of following one data chain.
struct ChainWalk {
    blocks: Vec<u64>,
    fault: Option<(&'static str, String)>,
}

impl<'a, IO: DuoIO + ?Sized> DuoChecker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a DuoMeta) -> Self {
        Self { io, meta }
    }

    fn read_root(&mut self) -> FsCheckerResult<DuoRootBlock> {
        Ok(self.io.read_struct(ROOT_BLOCK_OFFSET)?)
    }

    /// Directories whose block offset is usable, in stored order.
    fn directories(&mut self) -> FsCheckerResult<Vec<(String, u64)>> {
        let root = self.read_root()?;
        let count = root.count().min(MAX_DIRS_IN_ROOT);
        Ok(root.dirs[..count]
            .iter()
            .filter(|d| self.meta.block_of(d.start_block()).is_some())
            .map(|d| {
                let name = d.name().unwrap_or("?");
                (String::from(name), d.start_block())
            })
            .collect())
    }

    /// Files of a directory block, clamped to capacity.
    fn files(&mut self, block: u64) -> FsCheckerResult<(usize, Vec<DuoFileEntry>)> {
        let dir: DuoDirBlock = self.io.read_struct(block)?;
        let count = dir.count();
        let valid = count.min(MAX_FILES_IN_DIR);
        Ok((count, dir.files[..valid].to_vec()))
    }

    fn walk_chain(&mut self, start: u64) -> FsCheckerResult<ChainWalk> {
        let mut blocks = Vec::new();
        let mut current = start;
        let limit = self.meta.total_units();

        while current != NO_BLOCK {
            if self.meta.block_of(current).is_none() {
                let msg = format!("link to invalid offset {current}");
                return Ok(ChainWalk {
                    blocks,
                    fault: Some(("CHAIN.RANGE", msg)),
                });
            }
            if blocks.len() >= limit {
                let msg = format!("chain longer than {limit} blocks");
                return Ok(ChainWalk {
                    blocks,
                    fault: Some(("CHAIN.LOOP", msg)),
                });
            }
            blocks.push(current);
            let block: DuoDataBlock = self.io.read_struct(current)?;
            current = block.next_block;
        }

        Ok(ChainWalk {
            blocks,
            fault: None,
        })
    }
}

/* ========================= FsChecker impl ========================= */

impl<'a, IO: DuoIO + ?Sized> FsChecker for DuoChecker<'a, IO> {
    type Options = CoreVerifyOptions;

    fn check_geometry(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let capacity = self.io.capacity()?;

        if self.meta.total_blocks < MIN_IMAGE_BLOCKS {
            rep.push(Finding::err(
                "GEO.SIZE",
                format!("{} blocks, at least {MIN_IMAGE_BLOCKS} needed", self.meta.total_blocks),
            ));
        }
        if !self.meta.is_block_aligned() {
            rep.push(Finding::warn(
                "GEO.ALIGN",
                format!("{} trailing bytes ignored", self.meta.size_bytes() % BLOCK_SIZE as u64),
            ));
        }
        if capacity < self.meta.size_bytes() {
            rep.push(Finding::err(
                "GEO.SHORT",
                format!("image holds {capacity} bytes, geometry expects {}", self.meta.size_bytes()),
            ));
        }
        rep.push(Finding::info(
            "GEO.OK",
            format!("{} blocks of {BLOCK_SIZE} bytes", self.meta.total_blocks),
        ));
        Ok(())
    }

    fn check_root(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        let root = self.read_root()?;
        let count = root.count();
        if count > MAX_DIRS_IN_ROOT {
            rep.push(Finding::err(
                "ROOT.COUNT",
                format!("{count} directories, capacity {MAX_DIRS_IN_ROOT}"),
            ));
            return Ok(());
        }

        for (i, dir) in root.dirs[..count].iter().enumerate() {
            let start = dir.start_block();
            match dir.name() {
                Ok(name) => {
                    if let Err(e) = validate_dir_name(name) {
                        rep.push(Finding::err("ROOT.NAME", format!("slot {i} '{name}': {e}")));
                    }
                    let dup = root.dirs[..i].iter().any(|d| d.name == dir.name);
                    if dup {
                        rep.push(Finding::err("ROOT.DUP", format!("directory '{name}' listed twice")));
                    }
                }
                Err(_) => rep.push(Finding::err("ROOT.NAME", format!("slot {i}: name is not UTF-8"))),
            }
            if self.meta.block_of(start).is_none() {
                rep.push(Finding::err(
                    "ROOT.RANGE",
                    format!("slot {i}: directory block at invalid offset {start}"),
                ));
            }
        }

        rep.push(Finding::info("ROOT.OK", format!("{count} directories")));
        Ok(())
    }

    fn check_chain(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        let mut files_seen = 0usize;
        let mut blocks_seen = 0usize;

        for (dir_name, block) in self.directories()? {
            let (count, files) = self.files(block)?;
            if count > MAX_FILES_IN_DIR {
                rep.push(Finding::err(
                    "DIR.COUNT",
                    format!("/{dir_name}: {count} files, capacity {MAX_FILES_IN_DIR}"),
                ));
                continue;
            }

            for (i, entry) in files.iter().enumerate() {
                files_seen += 1;
                let label = match entry.display_name() {
                    Ok(name) => {
                        let (n, e) = (entry.name().unwrap_or(""), entry.ext().unwrap_or(""));
                        if let Err(err) = validate_file_name(n, e) {
                            rep.push(Finding::err("DIR.NAME", format!("/{dir_name}/{name}: {err}")));
                        }
                        if files[..i].iter().any(|f| f.name == entry.name && f.ext == entry.ext) {
                            rep.push(Finding::err("DIR.DUP", format!("/{dir_name}/{name} listed twice")));
                        }
                        format!("/{dir_name}/{name}")
                    }
                    Err(_) => {
                        rep.push(Finding::err("DIR.NAME", format!("/{dir_name}: slot {i} is not UTF-8")));
                        format!("/{dir_name}#{i}")
                    }
                };

                let size = entry.size();
                let walk = self.walk_chain(entry.start_block())?;
                blocks_seen += walk.blocks.len();
                if let Some((code, msg)) = walk.fault {
                    rep.push(Finding::err(code, format!("{label}: {msg}")));
                    continue;
                }

                let needed = blocks_for(size);
                if walk.blocks.len() < needed {
                    rep.push(Finding::err(
                        "CHAIN.SHORT",
                        format!("{label}: {size} bytes need {needed} blocks, chain has {}", walk.blocks.len()),
                    ));
                } else if walk.blocks.len() > needed {
                    rep.push(Finding::warn(
                        "CHAIN.SLACK",
                        format!("{label}: {} unused blocks past end of file", walk.blocks.len() - needed),
                    ));
                }
            }
        }

        rep.push(Finding::info(
            "CHAIN.STATS",
            format!("{files_seen} files, {blocks_seen} data blocks"),
        ));
        Ok(())
    }

    fn check_cross_reference(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let mut tracker =
            ReachabilityTracker::new(self.meta.first_data_unit(), self.meta.total_units());
        let unit = |offset: u64| offset / BLOCK_SIZE as u64;

        for (dir_name, block) in self.directories()? {
            if !tracker.mark_once(unit(block)) {
                rep.push(Finding::err(
                    "XREF.DUP",
                    format!("block {block} of /{dir_name} is already in use"),
                ));
                continue;
            }

            let (count, files) = self.files(block)?;
            if count > MAX_FILES_IN_DIR {
                continue;
            }
            for entry in &files {
                let walk = self.walk_chain(entry.start_block())?;
                for offset in walk.blocks {
                    if !tracker.mark_once(unit(offset)) {
                        let name = entry.display_name().unwrap_or_default();
                        rep.push(Finding::err(
                            "XREF.DUP",
                            format!("block {offset} of /{dir_name}/{name} is already in use"),
                        ));
                        break;
                    }
                }
            }
        }

        rep.push(Finding::info(
            "XREF.USAGE",
            format!("{} of {} blocks referenced", tracker.marked(), tracker.count()),
        ));
        Ok(())
    }
}
