use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, anyhow};
use duofs::duo::*;

use crate::log_verbose;

pub type ImageFs<'a, 'b> = DuoFs<'a, StdDuoIO<'b, File>>;

/// Library errors are `Copy` enums without `std::error::Error`; flatten them here.
pub fn lib_err<E: core::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("{}", e)
}

pub fn open_image(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("Cannot open image '{}'", path.display()))
}

/// Creates (or resizes) `path` to `size` bytes and writes an empty root.
pub fn create_image(path: &Path, size: u64, full: bool) -> anyhow::Result<DuoMeta> {
    let meta = DuoMeta::new(size);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Cannot create image '{}'", path.display()))?;

    let mut io = StdDuoIO::new(&mut file);
    io.set_len(size).map_err(lib_err)?;
    log_verbose!("Formatting {} blocks (full: {full})", meta.total_blocks);
    DuoFormatter::new(&mut io, &meta)
        .format(full)
        .map_err(lib_err)?;
    Ok(meta)
}

pub fn mount<'a, 'b>(io: &'a mut StdDuoIO<'b, File>) -> anyhow::Result<ImageFs<'a, 'b>> {
    let fs = DuoFs::mount(io).map_err(|e| anyhow!("Mount failed: {}", e))?;
    let (used, free) = fs.usage();
    log_verbose!("Mounted: {used} blocks used, {free} free");
    Ok(fs)
}

pub fn unmount(fs: ImageFs<'_, '_>) -> anyhow::Result<()> {
    fs.unmount().map_err(lib_err)?;
    Ok(())
}

/// Runs one operation, naming it in the error.
pub fn run_op<IO: DuoIO + ?Sized>(
    fs: &mut DuoFs<'_, IO>,
    op: DuoOp<'_>,
) -> anyhow::Result<DuoReply> {
    log_verbose!("{} {}", op.name(), op.path());
    dispatch(fs, op).map_err(|e| anyhow!("{} '{}': {}", op.name(), op.path(), e))
}
