// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use duoio::DuoIO;

use crate::{
    core::errors::*,
    fs::duo::{attr::*, filesystem::DuoFs},
};

/// One host filesystem call.
#[derive(Debug, Clone, Copy)]
pub enum DuoOp<'p> {
    GetAttributes { path: &'p str },
    ListDirectory { path: &'p str },
    CreateDirectory { path: &'p str },
    RemoveDirectory { path: &'p str },
    CreateFile { path: &'p str },
    RemoveFile { path: &'p str },
    Read { path: &'p str, size: usize, offset: u64 },
    Write { path: &'p str, data: &'p [u8], offset: u64 },
    Truncate { path: &'p str, size: u64 },
    Open { path: &'p str },
    Flush { path: &'p str },
}

impl DuoOp<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            DuoOp::GetAttributes { .. } => "getattr",
            DuoOp::ListDirectory { .. } => "readdir",
            DuoOp::CreateDirectory { .. } => "mkdir",
            DuoOp::RemoveDirectory { .. } => "rmdir",
            DuoOp::CreateFile { .. } => "mknod",
            DuoOp::RemoveFile { .. } => "unlink",
            DuoOp::Read { .. } => "read",
            DuoOp::Write { .. } => "write",
            DuoOp::Truncate { .. } => "truncate",
            DuoOp::Open { .. } => "open",
            DuoOp::Flush { .. } => "flush",
        }
    }

    pub fn path(&self) -> &str {
        match *self {
            DuoOp::GetAttributes { path }
            | DuoOp::ListDirectory { path }
            | DuoOp::CreateDirectory { path }
            | DuoOp::RemoveDirectory { path }
            | DuoOp::CreateFile { path }
            | DuoOp::RemoveFile { path }
            | DuoOp::Read { path, .. }
            | DuoOp::Write { path, .. }
            | DuoOp::Truncate { path, .. }
            | DuoOp::Open { path }
            | DuoOp::Flush { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuoReply {
    Attr(DuoAttr),
    Entries(Vec<DuoDirent>),
    /// Bytes read; shorter than requested at end of file.
    Data(Vec<u8>),
    Written(usize),
    Done,
}

/// Routes one call to the mounted filesystem.
pub fn dispatch<IO: DuoIO + ?Sized>(fs: &mut DuoFs<'_, IO>, op: DuoOp<'_>) -> FsResult<DuoReply> {
    Ok(match op {
        DuoOp::GetAttributes { path } => DuoReply::Attr(fs.get_attributes(path)?),
        DuoOp::ListDirectory { path } => DuoReply::Entries(fs.list_directory(path)?),
        DuoOp::CreateDirectory { path } => {
            fs.create_directory(path)?;
            DuoReply::Done
        }
        DuoOp::RemoveDirectory { path } => {
            fs.remove_directory(path)?;
            DuoReply::Done
        }
        DuoOp::CreateFile { path } => {
            fs.create_file(path)?;
            DuoReply::Done
        }
        DuoOp::RemoveFile { path } => {
            fs.remove_file(path)?;
            DuoReply::Done
        }
        DuoOp::Read { path, size, offset } => {
            let mut buf = vec![0u8; size];
            let n = fs.read(path, &mut buf, offset)?;
            buf.truncate(n);
            DuoReply::Data(buf)
        }
        DuoOp::Write { path, data, offset } => DuoReply::Written(fs.write(path, data, offset)?),
        DuoOp::Truncate { path, size } => {
            fs.truncate(path, size)?;
            DuoReply::Done
        }
        DuoOp::Open { path } => {
            fs.open(path)?;
            DuoReply::Done
        }
        DuoOp::Flush { path } => {
            fs.flush(path)?;
            DuoReply::Done
        }
    })
}

/// Like [`dispatch`], with failures as a negative errno.
pub fn dispatch_errno<IO: DuoIO + ?Sized>(
    fs: &mut DuoFs<'_, IO>,
    op: DuoOp<'_>,
) -> Result<DuoReply, i32> {
    dispatch(fs, op).map_err(|e| -e.errno())
}
