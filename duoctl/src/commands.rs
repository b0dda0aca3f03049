use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail};
use duofs::core::checker::{ReportDisplayOpts, Severity};
use duofs::duo::*;

use crate::image::*;
use crate::utils::*;
use crate::{log_info, log_normal, log_verbose};

/// Mounts `image`, runs `f`, then flushes and unmounts.
macro_rules! with_image_fs {
    ($image:expr, |$fs:ident| $body:block) => {{
        let mut file = open_image($image)?;
        let mut io = StdDuoIO::new(&mut file);
        let mut $fs = mount(&mut io)?;
        let out = (|| -> anyhow::Result<_> { $body })();
        unmount($fs)?;
        out
    }};
}

pub fn format(image: &Path, size: u64, full: bool) -> anyhow::Result<()> {
    let meta = create_image(image, size, full)?;
    log_info!(
        "Formatted '{}': {} blocks of {} bytes ({})",
        image.display(),
        meta.total_blocks,
        meta.block_size,
        pretty_bytes(meta.size_bytes)
    );
    Ok(())
}

pub fn stat(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        let DuoReply::Attr(attr) = run_op(&mut fs, DuoOp::GetAttributes { path })? else {
            bail!("unexpected reply");
        };
        log_normal!(
            "{path}: {} {} links={} size={}",
            if attr.is_dir() { "directory" } else { "file" },
            mode_string(attr.mode),
            attr.nlink,
            attr.size
        );
        Ok(())
    })
}

pub fn ls(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        let DuoReply::Entries(entries) = run_op(&mut fs, DuoOp::ListDirectory { path })? else {
            bail!("unexpected reply");
        };
        let mut out = std::io::stdout().lock();
        for entry in entries {
            if entry.name == DOT_NAME || entry.name == DOTDOT_NAME {
                writeln!(out, "{}  {:>8}  {}", mode_string(DIR_MODE), "-", entry.name)?;
                continue;
            }
            let attr = fs
                .get_attributes(&duofs::join_paths(path, &entry.name))
                .map_err(lib_err)?;
            let size = match entry.kind {
                DuoKind::Directory => "-".to_string(),
                DuoKind::File => attr.size.to_string(),
            };
            writeln!(out, "{}  {:>8}  {}", mode_string(attr.mode), size, entry.name)?;
        }
        Ok(())
    })
}

pub fn mkdir(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        run_op(&mut fs, DuoOp::CreateDirectory { path })?;
        log_info!("Created directory {path}");
        Ok(())
    })
}

pub fn rmdir(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        run_op(&mut fs, DuoOp::RemoveDirectory { path })?;
        log_info!("Removed directory {path}");
        Ok(())
    })
}

pub fn touch(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        run_op(&mut fs, DuoOp::CreateFile { path })?;
        log_info!("Created file {path}");
        Ok(())
    })
}

pub fn rm(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        run_op(&mut fs, DuoOp::RemoveFile { path })?;
        log_info!("Removed file {path}");
        Ok(())
    })
}

/// Copies a host file into the image, replacing any previous content.
pub fn put(image: &Path, host: &Path, path: &str) -> anyhow::Result<()> {
    let mut source =
        File::open(host).map_err(|e| anyhow!("Cannot open '{}': {e}", host.display()))?;
    let len = source.metadata()?.len();

    with_image_fs!(image, |fs| {
        match fs.get_attributes(path) {
            Ok(attr) if attr.is_dir() => bail!("'{path}' is a directory"),
            Ok(_) => {
                run_op(&mut fs, DuoOp::Truncate { path, size: 0 })?;
            }
            Err(FsError::NotFound) => {
                run_op(&mut fs, DuoOp::CreateFile { path })?;
            }
            Err(e) => return Err(lib_err(e)),
        }
        run_op(&mut fs, DuoOp::Open { path })?;

        let copied = copy_with_progress(&mut source, &mut fs, path, len, path)?;
        run_op(&mut fs, DuoOp::Flush { path })?;
        log_info!("Wrote {} to {path}", pretty_bytes(copied));
        Ok(())
    })
}

pub fn cat(image: &Path, path: &str) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        let DuoReply::Attr(attr) = run_op(&mut fs, DuoOp::GetAttributes { path })? else {
            bail!("unexpected reply");
        };
        let size = usize::try_from(attr.size)?;
        let DuoReply::Data(data) = run_op(&mut fs, DuoOp::Read { path, size, offset: 0 })? else {
            bail!("unexpected reply");
        };
        std::io::stdout().lock().write_all(&data)?;
        Ok(())
    })
}

pub fn truncate(image: &Path, path: &str, size: u64) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        run_op(&mut fs, DuoOp::Truncate { path, size })?;
        log_info!("Truncated {path} to {size} bytes");
        Ok(())
    })
}

pub fn check(image: &Path, fail_fast: bool) -> anyhow::Result<()> {
    let mut file = open_image(image)?;
    let mut io = StdDuoIO::new(&mut file);
    let meta = DuoMeta::from_io(&mut io).map_err(lib_err)?;

    let opts = CoreVerifyOptions {
        phases: VerifyPhases::ALL,
        fail_fast,
    };
    let report = DuoChecker::new(&mut io, &meta)
        .check_with(&opts)
        .map_err(lib_err)?;

    let min_level = if log_level() == LogLevel::Verbose {
        Severity::Info
    } else {
        Severity::Warn
    };
    print!(
        "{}",
        report.display_with(ReportDisplayOpts {
            min_level,
            prefix: "  ",
            show_summary: log_level() != LogLevel::Quiet,
            ..ReportDisplayOpts::default()
        })
    );

    if let Some(first) = report.first_error() {
        bail!("'{}' is inconsistent: {first}", image.display());
    }
    log_info!("'{}' is consistent", image.display());
    Ok(())
}

pub fn info(image: &Path) -> anyhow::Result<()> {
    with_image_fs!(image, |fs| {
        let meta = fs.meta().clone();
        let (used, free) = fs.usage();
        let DuoReply::Entries(entries) =
            run_op(&mut fs, DuoOp::ListDirectory { path: "/" })?
        else {
            bail!("unexpected reply");
        };
        let dirs = entries.len().saturating_sub(2);

        log_normal!("Image      : {}", image.display());
        log_normal!("Size       : {}", pretty_bytes(meta.size_bytes));
        log_normal!("Block size : {} bytes", meta.block_size);
        log_normal!(
            "Blocks     : {} ({} data)",
            sep_u64(meta.total_blocks),
            meta.total_units()
        );
        log_normal!("Used       : {} blocks", sep_u64(used as u64));
        log_normal!(
            "Free       : {} blocks ({})",
            sep_u64(free as u64),
            pretty_bytes(free as u64 * MAX_DATA_IN_BLOCK as u64)
        );
        log_normal!("Directories: {dirs} / {MAX_DIRS_IN_ROOT}");
        log_verbose!("Files per directory: {MAX_FILES_IN_DIR}");
        Ok(())
    })
}
