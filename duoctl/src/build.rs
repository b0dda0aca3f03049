use std::fs::File;
use std::path::Path;

use duofs::duo::*;

use crate::image::*;
use crate::layout::Layout;
use crate::utils::*;
use crate::{log_info, log_verbose};

/// Formats `output` and fills it from `layout`.
pub fn build(layout: &Layout, output: &Path, dry_run: bool) -> anyhow::Result<()> {
    layout.validate()?;
    log_info!("{layout}");
    log_verbose!(
        "Layout needs {} of {}",
        pretty_bytes(layout.needed_bytes()?),
        layout.size
    );

    if dry_run {
        log_info!("Dry run mode: no data will be written.");
        return Ok(());
    }
    log_info!("Writing image to: {}", output.display());

    create_image(output, layout.size.bytes(), false)?;
    let mut file = open_image(output)?;
    let mut io = StdDuoIO::new(&mut file);
    let mut fs = mount(&mut io)?;

    for dir in &layout.dirs {
        let dir_path = format!("/{}", dir.name);
        run_op(&mut fs, DuoOp::CreateDirectory { path: &dir_path })?;

        for entry in &dir.files {
            let path = format!("{dir_path}/{}", entry.image_name()?);
            let source_path = layout.source_path(entry);
            let mut source = File::open(&source_path)?;
            let len = source.metadata()?.len();

            run_op(&mut fs, DuoOp::CreateFile { path: &path })?;
            let copied = copy_with_progress(&mut source, &mut fs, &path, len, &path)?;
            log_verbose!("{} -> {path} ({})", source_path.display(), pretty_bytes(copied));
        }
    }

    let (used, free) = fs.usage();
    unmount(fs)?;
    log_info!(
        "Done: {} directories, {} files, {used} blocks used, {free} free",
        layout.dirs.len(),
        layout.file_count()
    );
    Ok(())
}
