use std::io::Read;

use duofs::duo::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::image::run_op;

/// Streams `reader` into an image file starting at offset 0.
///
/// Each chunk is appended through the dispatcher, like any host write.
pub fn copy_with_progress<R: Read, IO: DuoIO + ?Sized>(
    reader: &mut R,
    fs: &mut DuoFs<'_, IO>,
    path: &str,
    total_size: u64,
    message: &str,
) -> anyhow::Result<u64> {
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.white}] {bytes}/{total_bytes} (ETA {eta_precise}) {msg}")?
            .progress_chars("█░░"),
    );
    pb.set_message(message.to_string());

    // Several data blocks per chunk keeps the chain walk short.
    let mut buffer = vec![0u8; 64 * MAX_DATA_IN_BLOCK];
    let mut copied = 0u64;

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }

        let op = DuoOp::Write {
            path,
            data: &buffer[..n],
            offset: copied,
        };
        run_op(fs, op)?;

        copied += n as u64;
        pb.inc(n as u64);
    }

    pb.finish_and_clear();
    Ok(copied)
}
