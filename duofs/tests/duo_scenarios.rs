// SPDX-License-Identifier: MIT

use std::fs::OpenOptions;

use duofs::duo::*;

fn fresh_image(blocks: usize) -> Vec<u8> {
    let mut buf = vec![0u8; blocks * BLOCK_SIZE];
    let meta = DuoMeta::new(buf.len() as u64);
    let mut io = MemDuoIO::new(&mut buf);
    DuoFormatter::new(&mut io, &meta).format(false).unwrap();
    buf
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_docs_notes_scenario() {
    let mut buf = fresh_image(64);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();
    let data = pattern(600);

    fs.create_directory("/docs").unwrap();
    fs.create_file("/docs/notes.txt").unwrap();
    assert_eq!(fs.write("/docs/notes.txt", &data, 0).unwrap(), 600);

    let mut out = vec![0u8; 600];
    assert_eq!(fs.read("/docs/notes.txt", &mut out, 0).unwrap(), 600);
    assert_eq!(out, data);

    let attr = fs.get_attributes("/docs/notes.txt").unwrap();
    assert_eq!(attr.kind, DuoKind::File);
    assert_eq!(attr.size, 600);
    assert_eq!(attr.nlink, 1);
}

#[test]
fn test_attribute_queries() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();

    let root = fs.get_attributes("/").unwrap();
    assert!(root.is_dir());
    assert_eq!(root.nlink, 2);
    assert_eq!(root.mode, DIR_MODE);

    assert_eq!(fs.get_attributes("/nope"), Err(FsError::NotFound));
    fs.create_directory("/docs").unwrap();
    assert_eq!(fs.get_attributes("/docs/nope.txt"), Err(FsError::NotFound));
    assert!(fs.get_attributes("/docs").unwrap().is_dir());
}

#[test]
fn test_new_directory_starts_empty() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();

    fs.create_directory("/docs").unwrap();
    let listing = fs.list_directory("/docs").unwrap();
    let names: Vec<_> = listing.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, [".", ".."]);
}

#[test]
fn test_duplicate_directory_keeps_count() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();

    fs.create_directory("/docs").unwrap();
    assert_eq!(fs.create_directory("/docs"), Err(FsError::AlreadyExists));
    assert_eq!(fs.list_directory("/").unwrap().len(), 3);
}

#[test]
fn test_root_capacity_is_enforced() {
    let mut buf = fresh_image(64);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();

    for i in 0..MAX_DIRS_IN_ROOT {
        fs.create_directory(&format!("/dir{i}")).unwrap();
    }
    let err = fs.create_directory("/overflow").unwrap_err();
    assert_eq!(err, FsError::DirectoryFull);
    assert_eq!(err.kind(), FsErrorKind::DirectoryFull);
    assert_eq!(fs.list_directory("/").unwrap().len(), MAX_DIRS_IN_ROOT + 2);
}

#[test]
fn test_non_empty_directory_is_kept() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();

    fs.create_directory("/docs").unwrap();
    fs.create_file("/docs/a.txt").unwrap();
    assert_eq!(fs.remove_directory("/docs"), Err(FsError::NotEmpty));
    assert!(fs.get_attributes("/docs").is_ok());

    fs.remove_file("/docs/a.txt").unwrap();
    fs.remove_directory("/docs").unwrap();
    assert_eq!(fs.get_attributes("/docs"), Err(FsError::NotFound));
}

#[test]
fn test_round_trip_spanning_two_blocks() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();
    let data = pattern(1000);

    fs.create_directory("/d").unwrap();
    fs.create_file("/d/big.bin").unwrap();
    let (used_before, _) = fs.usage();
    fs.write("/d/big.bin", &data, 0).unwrap();

    assert_eq!(fs.usage().0 - used_before, 2);
    assert_eq!(fs.read_all("/d/big.bin").unwrap(), data);
}

#[test]
fn test_append_concatenates() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();
    let first = pattern(300);
    let second = vec![0x5A; 450];

    fs.create_directory("/d").unwrap();
    fs.create_file("/d/log").unwrap();
    fs.write("/d/log", &first, 0).unwrap();
    fs.write("/d/log", &second, 300).unwrap();

    assert_eq!(fs.get_attributes("/d/log").unwrap().size, 750);
    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(fs.read_all("/d/log").unwrap(), expected);
}

#[test]
fn test_write_past_end_touches_nothing() {
    let mut buf = fresh_image(16);
    let mut counter_io = MemDuoIO::new(&mut buf);
    let mut counter = IOCounter::new(&mut counter_io);
    let mut fs = DuoFs::mount(&mut counter).unwrap();

    fs.create_directory("/d").unwrap();
    fs.create_file("/d/f.txt").unwrap();
    fs.write("/d/f.txt", b"12345", 0).unwrap();

    let used = fs.usage();
    fs.io().stats.reset();
    assert_eq!(fs.write("/d/f.txt", b"x", 6), Err(FsError::InvalidOffset));

    assert_eq!(fs.usage(), used);
    assert_eq!(fs.io().snapshot().writes, 0);
    assert_eq!(fs.get_attributes("/d/f.txt").unwrap().size, 5);
}

#[test]
fn test_truncate_then_read() {
    let mut buf = fresh_image(16);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();
    let data = pattern(1100);

    fs.create_directory("/d").unwrap();
    fs.create_file("/d/t.dat").unwrap();
    fs.write("/d/t.dat", &data, 0).unwrap();
    let (used, _) = fs.usage();

    fs.truncate("/d/t.dat", 510).unwrap();
    assert_eq!(fs.usage().0, used - 1);
    assert_eq!(fs.read_all("/d/t.dat").unwrap(), &data[..510]);

    let mut out = [0u8; 16];
    assert_eq!(fs.read("/d/t.dat", &mut out, 510).unwrap(), 0);
    assert_eq!(fs.truncate("/d/t.dat", 2000), Err(FsError::InvalidOffset));
}

#[test]
fn test_freed_blocks_are_reused() {
    let mut buf = fresh_image(8);
    let mut io = MemDuoIO::new(&mut buf);
    let mut fs = DuoFs::mount(&mut io).unwrap();
    let data = pattern(5 * MAX_DATA_IN_BLOCK);

    fs.create_directory("/d").unwrap();
    fs.create_file("/d/a").unwrap();
    fs.create_file("/d/b").unwrap();
    fs.write("/d/a", &data, 0).unwrap();
    assert_eq!(fs.usage().1, 1);

    let err = fs.write("/d/b", &data[..2 * MAX_DATA_IN_BLOCK], 0).unwrap_err();
    assert_eq!(err.kind(), FsErrorKind::AllocationFailure);

    fs.remove_file("/d/a").unwrap();
    fs.write("/d/b", &data, 0).unwrap();
    assert_eq!(fs.read_all("/d/b").unwrap(), data);
}

#[test]
fn test_file_backed_image_survives_remount() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(tmp.path())
        .unwrap();
    file.set_len(DEFAULT_IMAGE_SIZE).unwrap();

    {
        let mut io = StdDuoIO::new(&mut file);
        let meta = DuoMeta::from_io(&mut io).unwrap();
        DuoFormatter::new(&mut io, &meta).format(false).unwrap();

        let mut fs = DuoFs::mount(&mut io).unwrap();
        fs.create_directory("/docs").unwrap();
        fs.create_file("/docs/notes.txt").unwrap();
        fs.write("/docs/notes.txt", b"persisted", 0).unwrap();
        fs.unmount().unwrap();
    }

    let mut io = StdDuoIO::new(&mut file);
    {
        let mut fs = DuoFs::mount(&mut io).unwrap();
        assert_eq!(fs.read_all("/docs/notes.txt").unwrap(), b"persisted");
    }

    let meta = DuoMeta::from_io(&mut io).unwrap();
    let report = DuoChecker::new(&mut io, &meta).check_all().unwrap();
    assert!(report.ok(), "{report}");
}

#[test]
fn test_truncated_backing_file_is_io_failure() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(tmp.path())
        .unwrap();
    file.set_len(100).unwrap();

    let mut io = StdDuoIO::new(&mut file);
    let err = DuoFs::mount_with(&mut io, DuoMeta::new(8 * BLOCK_SIZE as u64)).err();
    assert_eq!(err.map(|e| e.kind()), Some(FsErrorKind::IOFailure));
}

/// Memory image whose Nth write (after `arm`) fails.
struct FailingIO<'a> {
    inner: MemDuoIO<'a>,
    fail_at: Option<usize>,
    writes: Vec<u64>,
}

impl<'a> FailingIO<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            inner: MemDuoIO::new(buf),
            fail_at: None,
            writes: Vec::new(),
        }
    }

    fn arm(&mut self, nth: usize) {
        self.writes.clear();
        self.fail_at = Some(nth);
    }
}

impl DuoIO for FailingIO<'_> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> DuoIOResult {
        self.writes.push(offset);
        if self.fail_at == Some(self.writes.len()) {
            return Err(DuoIOError::Other("injected write failure"));
        }
        self.inner.write_at(offset, data)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> DuoIOResult {
        self.inner.read_at(offset, buf)
    }

    fn flush(&mut self) -> DuoIOResult {
        self.inner.flush()
    }

    fn capacity(&mut self) -> DuoIOResult<u64> {
        self.inner.capacity()
    }
}

/// Remounts `buf`, runs the checker and returns the content of `path`, if present.
fn remount_and_check(buf: &mut [u8], path: &str) -> Option<Vec<u8>> {
    let meta = DuoMeta::new(buf.len() as u64);
    let mut io = MemDuoIO::new(buf);
    let report = DuoChecker::new(&mut io, &meta).check_all().unwrap();
    assert!(report.ok(), "{report}");

    let mut fs = DuoFs::mount(&mut io).unwrap();
    match fs.read_all(path) {
        Ok(data) => {
            assert_eq!(fs.get_attributes(path).unwrap().size, data.len() as u64);
            Some(data)
        }
        Err(e) => {
            assert_eq!(e, FsError::NotFound);
            None
        }
    }
}

#[test]
fn test_failed_mkdir_leaves_root_untouched() {
    for fail_at in 1..=2 {
        let mut buf = fresh_image(16);
        {
            let mut io = FailingIO::new(&mut buf);
            let mut fs = DuoFs::mount(&mut io).unwrap();
            let used = fs.usage();

            fs.io().arm(fail_at);
            let err = fs.create_directory("/docs").unwrap_err();
            assert_eq!(err.kind(), FsErrorKind::IOFailure);
            assert_eq!(fs.usage(), used, "fail_at {fail_at}");
            assert_eq!(fs.get_attributes("/docs"), Err(FsError::NotFound));

            // Subdirectory block first, root last.
            let writes = fs.io().writes.clone();
            assert_eq!(writes.len(), fail_at);
            assert_ne!(writes[0], ROOT_BLOCK_OFFSET);

            fs.io().fail_at = None;
            fs.io().writes.clear();
            fs.create_directory("/docs").unwrap();
            assert_eq!(fs.io().writes, [BLOCK_SIZE as u64, ROOT_BLOCK_OFFSET]);
        }

        let meta = DuoMeta::new(buf.len() as u64);
        let mut io = MemDuoIO::new(&mut buf);
        let mut fs = DuoFs::mount(&mut io).unwrap();
        assert_eq!(fs.list_directory("/").unwrap().len(), 3);
        drop(fs);
        assert!(DuoChecker::new(&mut io, &meta).check_all().unwrap().ok());
    }
}

#[test]
fn test_failed_data_ops_keep_size_and_chain_consistent() {
    type Op = fn(&mut DuoFs<'_, FailingIO<'_>>) -> FsResult;
    let ops: [(&str, Op, &[u64]); 3] = [
        (
            "append",
            |fs| fs.write("/d/f.bin", &[0xEE; 1200], 700).map(|_| ()),
            &[700u64, 1900][..],
        ),
        ("truncate", |fs| fs.truncate("/d/f.bin", 100), &[700u64, 100][..]),
        ("remove", |fs| fs.remove_file("/d/f.bin"), &[700u64][..]),
    ];
    let original = pattern(700);

    for (name, op, sizes) in ops {
        for fail_at in 1..=6 {
            let mut buf = fresh_image(16);
            {
                let mut io = FailingIO::new(&mut buf);
                let mut fs = DuoFs::mount(&mut io).unwrap();
                fs.create_directory("/d").unwrap();
                fs.create_file("/d/f.bin").unwrap();
                fs.write("/d/f.bin", &original, 0).unwrap();

                fs.io().arm(fail_at);
                if let Err(e) = op(&mut fs) {
                    assert_eq!(e.kind(), FsErrorKind::IOFailure, "{name} fail_at {fail_at}");
                }
            }

            match remount_and_check(&mut buf, "/d/f.bin") {
                Some(data) => {
                    assert!(
                        sizes.contains(&(data.len() as u64)),
                        "{name} fail_at {fail_at}: size {}",
                        data.len()
                    );
                    let kept = data.len().min(original.len());
                    assert_eq!(data[..kept], original[..kept], "{name} fail_at {fail_at}");
                }
                None => assert_eq!(name, "remove", "fail_at {fail_at}"),
            }
        }
    }
}
