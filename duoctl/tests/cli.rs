use std::path::Path;
use std::process::{Command, Output};

fn duoctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_duoctl"))
        .args(args)
        .output()
        .expect("failed to spawn duoctl")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_put_then_cat_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.img");
    let host = dir.path().join("notes.txt");
    let payload: Vec<u8> = (0..2000u32).map(|i| b'a' + (i % 26) as u8).collect();
    std::fs::write(&host, &payload).unwrap();

    assert!(duoctl(&["format", arg(&image), "--size", "64K"]).status.success());
    assert!(duoctl(&["mkdir", arg(&image), "/docs"]).status.success());
    assert!(duoctl(&["-q", "put", arg(&image), arg(&host), "/docs/notes.txt"]).status.success());

    let out = duoctl(&["cat", arg(&image), "/docs/notes.txt"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, payload);

    let out = duoctl(&["stat", arg(&image), "/docs/notes.txt"]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("size=2000"));

    assert!(duoctl(&["check", arg(&image)]).status.success());
}

#[test]
fn test_failing_operation_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.img");

    assert!(duoctl(&["format", arg(&image), "--size", "16K"]).status.success());
    assert!(duoctl(&["mkdir", arg(&image), "/docs"]).status.success());
    assert!(duoctl(&["touch", arg(&image), "/docs/a.txt"]).status.success());

    let out = duoctl(&["rmdir", arg(&image), "/docs"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Directory not empty"));

    let out = duoctl(&["stat", arg(&image), "/nope"]);
    assert!(!out.status.success());
}

#[test]
fn test_listing_shows_entries() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.img");

    assert!(duoctl(&["format", arg(&image), "--size", "16K"]).status.success());
    assert!(duoctl(&["mkdir", arg(&image), "/docs"]).status.success());
    assert!(duoctl(&["touch", arg(&image), "/docs/readme"]).status.success());

    let out = duoctl(&["ls", arg(&image), "/docs"]);
    let text = String::from_utf8_lossy(&out.stdout);
    let names: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split_whitespace().last())
        .collect();
    assert_eq!(names, [".", "..", "readme"]);
}

#[test]
fn test_verbose_cat_keeps_stdout_clean() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.img");
    let host = dir.path().join("data.bin");
    std::fs::write(&host, b"only these bytes").unwrap();

    assert!(duoctl(&["format", arg(&image), "--size", "16K"]).status.success());
    assert!(duoctl(&["mkdir", arg(&image), "/d"]).status.success());
    assert!(duoctl(&["-v", "put", arg(&image), arg(&host), "/d/data.bin"]).status.success());

    let out = duoctl(&["-v", "cat", arg(&image), "/d/data.bin"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"only these bytes");
    assert!(String::from_utf8_lossy(&out.stderr).contains("[duoctl] read /d/data.bin"));
}
