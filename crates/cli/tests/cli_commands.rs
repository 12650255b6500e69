use std::path::{Path, PathBuf};

use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_listing() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cifra_subset.lst")
}

fn dummy_binary(dir: &Path) -> PathBuf {
    let bin = dir.join("cifra.elf");
    std::fs::write(&bin, b"\x7fELF").expect("write dummy binary");
    bin
}

/// Running without the binary argument is a usage error.
#[test]
fn missing_argument_fails_with_usage() {
    assert_cmd::cargo::cargo_bin_cmd!("stack-gauge")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

/// With a canned listing every planned query is reported.
#[test]
fn measures_planned_entry_points_from_listing() {
    let dir = tempdir().expect("tempdir");
    let bin = dummy_binary(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("stack-gauge")
        .env("STACK_GAUGE_FAKE_LISTING", fixture_listing())
        .arg(&bin)
        .assert()
        .success()
        .stdout(predicate::str::contains("stack hashtest_sha256 = 352"))
        .stdout(predicate::str::contains("stack hashtest_sha512 = 0"))
        .stdout(predicate::str::contains("stack stack_8w = 32"))
        .stdout(predicate::str::contains("stack stack_64w = 0"))
        .stdout(predicate::str::contains("stack: hashtest_sha256 120 bytes"));
}

/// Duplicate symbols are a warning on stderr, not a failure.
#[test]
fn ambiguous_entry_point_warns() {
    let dir = tempdir().expect("tempdir");
    let bin = dummy_binary(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("stack-gauge")
        .env("STACK_GAUGE_FAKE_LISTING", fixture_listing())
        .env("RUST_LOG", "warn")
        .arg(&bin)
        .assert()
        .success()
        .stderr(predicate::str::contains("more than one function named stack_64w"));
}

#[test]
fn missing_binary_fails() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("stack-gauge")
        .env("STACK_GAUGE_FAKE_LISTING", fixture_listing())
        .arg(dir.path().join("absent.elf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Binary not found"));
}

/// A disassembler that cannot be spawned must fail the run, not yield an empty program.
#[test]
fn unavailable_disassembler_fails() {
    let dir = tempdir().expect("tempdir");
    let bin = dummy_binary(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("stack-gauge")
        .env_remove("STACK_GAUGE_FAKE_LISTING")
        .env("OBJDUMP", dir.path().join("no-such-objdump"))
        .arg(&bin)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to spawn"));
}
