use std::path::PathBuf;

use stack_gauge::resolve_binary_path;
use tempfile::tempdir;

#[test]
fn resolve_binary_path_canonicalizes_existing_files() {
    let tmp = tempdir().expect("tempdir");
    let bin = tmp.path().join("fw.elf");
    std::fs::write(&bin, b"\x7fELF").expect("write bin");

    let resolved = resolve_binary_path(bin.to_str().unwrap()).expect("resolve");
    assert_eq!(resolved, bin.canonicalize().expect("canon bin"));
}

#[test]
fn resolve_binary_path_joins_missing_paths_onto_cwd() {
    let resolved = resolve_binary_path("missing/fw.elf").expect("resolve");
    let cwd = std::env::current_dir().expect("cwd");
    assert_eq!(resolved, cwd.join(PathBuf::from("missing/fw.elf")));
}
