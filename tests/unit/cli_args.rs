use tempfile::tempdir;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parse_args_resolves_relative_file_against_cwd() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();
    std::fs::write(cwd.join("a.bin"), [0u8, 1, 2]).unwrap();

    let startup = super::parse_args(cwd, args(&["a.bin"])).unwrap();
    assert_eq!(startup.file, cwd.join("a.bin"));
    assert!(startup.backup.is_none());
    assert!(startup.settings.is_none());
}

#[test]
fn parse_args_accepts_backup_and_settings() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();
    std::fs::write(cwd.join("a.bin"), [0u8]).unwrap();

    let startup = super::parse_args(
        cwd,
        args(&["--settings", "s.json", "a.bin", "--backup", "/tmp/a.bak"]),
    )
    .unwrap();
    assert_eq!(startup.file, cwd.join("a.bin"));
    assert_eq!(startup.backup, Some(std::path::PathBuf::from("/tmp/a.bak")));
    assert_eq!(startup.settings, Some(cwd.join("s.json")));
}

#[test]
fn parse_args_errors_for_missing_file() {
    let dir = tempdir().unwrap();
    let err = super::parse_args(dir.path(), args(&["nope.bin"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    let err = super::parse_args(dir.path(), args(&[])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn parse_args_rejects_directories_and_unknown_flags() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();
    std::fs::create_dir_all(cwd.join("sub")).unwrap();
    std::fs::write(cwd.join("a.bin"), [0u8]).unwrap();

    let err = super::parse_args(cwd, args(&["sub"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

    let err = super::parse_args(cwd, args(&["a.bin", "--verbose"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

    let err = super::parse_args(cwd, args(&["a.bin", "--backup"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

    let err = super::parse_args(cwd, args(&["a.bin", "b.bin"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}
