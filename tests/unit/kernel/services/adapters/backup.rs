use super::*;

#[test]
fn test_hash_uri() {
    let a = DocumentUri::from("file:///tmp/a.bin");
    let b = DocumentUri::from("file:///tmp/a.bin");
    let c = DocumentUri::from("file:///tmp/c.bin");

    assert_eq!(hash_uri(&a), hash_uri(&b));
    assert_ne!(hash_uri(&a), hash_uri(&c));
    assert_eq!(hash_uri(&a).len(), 16);
}

#[test]
fn test_get_backup_dir() {
    let dir = get_backup_dir();
    // 测试环境下应能解析出目录
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.to_string_lossy().contains(BACKUP_DIR));
}

#[test]
fn test_get_log_dir() {
    let dir = get_log_dir();
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.to_string_lossy().contains(LOG_DIR));
}

#[test]
fn test_backup_path_for() {
    let uri = DocumentUri::from("file:///tmp/a.bin");
    let path = backup_path_for(&uri).unwrap();
    assert!(path.to_string_lossy().ends_with(".bak"));
    assert!(path.starts_with(get_backup_dir().unwrap()));
}

#[test]
fn test_find_backup_missing() {
    let uri = DocumentUri::from("file:///tmp/zhex-never-backed-up-7f3a.bin");
    assert!(find_backup(&uri).is_none());
}
