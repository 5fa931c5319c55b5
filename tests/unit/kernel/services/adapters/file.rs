use super::*;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_size_and_truncated_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    std::fs::write(&path, [0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();

    let source = LocalByteSource::new();
    let uri = DocumentUri::from_path(&path);

    assert_eq!(source.size(&uri).unwrap(), 8);
    assert_eq!(source.read(&uri, Some(3)).unwrap(), vec![0, 1, 2]);
    assert_eq!(source.read(&uri, None).unwrap().len(), 8);
}

#[test]
fn test_bare_path_uri() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.bin");
    std::fs::write(&path, b"abc").unwrap();

    let source = LocalByteSource::new();
    let uri = DocumentUri::new(path.to_string_lossy().to_string());
    assert_eq!(source.read(&uri, Some(100)).unwrap(), b"abc".to_vec());
}

#[test]
fn test_missing_file() {
    let source = LocalByteSource::new();
    let uri = DocumentUri::from_path(Path::new("/definitely/not/here.bin"));
    assert!(matches!(source.size(&uri), Err(ByteSourceError::NotFound(_))));
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = tempdir().unwrap();
    let source = LocalByteSource::new();
    let uri = DocumentUri::from_path(dir.path());
    assert!(matches!(source.read(&uri, None), Err(ByteSourceError::NotAFile(_))));
}

#[test]
fn test_foreign_scheme_is_rejected() {
    let source = LocalByteSource::new();
    let uri = DocumentUri::from("untitled://1");
    assert!(matches!(
        source.size(&uri),
        Err(ByteSourceError::UnsupportedScheme(scheme)) if scheme == "untitled"
    ));
}
