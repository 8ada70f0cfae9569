use std::{
  fs::{OpenOptions, Permissions},
  io::Write,
  os::unix::fs::{OpenOptionsExt, PermissionsExt},
  path::Path,
};

use anyhow::{Context, Result};

/// Write a file to disk with the given file mode
///
/// The mode is applied to existing files as well as newly created ones
pub fn write_file<P: AsRef<Path>>(contents: &[u8], path: P, mode: Option<u32>) -> Result<()> {
  let path = path.as_ref();
  let mode = mode.unwrap_or(0o644);
  let mut file = OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .mode(mode)
    .open(path)
    .with_context(|| format!("Failed to open {} for writing", path.display()))?;
  file
    .set_permissions(Permissions::from_mode(mode))
    .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
  file.write_all(contents)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_writes_with_default_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo");

    write_file(b"hello world", &path, None).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
    // umask can only remove permission bits
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o700, 0o600);
  }

  #[test]
  fn it_truncates_existing_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo");

    write_file(b"a much longer first write", &path, Some(0o600)).unwrap();
    write_file(b"short", &path, Some(0o600)).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
  }

  #[test]
  fn it_restricts_mode_of_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kubeconfig");
    std::fs::write(&path, "old").unwrap();
    std::fs::set_permissions(&path, Permissions::from_mode(0o644)).unwrap();

    write_file(b"new", &path, Some(0o600)).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }
}
