use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Folder name under the per-user local data directory
pub const APP_DIR_NAME: &str = "WorkTimeTracker";

/// Get the default data directory (e.g. ~/.local/share/WorkTimeTracker)
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .context("Could not determine local data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Atomically write content to a file using temp file + rename.
/// The parent directory is created if missing.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    // Create temp file in the same directory so the rename stays on one filesystem
    let mut temp_file = NamedTempFile::new_in(&dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Read file content, `None` if the file doesn't exist
pub fn read_optional<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir() {
        // Headless environments may have no home directory at all
        if let Ok(dir) = default_data_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.txt");

        let content = "Hello, world!";
        atomic_write(&test_file, content).unwrap();

        let read_content = read_optional(&test_file).unwrap();
        assert_eq!(read_content.as_deref(), Some(content));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.txt");

        atomic_write(&test_file, "first version, longer").unwrap();
        atomic_write(&test_file, "second").unwrap();

        assert_eq!(read_optional(&test_file).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nested").join("deeper").join("test.txt");

        atomic_write(&test_file, "x").unwrap();
        assert!(test_file.exists());
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.txt");

        assert_eq!(read_optional(&test_file).unwrap(), None);
    }

    #[test]
    fn test_ensure_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("data");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Second call is fine
        ensure_dir(&dir).unwrap();
    }
}
