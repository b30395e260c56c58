//! Modification timestamp tracking for the watched file.

use crate::error::{Result, WatchError};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The single file under observation and its last observed timestamp.
///
/// The stored timestamp starts as `None`, which never equals a real
/// timestamp, so the first check always reports a change.
#[derive(Debug, Clone)]
pub struct WatchedFile {
    path: PathBuf,
    last_stamp: Option<SystemTime>,
}

impl WatchedFile {
    /// Start tracking `path`. No filesystem access happens here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_stamp: None,
        }
    }

    /// Watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded modification timestamp.
    pub fn last_stamp(&self) -> Option<SystemTime> {
        self.last_stamp
    }

    /// Read the current modification timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::FileAccess`] if the file is gone or unreadable.
    pub fn current_stamp(&self) -> Result<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|source| WatchError::FileAccess {
                path: self.path.clone(),
                source,
            })
    }

    /// Compare the current timestamp against the stored one.
    ///
    /// Returns the new timestamp when they differ, in either direction.
    /// The stored value is left alone; call [`record`](Self::record) once
    /// the change has been acted on.
    pub fn changed(&self) -> Result<Option<SystemTime>> {
        let current = self.current_stamp()?;
        Ok((self.last_stamp != Some(current)).then_some(current))
    }

    /// Store `stamp` as the last observed timestamp.
    pub fn record(&mut self, stamp: SystemTime) {
        self.last_stamp = Some(stamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn set_mtime(path: &Path, stamp: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(stamp)
            .unwrap();
    }

    #[test]
    fn test_first_check_always_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, "print('hi')").unwrap();

        let file = WatchedFile::new(&path);
        assert!(file.last_stamp().is_none());
        assert!(file.changed().unwrap().is_some());
    }

    #[test]
    fn test_identical_stamp_is_not_a_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, "print('hi')").unwrap();

        let mut file = WatchedFile::new(&path);
        let stamp = file.changed().unwrap().unwrap();
        file.record(stamp);

        // Rewrite the content but keep the timestamp.
        fs::write(&path, "print('bye')").unwrap();
        set_mtime(&path, stamp);
        assert!(file.changed().unwrap().is_none());
    }

    #[test]
    fn test_earlier_stamp_is_a_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, "").unwrap();

        let mut file = WatchedFile::new(&path);
        let stamp = file.changed().unwrap().unwrap();
        file.record(stamp);

        let earlier = stamp - Duration::from_secs(3600);
        set_mtime(&path, earlier);
        assert_eq!(file.changed().unwrap(), Some(earlier));
    }

    #[test]
    fn test_missing_file_is_access_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        fs::write(&path, "").unwrap();

        let file = WatchedFile::new(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(file.changed(), Err(WatchError::FileAccess { .. })));
    }
}
