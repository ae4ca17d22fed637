use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Self-cleaning session directory for tests.
///
/// Each instance owns a uniquely named directory under the system temp dir,
/// so parallel tests never observe each other's session state. The directory
/// and its contents are removed on drop.
pub struct TempSessionDir {
    path: PathBuf,
}

impl TempSessionDir {
    pub fn new() -> Self {
        let path = env::temp_dir().join(format!("relay_test_{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&path).expect("Failed to create temp session dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempSessionDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dirs_are_unique() {
        let a = TempSessionDir::new();
        let b = TempSessionDir::new();

        assert_ne!(a.path(), b.path());
        assert!(a.path().exists());
        assert!(b.path().exists());
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let path = {
            let dir = TempSessionDir::new();
            fs::write(dir.path().join("session.json"), "{}").unwrap();
            dir.path().to_path_buf()
        };

        assert!(!path.exists());
    }
}
