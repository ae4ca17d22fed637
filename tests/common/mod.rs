use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use relay_cli::session::{FileStore, ImpersonationStack};
use uuid::Uuid;

/// Isolated session directory for one test, removed on drop.
///
/// Every helper builds a fresh store or stack over the same directory, the
/// same way separate CLI invocations would.
pub struct SessionDir {
    path: PathBuf,
}

impl SessionDir {
    pub fn new() -> Self {
        let path = env::temp_dir().join(format!("relay_it_{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&path).expect("failed to create session dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.path)
    }

    pub fn stack(&self) -> ImpersonationStack<FileStore> {
        ImpersonationStack::new(self.store())
    }

    pub fn stack_file(&self) -> PathBuf {
        self.path.join("impersonationStack.json")
    }
}

impl Drop for SessionDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
