use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use devloop::watch::DirectoryRegistrar;

/// A registrar that records which directories were registered and can be
/// told to reject some of them.
///
/// Clones share state, so a test can keep one handle while the other is
/// boxed into a `ChangeLoop`.
#[derive(Debug, Clone, Default)]
pub struct FakeRegistrar {
    registered: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl FakeRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, dir: impl AsRef<Path>) {
        self.failing.lock().unwrap().insert(dir.as_ref().to_path_buf());
    }

    /// Registered directories, in registration order.
    pub fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().unwrap().clone()
    }
}

impl DirectoryRegistrar for FakeRegistrar {
    fn register(&mut self, dir: &Path) -> Result<()> {
        if self.failing.lock().unwrap().contains(dir) {
            return Err(anyhow!("watch limit reached"));
        }
        self.registered.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
