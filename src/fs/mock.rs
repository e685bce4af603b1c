// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl Tree {
    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

/// In-memory filesystem. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    tree: Arc<Mutex<Tree>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        tree.add_parents(path);
        tree.files.insert(path.to_path_buf(), content.into());
    }

    /// Paths of every file currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| anyhow!("Invalid UTF-8 in {:?}: {}", path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn append(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut tree = self.lock();
        tree.add_parents(path);
        tree.files
            .entry(path.to_path_buf())
            .or_default()
            .extend_from_slice(contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut tree = self.lock();
        tree.add_parents(path);
        tree.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.lock();
        tree.files.contains_key(path) || tree.dirs.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_exist_after_write() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("out/dag/0/0/1.json"), b"{}").unwrap();
        assert!(fs.exists(Path::new("out/dag/0/0")));
        assert!(fs.exists(Path::new("out")));
        assert!(!fs.exists(Path::new("out/dag/0/1")));
    }

    #[test]
    fn append_accumulates() {
        let fs = MockFileSystem::new();
        fs.append(Path::new("m.csv"), b"a\n").unwrap();
        fs.append(Path::new("m.csv"), b"b\n").unwrap();
        assert_eq!(fs.read_to_string(Path::new("m.csv")).unwrap(), "a\nb\n");
    }
}
