// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        content: Vec<u8>,
        modified: SystemTime,
    },
    Dir {
        children: Vec<String>, // List of child names
        modified: SystemTime,
        readable: bool,
    },
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock in seconds; every mutation advances it by one so mtimes
    /// are strictly ordered.
    ticks: u64,
}

/// In-memory filesystem with a logical clock for modification times.
///
/// Clones share the same underlying state, so a test can hand one clone to
/// the builder and keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

const EPOCH_OFFSET_SECS: u64 = 1_700_000_000;

impl MockState {
    fn tick(&mut self) -> SystemTime {
        self.ticks += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(EPOCH_OFFSET_SECS + self.ticks)
    }

    fn ensure_dir_entry(&mut self, path: &Path) {
        if self.entries.contains_key(path) {
            return;
        }
        let now = self.tick();
        self.entries.insert(
            path.to_path_buf(),
            MockEntry::Dir {
                children: Vec::new(),
                modified: now,
                readable: true,
            },
        );
        if let Some(parent) = normalized_parent(path) {
            if parent != path {
                // Avoid infinite loop at root
                self.ensure_dir_entry(&parent);
                self.link_child(&parent, path);
            }
        }
    }

    fn link_child(&mut self, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir { children, .. }) = self.entries.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn put_file(&mut self, path: &Path, content: Vec<u8>) {
        let now = self.tick();
        self.entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                content,
                modified: now,
            },
        );
        if let Some(parent) = normalized_parent(path) {
            self.link_child(&parent, path);
        }
    }
}

fn normalized_parent(path: &Path) -> Option<PathBuf> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(PathBuf::from(".")),
        Some(parent) => Some(parent.to_path_buf()),
        None => None,
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {:?}", path))
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        {
            // Ensure roots exist
            let mut state = fs.lock();
            state.ensure_dir_entry(Path::new("."));
            state.ensure_dir_entry(Path::new("/"));
        }
        fs
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Add (or replace) a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = normalized_parent(path) {
            state.ensure_dir_entry(&parent);
        }
        state.put_file(path, content.into());
    }

    /// Add a directory and any missing ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.lock().ensure_dir_entry(path.as_ref());
    }

    /// Bump the modification time of an existing entry to "now".
    pub fn touch(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        let now = state.tick();
        match state.entries.get_mut(path) {
            Some(MockEntry::File { modified, .. }) | Some(MockEntry::Dir { modified, .. }) => {
                *modified = now;
            }
            None => panic!("touch on missing mock entry {:?}", path),
        }
    }

    /// Remove an entry (and, for directories, everything below it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(path));
        if let Some(parent) = normalized_parent(path) {
            if let Some(MockEntry::Dir { children, .. }) = state.entries.get_mut(&parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    children.retain(|c| c != name);
                }
            }
        }
    }

    /// Make `read_dir` on this directory fail with `PermissionDenied`.
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(MockEntry::Dir { readable, .. }) = state.entries.get_mut(path) {
            *readable = false;
        }
    }

    /// Raw bytes of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Some(MockEntry::Dir { .. }) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {:?}", path),
            )),
            None => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        let parent = normalized_parent(path).ok_or_else(|| not_found(path))?;
        if !matches!(state.entries.get(&parent), Some(MockEntry::Dir { .. })) {
            return Err(not_found(&parent));
        }
        if matches!(state.entries.get(path), Some(MockEntry::Dir { .. })) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {:?}", path),
            ));
        }
        state.put_file(path, contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir { .. }))
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { modified, .. }) | Some(MockEntry::Dir { modified, .. }) => {
                Ok(*modified)
            }
            None => Err(not_found(path)),
        }
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if state.entries.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {:?}", path),
            ));
        }
        let parent = normalized_parent(path).ok_or_else(|| not_found(path))?;
        if !matches!(state.entries.get(&parent), Some(MockEntry::Dir { .. })) {
            return Err(not_found(&parent));
        }
        state.ensure_dir_entry(path);
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir {
                readable: false, ..
            }) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            )),
            Some(MockEntry::Dir { children, .. }) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File { .. }) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {:?}", path),
            )),
            None => Err(not_found(path)),
        }
    }
}
