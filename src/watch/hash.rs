use std::path::{Path, PathBuf};

use blake3::Hasher;
use tracing::debug;

use crate::errors::{BuilderError, Result};
use crate::fs::FileSystem;

/// Compute the hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| BuilderError::io(path, e))?;
    Ok(blake3::hash(contents.as_bytes()).to_hex().to_string())
}

/// Compute a deterministic hash over the contents of the given files.
///
/// Order of `paths` does not matter; we sort them before hashing to keep the
/// hash stable. Each file's path is mixed in too, so renaming a partial
/// changes the result.
pub fn compute_hash_for_paths<I, P>(fs: &dyn FileSystem, paths: I) -> Result<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut hasher = Hasher::new();

    let mut paths_vec: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    paths_vec.sort();

    for path in paths_vec {
        if fs.is_file(&path) {
            let file_hash = compute_file_hash(fs, &path)?;
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update(file_hash.as_bytes());
        }
    }

    let hash = hasher.finalize().to_hex().to_string();
    debug!(hash = %hash, "computed aggregate source hash");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn file_hash_is_blake3_of_contents() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", "hello world");

        let hash = compute_file_hash(&fs, Path::new("test.txt")).unwrap();
        assert_eq!(
            hash,
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn aggregate_is_order_insensitive_and_tracks_content() {
        let fs = MockFileSystem::new();
        fs.add_file("/src/a.scss", "a{}");
        fs.add_file("/src/b.scss", "b{}");

        let h1 = compute_hash_for_paths(&fs, ["/src/a.scss", "/src/b.scss"]).unwrap();
        let h2 = compute_hash_for_paths(&fs, ["/src/b.scss", "/src/a.scss"]).unwrap();
        assert_eq!(h1, h2);

        fs.touch("/src/a.scss");
        let h3 = compute_hash_for_paths(&fs, ["/src/a.scss", "/src/b.scss"]).unwrap();
        assert_eq!(h1, h3, "touching without edits keeps the hash");

        fs.add_file("/src/a.scss", "a{color:red}");
        let h4 = compute_hash_for_paths(&fs, ["/src/a.scss", "/src/b.scss"]).unwrap();
        assert_ne!(h1, h4);
    }
}
