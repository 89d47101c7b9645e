//! Filesystem adapter for discovering submitted images.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ocular_qa_core::ImageSource;
use tracing::{debug, warn};

/// Extensions accepted for submission, lowercase.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Expands files and directories given on the command line into the images
/// to gate.
///
/// Explicit files are kept in argument order. Directory contents are sorted,
/// hidden entries (such as `.staging-*` files of a results directory) are
/// skipped, and a path reached twice is gated once.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsImageSource {
    /// Creates a source over `paths`; `recursive` descends into
    /// subdirectories.
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    fn collect(&self) -> Vec<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut images = Vec::new();

        for path in &self.paths {
            let found = if path.is_file() {
                if is_submittable(path) {
                    vec![path.clone()]
                } else {
                    warn!("Unsupported file type: {}", path.display());
                    continue;
                }
            } else if path.is_dir() {
                self.scan(path)
            } else {
                warn!("Path does not exist: {}", path.display());
                continue;
            };

            images.extend(found.into_iter().filter(|p| seen.insert(p.clone())));
        }

        images
    }

    /// Images under `root`, sorted, without following into subdirectories
    /// unless recursive.
    fn scan(&self, root: &Path) -> Vec<PathBuf> {
        let mut pending = vec![root.to_path_buf()];
        let mut found = BTreeSet::new();

        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to read directory {}: {e}", dir.display());
                    continue;
                }
            };

            for path in entries.flatten().map(|e| e.path()) {
                if is_hidden(&path) {
                    continue;
                }
                if path.is_dir() {
                    if self.recursive {
                        pending.push(path);
                    }
                } else if path.is_file() && is_submittable(&path) {
                    found.insert(path);
                }
            }
        }

        found.into_iter().collect()
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = PathBuf> + Send + '_> {
        let images = self.collect();
        debug!("Found {} images", images.len());
        Box::new(images.into_iter())
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect().len())
    }
}

fn is_submittable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(source: &FsImageSource) -> Vec<String> {
        source
            .images()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_is_submittable() {
        assert!(is_submittable(Path::new("eye.jpg")));
        assert!(is_submittable(Path::new("eye.JPEG")));
        assert!(is_submittable(Path::new("eye.png")));
        assert!(!is_submittable(Path::new("eye.cr2")));
        assert!(!is_submittable(Path::new("eye.tiff")));
        assert!(!is_submittable(Path::new("eye")));
    }

    #[test]
    fn test_directory_scan_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt", ".staging-x.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.jpeg"), b"x").unwrap();

        let flat = FsImageSource::new(vec![dir.path().to_path_buf()], false);
        assert_eq!(names(&flat), vec!["a.PNG", "b.jpg"]);

        let deep = FsImageSource::new(vec![dir.path().to_path_buf()], true);
        assert_eq!(names(&deep), vec!["a.PNG", "b.jpg", "c.jpeg"]);
    }

    #[test]
    fn test_explicit_files_keep_order_and_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"x").unwrap();

        let source = FsImageSource::new(
            vec![b.clone(), a.clone(), dir.path().to_path_buf(), b],
            false,
        );
        assert_eq!(names(&source), vec!["b.jpg", "a.jpg"]);
        assert_eq!(source.count_hint(), Some(2));
    }

    #[test]
    fn test_missing_and_unsupported_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"x").unwrap();

        let source = FsImageSource::new(
            vec![PathBuf::from("/nonexistent/eye.jpg"), notes],
            false,
        );
        assert_eq!(source.images().count(), 0);
    }
}
