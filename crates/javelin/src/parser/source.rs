//! Discovery of the source files of a compilation

use crate::error::CompileError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the files collected from source directories
pub const SOURCE_EXTENSION: &str = "java";

/// Files found under a set of roots, plus the paths that could not be read
#[derive(Debug, Default)]
pub struct DiscoveredSources {
    /// Sorted, without duplicates
    pub files: Vec<PathBuf>,
    pub errors: Vec<CompileError>,
}

/// Finds source files under directories, or takes files as given
#[derive(Debug, Clone, Default)]
pub struct SourceProvider {
    roots: Vec<PathBuf>,
}

impl SourceProvider {
    #[must_use]
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Walk every root.
    ///
    /// A root that is a file is taken whatever its extension; inside
    /// directories only `.java` files are collected. The result is sorted so
    /// the order of the roots and of the file system does not matter.
    #[must_use]
    pub fn discover(&self) -> DiscoveredSources {
        let mut sources = DiscoveredSources::default();
        for root in &self.roots {
            for entry in WalkDir::new(root).follow_links(true) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        if entry.depth() == 0 || is_source_file(entry.path()) {
                            sources.files.push(entry.into_path());
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        let path = error.path().unwrap_or(root.as_path()).to_path_buf();
                        log::warn!("cannot read {}: {error}", path.display());
                        sources.errors.push(CompileError::Io {
                            path,
                            source: error.into(),
                        });
                    }
                }
            }
        }
        sources.files.sort();
        sources.files.dedup();
        sources
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directories_are_walked_in_sorted_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("b/c")).expect("mkdir");
        fs::write(dir.path().join("b/c/Z.java"), "class Z {}").expect("write");
        fs::write(dir.path().join("b/A.java"), "class A {}").expect("write");
        fs::write(dir.path().join("b/notes.txt"), "not java").expect("write");
        fs::write(dir.path().join("M.java"), "class M {}").expect("write");

        let sources = SourceProvider::new([dir.path()]).discover();
        assert!(sources.errors.is_empty());
        let names: Vec<_> = sources
            .files
            .iter()
            .map(|path| path.strip_prefix(dir.path()).expect("under root").to_path_buf())
            .collect();
        assert_eq!(
            names,
            [PathBuf::from("M.java"), PathBuf::from("b/A.java"), PathBuf::from("b/c/Z.java")]
        );
    }

    #[test]
    fn explicit_files_are_kept_once() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("Script.jav");
        fs::write(&file, "class S {}").expect("write");

        let sources = SourceProvider::new([file.clone(), file.clone()]).discover();
        assert_eq!(sources.files, [file]);
    }

    #[test]
    fn missing_roots_are_reported() {
        let sources = SourceProvider::new(["does/not/exist"]).discover();
        assert!(sources.files.is_empty());
        assert!(matches!(
            sources.errors.as_slice(),
            [CompileError::Io { path, .. }] if path == Path::new("does/not/exist")
        ));
    }
}
