//! Source file discovery
//!
//! Turns the command line paths into the concrete list of PHP files to
//! analyze. Directories are walked recursively, arguments that name no
//! existing path are expanded as glob patterns, and the result is filtered
//! through the configured ignore patterns.

use crate::config::Config;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during file discovery
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid ignore pattern: {0}")]
    IgnorePattern(#[from] globset::Error),

    #[error("invalid path pattern `{pattern}`: {source}")]
    PathPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// File discovery configured for one run
pub struct Loader {
    extensions: Vec<String>,
    ignored: GlobSet,
    vendor: bool,
}

impl Loader {
    pub fn new(config: &Config) -> Result<Self, LoadError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.ignore_paths {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            extensions: config.extensions.clone(),
            ignored: builder.build()?,
            vendor: config.vendor,
        })
    }

    /// Resolve files, directories and glob patterns into a sorted, deduplicated
    /// file list.
    pub fn load(&self, paths: &[String]) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = Vec::new();

        for arg in paths {
            let path = Path::new(arg);
            if path.is_dir() {
                self.walk(path, &mut files)?;
            } else if path.is_file() {
                // explicitly named files bypass the extension filter
                if !self.is_ignored(path) {
                    files.push(path.to_path_buf());
                }
            } else {
                for entry in glob::glob(arg)
                    .map_err(|source| LoadError::PathPattern {
                        pattern: arg.clone(),
                        source,
                    })?
                    .flatten()
                {
                    if entry.is_file() && self.matches(&entry) {
                        files.push(entry);
                    } else if entry.is_dir() {
                        self.walk(&entry, &mut files)?;
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
        if self.is_ignored(dir) || self.is_vendor(dir) {
            return Ok(());
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for entry in entries {
            if entry.is_dir() {
                self.walk(&entry, files)?;
            } else if entry.is_file() && self.matches(&entry) {
                files.push(entry);
            }
        }
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false);
        by_extension && !self.is_ignored(path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.is_match(path)
    }

    fn is_vendor(&self, dir: &Path) -> bool {
        !self.vendor
            && dir
                .file_name()
                .map(|name| name == "vendor")
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<?php\n").unwrap();
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_walks_directories_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.php"));
        touch(&dir.path().join("sub/b.php"));
        touch(&dir.path().join("sub/notes.txt"));

        let loader = Loader::new(&Config::new()).unwrap();
        let files = loader
            .load(&[dir.path().to_string_lossy().into_owned()])
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.php", "sub/b.php"]);
    }

    #[test]
    fn test_skips_vendor_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.php"));
        touch(&dir.path().join("vendor/lib.php"));

        let loader = Loader::new(&Config::new()).unwrap();
        let files = loader
            .load(&[dir.path().to_string_lossy().into_owned()])
            .unwrap();
        assert_eq!(names(&files, dir.path()), vec!["a.php"]);

        let mut config = Config::new();
        config.vendor = true;
        let loader = Loader::new(&config).unwrap();
        let files = loader
            .load(&[dir.path().to_string_lossy().into_owned()])
            .unwrap();
        assert_eq!(names(&files, dir.path()), vec!["a.php", "vendor/lib.php"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/a.php"));
        touch(&dir.path().join("tests/b.php"));

        let mut config = Config::new();
        config.ignore_paths = vec!["**/tests/**".to_string()];
        let loader = Loader::new(&config).unwrap();
        let files = loader
            .load(&[dir.path().to_string_lossy().into_owned()])
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/a.php"]);
    }

    #[test]
    fn test_explicit_file_bypasses_extension_filter() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script");
        touch(&script);

        let loader = Loader::new(&Config::new()).unwrap();
        let files = loader
            .load(&[script.to_string_lossy().into_owned()])
            .unwrap();

        assert_eq!(files, vec![script]);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("page.php"));
        touch(&dir.path().join("template.phtml"));

        let mut config = Config::new();
        config.extensions = vec!["php".to_string(), "phtml".to_string()];
        let loader = Loader::new(&config).unwrap();
        let files = loader
            .load(&[dir.path().to_string_lossy().into_owned()])
            .unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["page.php", "template.phtml"]
        );
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let loader = Loader::new(&Config::new()).unwrap();
        assert!(matches!(
            loader.load(&["src/[".to_string()]),
            Err(LoadError::PathPattern { .. })
        ));
    }

    #[test]
    fn test_deduplicates_overlapping_arguments() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.php"));

        let root = dir.path().to_string_lossy().into_owned();
        let loader = Loader::new(&Config::new()).unwrap();
        let files = loader.load(&[root.clone(), root]).unwrap();

        assert_eq!(files.len(), 1);
    }
}
