use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use walkdir::{DirEntry, WalkDir};

use super::Entry;
use crate::error::{Error, Result};

/// Shell-style exclude/include filter applied to absolute candidate paths.
#[derive(Debug, Default)]
pub(crate) struct PathFilter {
    exclude: Option<GlobMatcher>,
    include: Option<GlobMatcher>,
}

impl PathFilter {
    pub(crate) fn new(exclude: Option<&str>, include: Option<&str>) -> Result<Self> {
        Ok(Self {
            exclude: exclude.map(compile_pattern).transpose()?,
            include: include.map(compile_pattern).transpose()?,
        })
    }

    /// An excluded path is kept anyway when it also matches the include pattern.
    pub(crate) fn accepts(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return true;
        };
        !exclude.is_match(path)
            || self
                .include
                .as_ref()
                .is_some_and(|include| include.is_match(path))
    }
}

// `*` crosses directory separators, like fnmatch.
fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[derive(Debug, Default)]
pub(crate) struct ScanOptions {
    pub(crate) recursive: bool,
    pub(crate) include_directories: bool,
    pub(crate) filter: PathFilter,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Collects every selectable entry below `root`, relative to `root`.
///
/// Hidden entries are skipped at every level, and a hidden directory is not
/// descended into. The first enumeration error aborts the scan.
pub(crate) fn scan(root: &Path, options: &ScanOptions) -> Result<HashSet<Entry>> {
    let meta = fs::metadata(root).map_err(|source| Error::scan(root, source))?;
    if !meta.is_dir() {
        return Err(Error::scan(
            root,
            io::Error::from(io::ErrorKind::NotADirectory),
        ));
    }

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut found = HashSet::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            Error::scan(path, io::Error::from(err))
        })?;

        if is_directory(&entry) && !options.include_directories {
            continue;
        }
        if !options.filter.accepts(entry.path()) {
            log::trace!("filtered out: {}", entry.path().display());
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            found.insert(Entry::new(relative));
        }
    }
    Ok(found)
}
