use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use super::Entry;
use crate::error::{Error, Result};
use crate::paths::{normalize, path_bytes, path_from_bytes};

const RECORD_SEPARATOR: u8 = b'\n';

/// A path as it was recorded, before it is tied to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recorded {
    Relative(PathBuf),
    Absolute(PathBuf),
}

impl Recorded {
    pub(crate) fn new(path: PathBuf) -> Self {
        if path.is_absolute() {
            Recorded::Absolute(path)
        } else {
            Recorded::Relative(path)
        }
    }

    fn path(&self) -> &Path {
        match self {
            Recorded::Relative(path) | Recorded::Absolute(path) => path,
        }
    }

    /// Canonical relative form below `root`. Anything that does not stay
    /// inside `root` is an error, never clamped.
    pub(crate) fn resolve(&self, root: &Path) -> Result<Entry> {
        let relative = match self {
            Recorded::Relative(path) => normalize(path),
            Recorded::Absolute(path) => {
                pathdiff::diff_paths(normalize(path), root).unwrap_or_else(|| path.clone())
            }
        };
        let escapes = relative.as_os_str().is_empty()
            || relative.is_absolute()
            || matches!(
                relative.components().next(),
                Some(Component::ParentDir | Component::Prefix(_))
            );
        if escapes {
            return Err(Error::escape(self.path(), root));
        }
        Ok(Entry::new(relative))
    }
}

fn read_error(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |source| Error::LogRead {
        path: path.to_path_buf(),
        source,
    }
}

fn write_error(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |source| Error::LogWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Raw records in file order. A missing logfile has no records.
pub(crate) fn read_records(path: &Path) -> Result<Vec<Recorded>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(read_error(path)(err)),
    };

    Ok(raw
        .split(|&byte| byte == RECORD_SEPARATOR)
        .filter(|line| !line.is_empty())
        .map(|line| Recorded::new(path_from_bytes(line)))
        .collect())
}

pub(crate) fn read(path: &Path, root: &Path) -> Result<Vec<Entry>> {
    read_records(path)?
        .iter()
        .map(|record| record.resolve(root))
        .collect()
}

fn encode_record(buf: &mut Vec<u8>, entry: &Entry) {
    buf.extend_from_slice(&path_bytes(entry.as_path()));
    buf.push(RECORD_SEPARATOR);
}

/// Replaces the logfile with `entries` through a temporary file in the same
/// directory, so readers never see a half-written log.
pub(crate) fn write(path: &Path, entries: &[Entry]) -> Result<()> {
    let mut buf = Vec::new();
    for entry in entries {
        encode_record(&mut buf, entry);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_error(path))?;
    file.write_all(&buf).map_err(write_error(path))?;
    file.persist(path).map_err(|err| write_error(path)(err.error))?;
    Ok(())
}

pub(crate) fn append(path: &Path, entry: &Entry) -> Result<()> {
    let mut buf = Vec::new();
    encode_record(&mut buf, entry);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_error(path))?;
    file.write_all(&buf).map_err(write_error(path))
}

pub(crate) fn prepend(path: &Path, entry: &Entry, existing: &[Entry]) -> Result<()> {
    let mut entries = Vec::with_capacity(existing.len() + 1);
    entries.push(entry.clone());
    entries.extend_from_slice(existing);
    write(path, &entries)
}

pub(crate) fn clear(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::LogRemove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Drops the first and/or last record and rewrites the log. Returns what is
/// left so callers can dump it.
pub(crate) fn modify(
    path: &Path,
    root: &Path,
    drop_first: bool,
    drop_last: bool,
) -> Result<Vec<Entry>> {
    let mut entries = read(path, root)?;
    if drop_first && !entries.is_empty() {
        entries.remove(0);
    }
    if drop_last {
        entries.pop();
    }
    if drop_first || drop_last {
        write(path, &entries)?;
    }
    Ok(entries)
}
