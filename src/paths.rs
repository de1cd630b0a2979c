use std::borrow::Cow;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

pub const LOGDIR_ENV: &str = "CHOOSE_NEXT_LOGDIR";

pub fn log_dir() -> Result<PathBuf> {
    log_dir_from_env(env::var_os(LOGDIR_ENV))
}

pub(crate) fn log_dir_from_env(env_value: Option<OsString>) -> Result<PathBuf> {
    match env_value {
        Some(value) if !value.is_empty() => expand_home(PathBuf::from(value)),
        _ => Ok(home_dir()?.join(".choose_next")),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(Error::HomeDir)
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path),
    }
}

/// Logfile for `root` inside `log_dir`, creating the directory and renaming
/// a logfile that still carries the old separator-substituted name.
pub fn default_logfile(log_dir: &Path, root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).map_err(|source| Error::LogDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let logfile = log_dir.join(encoded_logfile_name(root));
    let legacy = log_dir.join(legacy_logfile_name(root));
    if legacy != logfile && !logfile.exists() && legacy.is_file() {
        log::debug!(
            "migrating logfile {} -> {}",
            legacy.display(),
            logfile.display()
        );
        fs::rename(&legacy, &logfile).map_err(|source| Error::LogWrite {
            path: logfile.clone(),
            source,
        })?;
    }
    Ok(logfile)
}

pub(crate) fn encoded_logfile_name(root: &Path) -> OsString {
    OsString::from(urlencoding::encode_binary(&path_bytes(root)).into_owned())
}

// Collides for roots like `/a/b_c` and `/a_b/c`; only kept to find old logfiles.
pub(crate) fn legacy_logfile_name(root: &Path) -> OsString {
    let bytes = path_bytes(root)
        .iter()
        .map(|&b| if b == b'/' { b'_' } else { b })
        .collect::<Vec<_>>();
    path_from_bytes(&bytes).into_os_string()
}

/// Removes `.` components and folds `..` into its parent without touching the
/// filesystem. Leading `..` components of a relative path are kept.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.into_iter().collect()
}

#[cfg(unix)]
pub(crate) fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().replace('\\', "/").into_bytes())
}

#[cfg(unix)]
pub(crate) fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub(crate) fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
