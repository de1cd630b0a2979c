use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure that aborts a choose-next invocation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("error listing {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading logfile {}: {source}", .path.display())]
    LogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing logfile {}: {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error removing logfile {}: {source}", .path.display())]
    LogRemove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error creating logdir {}: {source}", .path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error resolving {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to resolve home directory for the default logdir")]
    HomeDir,

    #[error("{} leads outside given directory {}", .entry.display(), .root.display())]
    Escape { entry: PathBuf, root: PathBuf },

    #[error("error, no files available in {}", .root.display())]
    NoCandidates { root: PathBuf },

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to launch command {command:?}: {source}")]
    CommandLaunch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command failed")]
    CommandFailed,

    #[error("error writing output: {0}")]
    Output(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn scan(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Scan {
            path: path.into(),
            source,
        }
    }

    pub fn escape(entry: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Error::Escape {
            entry: entry.into(),
            root: root.into(),
        }
    }
}
