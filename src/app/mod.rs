mod logfile;
mod process;
mod scan;
mod select;
mod sort;


use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::paths::{self, default_logfile, path_bytes};

use self::logfile::Recorded;
use self::process::run_command;
use self::scan::{PathFilter, ScanOptions, scan};
use self::select::{Pick, SelectionMode, select_next};

/// A path relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Entry(PathBuf);

impl Entry {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub(crate) fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Maintenance {
    Clear,
    Modify {
        drop_first: bool,
        drop_last: bool,
        dump: bool,
    },
}

/// Everything one invocation needs, resolved from the command line once.
pub(crate) struct Options {
    root: PathBuf,
    logfile: PathBuf,
    scan: ScanOptions,
    explicit: Vec<Entry>,
    rounds: Option<usize>,
    random: bool,
    last: bool,
    read_history: bool,
    write_history: bool,
    prepend: bool,
    command: Option<String>,
    verbosity: u8,
    separator: u8,
    maintenance: Option<Maintenance>,
}

impl Options {
    pub(crate) fn from_cli(cli: Cli) -> Result<Self> {
        Self::from_cli_with_log_dir(cli, None)
    }

    /// `log_dir` overrides the configured log directory; it only matters when
    /// no explicit logfile was given.
    pub(crate) fn from_cli_with_log_dir(cli: Cli, log_dir: Option<&Path>) -> Result<Self> {
        let verbosity = cli.verbosity();
        let recursive = cli.recursive_scan();
        let root = fs::canonicalize(&cli.dir).map_err(|source| Error::scan(&cli.dir, source))?;

        let logfile = match (cli.logfile, log_dir) {
            (Some(logfile), _) => logfile,
            (None, Some(log_dir)) => default_logfile(log_dir, &root)?,
            (None, None) => default_logfile(&paths::log_dir()?, &root)?,
        };

        let explicit = cli
            .files
            .iter()
            .map(|file| resolve_explicit(file, &root))
            .collect::<Result<Vec<_>>>()?;

        let rounds = match usize::try_from(cli.number) {
            Ok(number) => Some(number.max(explicit.len())),
            Err(_) => None,
        };

        let maintenance = if cli.clear {
            Some(Maintenance::Clear)
        } else if cli.clear_first || cli.clear_last || cli.dump {
            Some(Maintenance::Modify {
                drop_first: cli.clear_first,
                drop_last: cli.clear_last,
                dump: cli.dump,
            })
        } else {
            None
        };

        Ok(Self {
            root,
            logfile,
            scan: ScanOptions {
                recursive,
                include_directories: cli.include_directories,
                filter: PathFilter::new(cli.exclude.as_deref(), cli.include.as_deref())?,
            },
            explicit,
            rounds,
            random: cli.random,
            last: cli.last,
            read_history: !cli.no_read,
            write_history: !cli.no_write,
            prepend: cli.prepend,
            command: cli.command,
            verbosity,
            separator: if cli.null { b'\0' } else { b'\n' },
            maintenance,
        })
    }
}

/// Explicit files are taken relative to the working directory and may name
/// files that do not exist, as long as they stay inside `root`.
fn resolve_explicit(file: &Path, root: &Path) -> Result<Entry> {
    let absolute = std::path::absolute(file).map_err(|source| Error::Resolve {
        path: file.to_path_buf(),
        source,
    })?;
    Recorded::Absolute(canonical_parent(&paths::normalize(&absolute))).resolve(root)
}

/// Canonicalizes the deepest existing ancestor of `path` and re-attaches the
/// rest lexically. The last component is never resolved, so a symlinked file
/// keeps its own name.
fn canonical_parent(path: &Path) -> PathBuf {
    for ancestor in path.ancestors().skip(1) {
        let Ok(canonical) = fs::canonicalize(ancestor) else {
            continue;
        };
        if let Ok(rest) = path.strip_prefix(ancestor) {
            return canonical.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn run(cli: Cli) -> Result<()> {
    let options = Options::from_cli(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(&options, &mut out)
}

pub(crate) fn run_with_output<W: Write>(options: &Options, out: &mut W) -> Result<()> {
    log::debug!("directory to choose from: {}", options.root.display());
    log::debug!("logfile: {}", options.logfile.display());

    match options.maintenance {
        Some(Maintenance::Clear) => logfile::clear(&options.logfile),
        Some(Maintenance::Modify {
            drop_first,
            drop_last,
            dump,
        }) => {
            let entries = logfile::modify(&options.logfile, &options.root, drop_first, drop_last)?;
            if dump {
                for entry in &entries {
                    emit(out, entry.as_path(), options.separator)?;
                }
            }
            Ok(())
        }
        None => run_rounds(options, out),
    }
}

fn run_rounds<W: Write>(options: &Options, out: &mut W) -> Result<()> {
    let mut rng = rand::rng();
    let mut round = 0usize;
    loop {
        if options.rounds.is_some_and(|rounds| round >= rounds) {
            return Ok(());
        }
        let picked = choose_round(options, options.explicit.get(round), &mut rng)?;
        if options.verbosity > 0 {
            emit(out, &options.root.join(picked.as_path()), options.separator)?;
        }
        round += 1;
    }
}

/// One selection: read the log, scan, pick, run the command and record the
/// pick. Returns the chosen entry.
fn choose_round<R>(options: &Options, explicit: Option<&Entry>, rng: &mut R) -> Result<Entry>
where
    R: rand::Rng + ?Sized,
{
    let recorded = if options.read_history || options.write_history {
        logfile::read(&options.logfile, &options.root)?
    } else {
        Vec::new()
    };
    let played: &[Entry] = if options.read_history { &recorded } else { &[] };
    for entry in played {
        log::trace!("logged: {entry}");
    }

    let candidates = scan(&options.root, &options.scan)?;

    let mode = match explicit {
        Some(entry) => SelectionMode::Explicit(entry.clone()),
        None if options.last && !played.is_empty() => SelectionMode::RepeatLast,
        None if options.random => SelectionMode::Random,
        None => SelectionMode::Sequential,
    };

    let Pick { entry, wrapped } = select_next(&options.root, &candidates, played, &mode, rng)?;
    log::debug!("selected file: {entry}");

    if let Some(command) = &options.command {
        run_command(command, &options.root.join(entry.as_path()))?;
    }

    if options.write_history {
        record(options, &recorded, &entry, wrapped)?;
    }
    Ok(entry)
}

fn record(options: &Options, recorded: &[Entry], entry: &Entry, wrapped: bool) -> Result<()> {
    if wrapped {
        log::debug!("truncating logfile (was full)");
        return logfile::write(&options.logfile, std::slice::from_ref(entry));
    }
    if recorded.contains(entry) {
        return Ok(());
    }
    if options.prepend {
        logfile::prepend(&options.logfile, entry, recorded)
    } else {
        logfile::append(&options.logfile, entry)
    }
}

fn emit<W: Write>(out: &mut W, path: &Path, separator: u8) -> Result<()> {
    out.write_all(&path_bytes(path))
        .and_then(|()| out.write_all(&[separator]))
        .and_then(|()| out.flush())
        .map_err(Error::Output)
}
