use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "choose-next",
    version,
    about = "Choose a file from DIR and print its name",
    long_about = "Chooses a file from directory DIR (recursively) and prints its name to \
                  stdout. Afterwards it is appended to a log file. Only files which are not \
                  in the log file are considered for selection. Tries to choose the file \
                  which is next in numeric-aware order in DIR."
)]
pub struct Cli {
    /// Directory to choose from
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Files to select explicitly, one per round
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Execute CMD on every selected file; %s in CMD is substituted with the
    /// filename, otherwise it is appended to CMD
    #[arg(short = 'c', long, value_name = "CMD")]
    pub command: Option<String>,

    /// Remove log file and exit
    #[arg(long)]
    pub clear: bool,

    /// Remove first log file entry and exit
    #[arg(long)]
    pub clear_first: bool,

    /// Remove last log file entry and exit
    #[arg(long)]
    pub clear_last: bool,

    /// Dump log file to stdout and exit
    #[arg(long)]
    pub dump: bool,

    /// Terminate printed names with NUL instead of newline
    #[arg(short = '0', long)]
    pub null: bool,

    /// Don't use log file to filter selection
    #[arg(short = 'i', long)]
    pub no_read: bool,

    /// Path of log file (default: ~/.choose_next/<encoded DIR>)
    #[arg(short = 'L', long, value_name = "FILE")]
    pub logfile: Option<PathBuf>,

    /// Play last played file
    #[arg(short = 'l', long)]
    pub last: bool,

    /// Do not scan DIR recursively
    #[arg(short = 'N', long, overrides_with = "recursive")]
    pub no_recursive: bool,

    #[arg(short = 'R', long, hide = true, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Also select directories
    #[arg(short = 'd', long)]
    pub include_directories: bool,

    /// Number of files to select (-1: infinite)
    #[arg(
        short = 'n',
        long,
        value_name = "NUM",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub number: i64,

    /// Prepend selected filename instead of appending
    #[arg(short = 'p', long)]
    pub prepend: bool,

    /// Don't output anything
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Choose a random file from DIR
    #[arg(short = 'r', long)]
    pub random: bool,

    /// Be verbose (can be used multiple times)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Don't record selected files to log file
    #[arg(short = 'w', long)]
    pub no_write: bool,

    /// Exclude files matching PATTERN
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Option<String>,

    /// Don't exclude files matching PATTERN
    #[arg(long, value_name = "PATTERN")]
    pub include: Option<String>,
}

impl Cli {
    /// 0 is silent, 1 prints the selection, higher levels add diagnostics.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Recursive unless `-N` was given after any `-R`.
    pub fn recursive_scan(&self) -> bool {
        self.recursive || !self.no_recursive
    }
}
