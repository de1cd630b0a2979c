use std::path::Path;
use std::process::{Command as ProcessCommand, Stdio};

use crate::error::{Error, Result};

const PATH_TOKEN: &str = "%s";

#[cfg(unix)]
pub(crate) fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

#[cfg(not(unix))]
pub(crate) fn shell_quote(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Substitutes the quoted path for `%s`, or appends it when the template has
/// no token.
pub(crate) fn expand_command(template: &str, file: &Path) -> String {
    let quoted = shell_quote(&file.to_string_lossy());
    if template.contains(PATH_TOKEN) {
        template.replace(PATH_TOKEN, &quoted)
    } else {
        format!("{template} {quoted}")
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> ProcessCommand {
    let mut cmd = ProcessCommand::new("/bin/sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> ProcessCommand {
    let mut cmd = ProcessCommand::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Runs the per-selection command for `file` through the shell and waits for
/// it. A non-zero exit is [`Error::CommandFailed`].
pub(crate) fn run_command(template: &str, file: &Path) -> Result<()> {
    let command = expand_command(template, file);
    log::debug!("executing command: {command}");

    let status = shell_command(&command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| Error::CommandLaunch {
            command: command.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        log::debug!("command exited with status: {status}");
        Err(Error::CommandFailed)
    }
}
