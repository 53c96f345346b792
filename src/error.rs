use std::path::PathBuf;

use crate::status::ExitStatus;

/// Every failure the interpreter can hit while evaluating a line.
///
/// Errors never escape the segment that produced them: the caller prints the
/// diagnostic (unless it is [`ShellError::EmptyInput`]) and carries on with
/// [`ShellError::status`] as the segment's status.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    /// The segment contained no tokens.
    #[error("empty command")]
    EmptyInput,

    /// `cd` target does not exist or is not accessible.
    #[error("cd: {0}: {1}")]
    NoSuchPath(PathBuf, std::io::Error),

    /// `cd` with no argument and no `HOME` to fall back on.
    #[error("cd: HOME not set")]
    HomeNotSet,

    /// The program could not be located or loaded.
    #[error("exec: {program}: {source}")]
    ExecFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process-creation primitive itself failed.
    #[error("spawn: {program}: {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A pipe for a pipeline could not be created.
    #[error("pipe: {0}")]
    ChannelFailure(#[source] std::io::Error),

    /// Malformed operator layout, e.g. `&& echo` or `echo |`.
    #[error("syntax error near unexpected token `{0}'")]
    Syntax(String),

    #[error("line too long: {len} bytes (limit {limit})")]
    LineTooLong { len: usize, limit: usize },

    #[error("too many arguments: {count} (limit {limit})")]
    TooManyArguments { count: usize, limit: usize },

    #[error("too many pipeline stages: {count} (limit {limit})")]
    TooManyStages { count: usize, limit: usize },

    /// The background reaper could not be installed.
    #[error("reaper: {0}")]
    ReaperInstall(#[source] std::io::Error),
}

impl ShellError {
    /// Classify a failed `spawn()` into exec vs. process-creation failures.
    pub fn from_spawn(program: &str, source: std::io::Error) -> Self {
        if is_exec_error(&source) {
            ShellError::ExecFailure {
                program: program.to_string(),
                source,
            }
        } else {
            ShellError::SpawnFailure {
                program: program.to_string(),
                source,
            }
        }
    }

    /// The status a segment reports when it fails with this error.
    pub fn status(&self) -> ExitStatus {
        match self {
            ShellError::EmptyInput => ExitStatus::SUCCESS,
            ShellError::ExecFailure { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitStatus::NOT_FOUND
            }
            ShellError::ExecFailure { .. } => ExitStatus::NOT_EXECUTABLE,
            ShellError::Syntax(_)
            | ShellError::LineTooLong { .. }
            | ShellError::TooManyArguments { .. }
            | ShellError::TooManyStages { .. } => ExitStatus::USAGE,
            ShellError::NoSuchPath(..)
            | ShellError::HomeNotSet
            | ShellError::SpawnFailure { .. }
            | ShellError::ChannelFailure(_)
            | ShellError::ReaperInstall(_) => ExitStatus::FAILURE,
        }
    }

    /// Print the diagnostic for this error, unless it is meant to be silent.
    pub fn report(&self) {
        if !matches!(self, ShellError::EmptyInput) {
            eprintln!("mysh: {self}");
        }
    }
}

/// Errors that mean the program was found wanting, not the process machinery.
fn is_exec_error(source: &std::io::Error) -> bool {
    match source.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => true,
        #[cfg(unix)]
        _ if source.raw_os_error() == Some(libc::ENOEXEC) => true,
        _ => false,
    }
}
