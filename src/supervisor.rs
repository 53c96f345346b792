use std::io::{self, Write};
use std::process::Stdio;

use crate::ast::Command;
use crate::builtins::{self, BuiltinAction};
use crate::error::ShellError;
use crate::jobs::{Job, JobState};
use crate::reaper::Reaper;
use crate::status::ExitStatus;

/// Creates, awaits and detaches the processes behind single commands.
#[derive(Clone)]
pub struct Supervisor {
    reaper: Reaper,
}

impl Supervisor {
    pub fn new(reaper: Reaper) -> Self {
        Self { reaper }
    }

    /// Run `cd`, `pwd` or `exit` in the interpreter's own process.
    pub fn run_builtin(&self, command: &Command) -> BuiltinAction {
        let stdout = io::stdout();
        let stderr = io::stderr();
        builtins::run_builtin(command, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Start an external program with the environment inherited unchanged.
    ///
    /// `stdin`/`stdout` are pipe ends to connect; `None` inherits the
    /// interpreter's own stream. The pipe ends are moved into the spawn call
    /// and closed in this process when it returns. A program that cannot be
    /// located or loaded never runs as a copy of the interpreter; the failure
    /// comes back as [`ShellError::ExecFailure`].
    pub fn spawn_external(
        &self,
        command: &Command,
        stdin: Option<os_pipe::PipeReader>,
        stdout: Option<os_pipe::PipeWriter>,
    ) -> Result<Job, ShellError> {
        let mut process = std::process::Command::new(command.program());
        process.args(command.args());
        if let Some(reader) = stdin {
            process.stdin(Stdio::from(reader));
        }
        if let Some(writer) = stdout {
            process.stdout(Stdio::from(writer));
        }

        let child = process
            .spawn()
            .map_err(|e| ShellError::from_spawn(command.program(), e))?;
        // `process` still holds the parent's copies of the pipe ends.
        drop(process);

        let state = if command.background {
            JobState::Background
        } else {
            JobState::Foreground
        };
        let job = Job::new(child, state, command.argv.join(" "));
        tracing::debug!(target: "commands", pid = job.pid, ?state, command = %job.command, "spawned");
        Ok(job)
    }

    /// Block until a foreground job terminates.
    pub fn wait(&self, mut job: Job) -> ExitStatus {
        debug_assert_eq!(job.state, JobState::Foreground, "background jobs belong to the reaper");
        match job.child.wait() {
            Ok(status) => {
                let status = ExitStatus::from(status);
                tracing::debug!(target: "commands", pid = job.pid, %status, "foreground job finished");
                status
            }
            Err(e) => {
                eprintln!("mysh: wait: {}: {e}", job.command);
                ExitStatus::FAILURE
            }
        }
    }

    /// Hand a job to the reaper without waiting for it. When `announce` is
    /// set, its pid is printed.
    pub fn detach(&self, mut job: Job, announce: bool) {
        if announce {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "[background pid: {}]", job.pid);
            let _ = stdout.flush();
        }
        job.state = JobState::Background;
        self.reaper.adopt(job);
    }

    /// Number of detached jobs still waiting to be reaped.
    pub fn pending_background(&self) -> usize {
        self.reaper.pending()
    }
}
