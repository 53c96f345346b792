use crate::ast::{ConditionalChain, Connector, Pipeline};
use crate::builtins::{self, BuiltinAction};
use crate::chain_parser;
use crate::config::Limits;
use crate::error::ShellError;
use crate::pipeline;
use crate::reaper::Reaper;
use crate::status::ExitStatus;
use crate::supervisor::Supervisor;

/// What the read loop should do after evaluating something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue(ExitStatus),
    Exit,
}

/// Interpreter state shared by every line: limits and the process supervisor.
pub struct Shell {
    supervisor: Supervisor,
    limits: Limits,
}

impl Shell {
    /// Install the reaper and build a shell around it.
    pub fn new(limits: Limits) -> Result<Self, ShellError> {
        let reaper = Reaper::install()?;
        Ok(Self {
            supervisor: Supervisor::new(reaper),
            limits,
        })
    }

    /// Run a full input line: every `;` segment, left to right, regardless of
    /// the statuses of earlier segments.
    ///
    /// Returns the status of the last segment, or [`Flow::Exit`] as soon as a
    /// segment runs `exit`.
    pub fn run_line(&self, line: &str) -> Flow {
        if line.len() > self.limits.max_line {
            let e = ShellError::LineTooLong {
                len: line.len(),
                limit: self.limits.max_line,
            };
            e.report();
            return Flow::Continue(e.status());
        }

        let mut status = ExitStatus::SUCCESS;
        for segment in chain_parser::split_segments(line) {
            match self.run_segment(segment) {
                Flow::Exit => return Flow::Exit,
                Flow::Continue(segment_status) => status = segment_status,
            }
        }
        Flow::Continue(status)
    }

    /// Parse and run one segment. Errors end the segment, not the shell.
    fn run_segment(&self, segment: &str) -> Flow {
        match chain_parser::parse_chain(segment, &self.limits) {
            Ok(chain) => self.run_chain(&chain),
            Err(e) => {
                e.report();
                Flow::Continue(e.status())
            }
        }
    }

    /// Evaluate a conditional chain with short-circuiting.
    ///
    /// A skipped entry leaves the carried status untouched; the result is the
    /// status of the last entry that actually ran.
    pub fn run_chain(&self, chain: &ConditionalChain) -> Flow {
        let mut status = ExitStatus::SUCCESS;
        for entry in &chain.entries {
            let should_run = match entry.connector {
                Connector::First => true,
                Connector::And => status.success(),
                Connector::Or => !status.success(),
            };
            if !should_run {
                tracing::trace!(target: "commands", connector = entry.connector.as_str(), %status, "skipped");
                continue;
            }

            match self.run_pipeline(&entry.pipeline) {
                Flow::Exit => return Flow::Exit,
                Flow::Continue(entry_status) => status = entry_status,
            }
        }
        Flow::Continue(status)
    }

    /// A lone builtin runs in-process; everything else becomes processes.
    fn run_pipeline(&self, pipeline: &Pipeline) -> Flow {
        if let [command] = pipeline.stages.as_slice() {
            if builtins::is_builtin(command.program()) {
                return match self.supervisor.run_builtin(command) {
                    BuiltinAction::Continue(status) => Flow::Continue(status),
                    BuiltinAction::Exit => Flow::Exit,
                };
            }
        }

        Flow::Continue(pipeline::run_pipeline(&self.supervisor, pipeline))
    }

    /// Background jobs not yet reaped, for the shutdown log.
    pub fn pending_background(&self) -> usize {
        self.supervisor.pending_background()
    }
}
