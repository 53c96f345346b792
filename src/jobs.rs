use std::collections::HashMap;
use std::process::Child;

use crate::status::ExitStatus;

/// Whether the interpreter blocks for a job's completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobState {
    /// Owned by the executor that spawned it and awaited synchronously.
    Foreground,
    /// Detached; only the reaper may collect its status.
    Background,
}

/// A spawned process and who is responsible for collecting it.
#[derive(Debug)]
pub struct Job {
    pub pid: u32,
    pub state: JobState,
    /// Command text, for log messages.
    pub command: String,
    pub child: Child,
}

impl Job {
    pub fn new(child: Child, state: JobState, command: String) -> Self {
        Self {
            pid: child.id(),
            state,
            command,
            child,
        }
    }
}

/// The set of background jobs that have not been collected yet.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: HashMap<u32, Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a background job.
    pub fn adopt(&mut self, job: Job) {
        self.jobs.insert(job.pid, job);
    }

    /// Non-blocking poll of every tracked job. Terminated jobs are removed
    /// and returned with their status; running jobs are left alone.
    pub fn reap(&mut self) -> Vec<(u32, ExitStatus)> {
        let mut done = Vec::new();

        for (pid, job) in &mut self.jobs {
            match job.child.try_wait() {
                Ok(Some(status)) => done.push((*pid, ExitStatus::from(status))),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(target: "jobs", pid, error = %e, "error checking job");
                }
            }
        }

        for (pid, _) in &done {
            self.jobs.remove(pid);
        }
        done
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, pid: u32) -> bool {
        self.jobs.contains_key(&pid)
    }
}
