//! Background job collection.
//!
//! A `SIGCHLD` handler writes one byte into a non-blocking self-pipe. A
//! dedicated reaper thread blocks on the read end and, on every wakeup, polls
//! the registered background jobs with a non-blocking wait. Foreground jobs are
//! never registered, so their statuses are only ever collected by the executor
//! that spawned them.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::error::ShellError;
use crate::jobs::{Job, JobRegistry};

/// Handle to the process-wide reaper. Cheap to clone.
#[derive(Clone)]
pub struct Reaper {
    registry: Arc<Mutex<JobRegistry>>,
    wake: Arc<os_pipe::PipeWriter>,
}

static INSTALLED: Mutex<Option<Reaper>> = Mutex::new(None);

impl Reaper {
    /// Install the termination handler and start the reaper thread.
    ///
    /// Only the first call does any work; later calls return the same reaper.
    pub fn install() -> Result<Reaper, ShellError> {
        let mut slot = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(reaper) = slot.as_ref() {
            return Ok(reaper.clone());
        }

        let (reader, writer) = os_pipe::pipe().map_err(ShellError::ReaperInstall)?;
        let reaper = Reaper {
            registry: Arc::new(Mutex::new(JobRegistry::new())),
            wake: Arc::new(writer),
        };

        #[cfg(unix)]
        notify::install(&reaper.wake).map_err(ShellError::ReaperInstall)?;

        let registry = Arc::clone(&reaper.registry);
        thread::Builder::new()
            .name("mysh-reaper".to_string())
            .spawn(move || run(reader, &registry))
            .map_err(ShellError::ReaperInstall)?;

        tracing::debug!(target: "jobs", "reaper installed");
        *slot = Some(reaper.clone());
        Ok(reaper)
    }

    /// Transfer ownership of a background job to the reaper.
    pub fn adopt(&self, job: Job) {
        tracing::debug!(target: "jobs", pid = job.pid, command = %job.command, "adopted background job");
        self.registry().adopt(job);
        // The job may have exited before it was registered; sweep again.
        self.wake();
    }

    /// Number of background jobs not yet collected.
    pub fn pending(&self) -> usize {
        self.registry().len()
    }

    fn wake(&self) {
        // A full pipe already guarantees another sweep.
        let _ = (&*self.wake).write(&[1]);
    }

    fn registry(&self) -> MutexGuard<'_, JobRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reaper thread body: sweep once per wakeup until the pipe closes.
fn run(mut reader: os_pipe::PipeReader, registry: &Mutex<JobRegistry>) {
    let mut buf = [0u8; 64];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(target: "jobs", error = %e, "reaper wakeup pipe failed");
                break;
            }
        }

        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        for (pid, status) in registry.reap() {
            tracing::debug!(target: "jobs", pid, %status, remaining = registry.len(), "reaped background job");
        }
    }
}

#[cfg(unix)]
mod notify {
    use std::io;
    use std::os::fd::AsRawFd;
    use std::sync::atomic::{AtomicI32, Ordering};

    /// Write end of the wakeup pipe, read by the signal handler.
    static WAKE_FD: AtomicI32 = AtomicI32::new(-1);

    /// Only async-signal-safe work: one `write(2)` to a non-blocking pipe.
    extern "C" fn on_child_exit(_signal: libc::c_int) {
        let fd = WAKE_FD.load(Ordering::Relaxed);
        if fd >= 0 {
            let byte = 1u8;
            // SAFETY: write(2) is async-signal-safe; fd is the live non-blocking
            // wakeup pipe and `byte` outlives the call.
            unsafe {
                libc::write(fd, std::ptr::addr_of!(byte).cast(), 1);
            }
        }
    }

    pub(super) fn install(wake: &os_pipe::PipeWriter) -> io::Result<()> {
        let fd = wake.as_raw_fd();
        set_nonblocking(fd)?;
        WAKE_FD.store(fd, Ordering::Relaxed);

        let handler = on_child_exit as extern "C" fn(libc::c_int);
        // SAFETY: all-zero is a valid `sigaction` (empty mask, no flags).
        let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
        action.sa_sigaction = handler as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART | libc::SA_NOCLDSTOP;
        // SAFETY: `sa_mask` is a valid, exclusively borrowed sigset_t.
        unsafe { libc::sigemptyset(&mut action.sa_mask) };

        // SAFETY: `action` is fully initialized and the handler only touches
        // an atomic and write(2).
        let rc = unsafe { libc::sigaction(libc::SIGCHLD, &action, std::ptr::null_mut()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn set_nonblocking(fd: libc::c_int) -> io::Result<()> {
        // SAFETY: fd belongs to a PipeWriter that is still open.
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: same fd; only the file status flags change.
        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
