use crate::ast::Pipeline;
use crate::error::ShellError;
use crate::jobs::Job;
use crate::status::ExitStatus;
use crate::supervisor::Supervisor;

/// One anonymous pipe. Each end is taken exactly once, by the stage it is
/// handed to; whatever is left is closed by dropping the pair.
struct ChannelPair {
    reader: Option<os_pipe::PipeReader>,
    writer: Option<os_pipe::PipeWriter>,
}

/// Run every stage of `pipeline` as an external process, stage `i` writing
/// into stage `i + 1`.
///
/// The status is that of the last stage. A foreground pipeline is awaited in
/// full; a background one is handed to the reaper. If any stage cannot be
/// started, the rest are not spawned, the ones already running are still
/// collected, and the failure's status is returned.
pub fn run_pipeline(supervisor: &Supervisor, pipeline: &Pipeline) -> ExitStatus {
    let stages = &pipeline.stages;
    let background = pipeline.is_background();

    let mut channels = match allocate_channels(stages.len().saturating_sub(1)) {
        Ok(channels) => channels,
        Err(e) => {
            e.report();
            return e.status();
        }
    };

    let mut jobs: Vec<Job> = Vec::with_capacity(stages.len());
    let mut failure = None;
    for (i, command) in stages.iter().enumerate() {
        let stdin = if i > 0 {
            channels[i - 1].reader.take()
        } else {
            None
        };
        let stdout = if i + 1 < stages.len() {
            channels[i].writer.take()
        } else {
            None
        };

        match supervisor.spawn_external(command, stdin, stdout) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    // Close the parent's copies; otherwise readers never see end-of-input.
    drop(channels);

    if let Some(e) = &failure {
        e.report();
    }

    if background {
        let last = jobs.len().saturating_sub(1);
        let announce_last = failure.is_none();
        for (i, job) in jobs.into_iter().enumerate() {
            supervisor.detach(job, announce_last && i == last);
        }
        return failure.map_or(ExitStatus::SUCCESS, |e| e.status());
    }

    let mut last_status = ExitStatus::SUCCESS;
    for job in jobs {
        last_status = supervisor.wait(job);
    }
    tracing::debug!(target: "commands", stages = stages.len(), status = %last_status, "pipeline finished");

    failure.map_or(last_status, |e| e.status())
}

fn allocate_channels(count: usize) -> Result<Vec<ChannelPair>, ShellError> {
    (0..count)
        .map(|_| {
            let (reader, writer) = os_pipe::pipe().map_err(ShellError::ChannelFailure)?;
            Ok(ChannelPair {
                reader: Some(reader),
                writer: Some(writer),
            })
        })
        .collect()
}
