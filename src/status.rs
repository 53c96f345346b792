use std::fmt;

/// Exit status of one completed command, 0 = success.
///
/// This is the only state threaded between the steps of a conditional chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitStatus(u8);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    pub const FAILURE: ExitStatus = ExitStatus(1);
    pub const USAGE: ExitStatus = ExitStatus(2);
    pub const NOT_EXECUTABLE: ExitStatus = ExitStatus(126);
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    #[cfg(test)]
    pub fn new(code: u8) -> Self {
        ExitStatus(code)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn success(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convert an OS process status into an [`ExitStatus`].
///
/// A normal exit keeps its declared code; termination by a signal (no code)
/// is reported as 1.
impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitStatus((code & 0xff) as u8),
            None => ExitStatus::FAILURE,
        }
    }
}
