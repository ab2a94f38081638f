use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Run completed; new records were written or everything was already registered
/// - `Failure` (1): Nothing was parsed and nothing was registered before, or the directory is missing
/// - `Error` (2): Command failed due to internal error (unwritable output, bad arguments, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Run completed successfully.
    Success,
    /// Run produced nothing usable.
    Failure,
    /// Command failed due to internal error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
