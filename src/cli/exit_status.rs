use std::process::ExitCode;

/// Process exit status of `lingcat`.
///
/// Warnings never change the status; only error-severity issues do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed and reported no errors.
    Success,
    /// Command completed but reported errors (unparsable catalogs,
    /// rejected extraction entries), or `init` found an existing config.
    Failure,
    /// Command could not run: bad config, unreadable extraction, write failure.
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
