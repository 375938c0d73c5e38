use recordsync_core::RecordId;
use recordsync_core::error::{CreateError, WriteError};
use thiserror::Error;

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    CreateFailed = 3,
    WriteBackFailed = 4,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// CLI-specific errors that map to a dedicated exit code
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid edit '{0}': expected FIELD=VALUE")]
    InvalidEdit(String),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Record was not created: {0}")]
    CreateFailed(#[source] CreateError),

    #[error("Record {record_id} was created but write-back failed: {source}")]
    WriteBackFailed {
        record_id: RecordId,
        #[source]
        source: WriteError,
    },
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidEdit(_) | Self::UnknownFormat(_) => ExitCode::Misuse,
            Self::CreateFailed(_) => ExitCode::CreateFailed,
            Self::WriteBackFailed { .. } => ExitCode::WriteBackFailed,
        }
    }

    /// Suggestions for recovery, shown below the error message
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidEdit(_) => vec![
                "Use --edit subject=TEXT or --edit description=TEXT".to_string(),
            ],
            Self::UnknownFormat(_) => vec!["Valid formats: human, json, minimal".to_string()],
            Self::CreateFailed(_) => vec![
                "Nothing was written back; fix the draft and run again".to_string(),
            ],
            Self::WriteBackFailed { record_id, .. } => vec![format!(
                "Record {record_id} exists in the primary store; write-back is not retried"
            )],
        }
    }
}

/// Exit code for any error surfaced by a command
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .downcast_ref::<CliError>()
        .map_or(ExitCode::GeneralError, CliError::exit_code)
}
