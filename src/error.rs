//! Error types for task validation and task operations.
//!
//! Every variant here is recoverable at the command boundary: the caller
//! reports it and re-prompts or leaves the field untouched. Storage failures
//! (unreadable or corrupt task file) are not part of this enum; they travel as
//! `anyhow::Error` and abort the current command.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid format '{input}'. Use: {expected} (e.g. {example})")]
    InvalidFormat {
        input: String,
        expected: &'static str,
        example: &'static str,
    },

    #[error("Date '{input}' must be in the future")]
    NotInFuture { input: String },

    #[error("Invalid priority '{input}'. Choose from: low, medium, high")]
    InvalidPriority { input: String },

    #[error("End time '{end}' must be after start time '{start}'")]
    InvalidInterval { start: String, end: String },

    #[error("Range end '{to}' must not be before range start '{from}'")]
    InvalidRange { from: String, to: String },

    #[error("Task #{id} not found")]
    NotFound { id: u32 },

    #[error("Task #{id} is already done")]
    AlreadyDone { id: u32 },

    #[error("{field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("No task id left after #{max}")]
    IdsExhausted { max: u32 },
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Failure of a whole command: either a recoverable task error or a storage
/// problem that aborts the command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CommandError {
    pub fn as_task_error(&self) -> Option<&TaskError> {
        match self {
            CommandError::Task(e) => Some(e),
            CommandError::Storage(_) => None,
        }
    }
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = TaskError::InvalidPriority {
            input: "urgent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid priority 'urgent'. Choose from: low, medium, high"
        );

        let err = TaskError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Task #42 not found");

        let err = TaskError::EmptyInput { field: "Title" };
        assert_eq!(err.to_string(), "Title cannot be empty");
    }

    #[test]
    fn test_command_error_keeps_task_error() {
        let err: CommandError = TaskError::AlreadyDone { id: 2 }.into();
        assert_eq!(err.to_string(), "Task #2 is already done");
        assert_eq!(
            err.as_task_error(),
            Some(&TaskError::AlreadyDone { id: 2 })
        );

        let err: CommandError = anyhow::anyhow!("disk on fire").into();
        assert!(err.as_task_error().is_none());
        assert_eq!(err.to_string(), "disk on fire");
    }
}
