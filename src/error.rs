//! Error types surfaced by tasks and the controller.
//!
//! [`TaskError`] is the only error type that reaches callers, and it reaches them through
//! state and callbacks, never through a returned `Result` on a trigger operation.
//!
//! It provides helper methods (`as_label`, `as_message`) for logging, mirroring the
//! labels carried by [`Event`](crate::Event)s.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by task execution.
///
/// - [`TaskError::Fail`] the creation function or its future reported a failure.
/// - [`TaskError::Panicked`] the creation function or its future panicked.
/// - [`TaskError::Aborted`] cancellation reified as an error (see
///   [`CancelPolicy::AbortError`](crate::CancelPolicy::AbortError)).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task panicked, either synchronously while being created or inside its future.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The operation was cancelled before it settled.
    #[error("The operation was aborted")]
    Aborted,
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use taskcell::TaskError;
    ///
    /// let err = TaskError::fail("BigNumber");
    /// assert_eq!(err.to_string(), "execution failed: BigNumber");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label for use in logs.
    ///
    /// Cancellation keeps the conventional `AbortError` name so callers that fold
    /// cancellation into the error channel can match on it.
    ///
    /// # Example
    /// ```
    /// use taskcell::TaskError;
    ///
    /// assert_eq!(TaskError::Aborted.as_label(), "AbortError");
    /// assert_eq!(TaskError::fail("x").as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Aborted => "AbortError",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { message } => format!("panic: {message}"),
            TaskError::Aborted => "The operation was aborted".to_string(),
        }
    }

    /// True for the error-shaped cancellation marker.
    pub fn is_abort(&self) -> bool {
        matches!(self, TaskError::Aborted)
    }

    /// Converts a panic payload into [`TaskError::Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        TaskError::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_error_keeps_conventional_name_and_message() {
        let err = TaskError::Aborted;
        assert_eq!(err.as_label(), "AbortError");
        assert_eq!(err.to_string(), "The operation was aborted");
        assert!(err.is_abort());
        assert!(!TaskError::fail("boom").is_abort());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let err = TaskError::from_panic(Box::new("static str"));
        assert_eq!(
            err,
            TaskError::Panicked {
                message: "static str".into()
            }
        );

        let err = TaskError::from_panic(Box::new(String::from("owned")));
        assert_eq!(err.as_message(), "panic: owned");

        let err = TaskError::from_panic(Box::new(42_u8));
        assert_eq!(err.as_label(), "task_panicked");
    }
}
