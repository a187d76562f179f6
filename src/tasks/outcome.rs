//! Terminal outcome of one run.
//!
//! `Cancelled` is the cancellation marker: a dedicated variant rather than a sentinel
//! error value, so "cancelled" and "failed" can never be confused.

use crate::error::TaskError;

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The work produced a value.
    Succeeded(T),
    /// The work failed.
    Failed(TaskError),
    /// The run was cancelled before its settlement was published.
    Cancelled,
}

impl<T> Outcome<T> {
    /// True for the cancellation marker.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Succeeded(_) => "succeeded",
            Outcome::Failed(_) => "failed",
            Outcome::Cancelled => "cancelled",
        }
    }

    /// Folds cancellation into the error channel as [`TaskError::Aborted`].
    ///
    /// # Example
    /// ```
    /// use taskcell::{Outcome, TaskError};
    ///
    /// let out: Outcome<u8> = Outcome::Cancelled;
    /// assert_eq!(out.into_result(), Err(TaskError::Aborted));
    /// ```
    pub fn into_result(self) -> Result<T, TaskError> {
        match self {
            Outcome::Succeeded(v) => Ok(v),
            Outcome::Failed(e) => Err(e),
            Outcome::Cancelled => Err(TaskError::Aborted),
        }
    }
}

impl<T> From<Result<T, TaskError>> for Outcome<T> {
    fn from(res: Result<T, TaskError>) -> Self {
        match res {
            Ok(v) => Outcome::Succeeded(v),
            Err(e) => Outcome::Failed(e),
        }
    }
}
