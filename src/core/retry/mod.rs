use crate::{Error, Result};
use std::any::Any;

/// One retryable attempt. On success it may carry an arbitrary payload
/// for the caller.
pub type RetryableFn<'a> = dyn Fn() -> Result<Box<dyn Any + Send + Sync>> + Send + Sync + 'a;

/// Retry is the collaborator that drives a closure once (the default)
/// or several times under a user-supplied policy. Policy-rich
/// implementations (backoff, attempt caps, per-error predicates) are
/// injected by the caller; the contract is only "execute this closure,
/// possibly more than once".
pub trait Retry: Send + Sync {
    fn try_on_conflict(&self, f: &RetryableFn<'_>) -> RetryResult;
}

/// RetryResult is the value object describing what a retry run produced:
/// the payload of the final attempt, the error that ended the run, the
/// per-attempt errors a policy chose to record, and the attempt count.
#[derive(Debug)]
pub struct RetryResult {
    data: Option<Box<dyn Any + Send + Sync>>,
    try_error: Option<Error>,
    attempt_errors: Vec<Error>,
    count: u64,
}

impl RetryResult {
    pub fn new(
        data: Option<Box<dyn Any + Send + Sync>>,
        try_error: Option<Error>,
        attempt_errors: Vec<Error>,
        count: u64,
    ) -> Self {
        RetryResult {
            data,
            try_error,
            attempt_errors,
            count,
        }
    }

    pub fn data(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.data.as_deref()
    }

    pub fn try_error(&self) -> Option<&Error> {
        self.try_error.as_ref()
    }

    /// Consumes the result, surfacing the run's outcome.
    pub fn into_try_error(self) -> Option<Error> {
        self.try_error
    }

    pub fn is_success(&self) -> bool {
        self.try_error.is_none()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn exec_errors(&self) -> &[Error] {
        &self.attempt_errors
    }

    pub fn first_exec_error(&self) -> Option<&Error> {
        self.attempt_errors.first()
    }

    pub fn last_exec_error(&self) -> Option<&Error> {
        self.attempt_errors.last()
    }

    pub fn exec_error_by_index(&self, idx: usize) -> Option<&Error> {
        self.attempt_errors.get(idx)
    }
}

/// The default retry: invokes the closure exactly once and wraps its
/// outcome.
#[derive(Debug, Default)]
pub struct NoRetry;

impl NoRetry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Retry for NoRetry {
    fn try_on_conflict(&self, f: &RetryableFn<'_>) -> RetryResult {
        match f() {
            Ok(data) => RetryResult::new(Some(data), None, Vec::new(), 1),
            Err(err) => RetryResult::new(None, Some(err), Vec::new(), 1),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn single_invocation_success() {
        let retry = NoRetry::new();
        let result = retry.try_on_conflict(&|| Ok(Box::new(42u32) as Box<dyn Any + Send + Sync>));

        assert!(result.is_success());
        assert_eq!(result.count(), 1);
        assert!(result.try_error().is_none());
        assert!(result.exec_errors().is_empty());
        assert_eq!(
            result.data().and_then(|d| d.downcast_ref::<u32>()),
            Some(&42)
        );
    }

    #[test]
    fn single_invocation_failure() {
        let retry = NoRetry::new();
        let result = retry.try_on_conflict(&|| Err(anyhow!("conflict")));

        assert!(!result.is_success());
        assert_eq!(result.count(), 1);
        assert_eq!(result.try_error().unwrap().to_string(), "conflict");
        assert!(result.first_exec_error().is_none());
        assert!(result.last_exec_error().is_none());
        assert!(result.exec_error_by_index(0).is_none());
        assert_eq!(result.into_try_error().unwrap().to_string(), "conflict");
    }

    #[test]
    fn attempt_errors_are_indexable() {
        let result = RetryResult::new(
            None,
            Some(anyhow!("final")),
            vec![anyhow!("first"), anyhow!("second")],
            2,
        );
        assert_eq!(result.first_exec_error().unwrap().to_string(), "first");
        assert_eq!(result.last_exec_error().unwrap().to_string(), "second");
        assert_eq!(
            result.exec_error_by_index(1).unwrap().to_string(),
            "second"
        );
        assert!(result.exec_error_by_index(2).is_none());
        assert_eq!(result.count(), 2);
    }
}
