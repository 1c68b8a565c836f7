use crate::{Error, Result};

/// The protected unit of work.
pub type HandleFn = dyn Fn() -> Result<()> + Send + Sync;

/// Produces a substitute outcome from the denial error when admission is
/// refused.
pub type FallbackFn = dyn Fn(Error) -> Result<()> + Send + Sync;

/// Classifies the outcome of the work: `true` means the outcome counts
/// as a success in the window accounting, even if it carries an error.
pub type AcceptableFn = dyn Fn(Option<&Error>) -> bool + Send + Sync;

/// The default acceptability classifier: absence of an error.
pub fn default_acceptable(err: Option<&Error>) -> bool {
    err.is_none()
}

/// The default fallback: surface the denial error as-is.
pub fn default_fallback(err: Error) -> Result<()> {
    Err(err)
}

/// Notifier is the capability to report the outcome of a manually-run
/// request back to the breaker, returned by [`Breaker::allow`].
pub trait Notifier {
    /// The request completed successfully; record an accepted sample.
    fn mark_success(&self);

    /// The request failed for `reason`; record a rejected sample.
    fn mark_failure(&self, reason: &Error);
}

/// Breaker is the admission capability. One instance holds one decision
/// stream; callers compose multiple instances for per-route breakers.
pub trait Breaker: Send + Sync {
    /// Checks admission without running any work. On grant, returns the
    /// notifier through which the caller reports the outcome.
    fn allow(&self) -> Result<&dyn Notifier>;

    /// Executes `f` under breaker protection.
    fn exec(&self, f: &HandleFn) -> Result<()>;

    /// Executes `f`, classifying its outcome with `acceptable`.
    fn exec_with_acceptable(&self, f: &HandleFn, acceptable: &AcceptableFn) -> Result<()>;

    /// Executes `f`, substituting `fallback` on denial.
    fn exec_with_fallback(&self, f: &HandleFn, fallback: &FallbackFn) -> Result<()>;

    /// Executes `f` with both a fallback and a custom classifier.
    fn exec_with_fallback_acceptable(
        &self,
        f: &HandleFn,
        fallback: &FallbackFn,
        acceptable: &AcceptableFn,
    ) -> Result<()>;

    /// Stops the breaker. Idempotent; the stopped state is terminal.
    fn stop(&self);
}
