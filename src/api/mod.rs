use crate::base::{AcceptableFn, Breaker, FallbackFn, HandleFn};
use crate::circuitbreaker::AdaptiveBreaker;
use crate::retry::{NoRetry, Retry, RetryableFn};
use crate::Result;
use std::any::Any;
use std::sync::{Arc, Once};

/// CircuitBreaker is the public execution surface: one breaker combined
/// with one retry collaborator. Every operation routes the work through
/// the retry, and each retry attempt consults and samples the breaker's
/// window the same way a fresh request would.
pub struct CircuitBreaker {
    breaker: Arc<dyn Breaker>,
    retry: Arc<dyn Retry>,
    stop_once: Once,
}

/// Builder for [`CircuitBreaker`]. Collaborators that are not supplied
/// are filled with the defaults: an [`AdaptiveBreaker`] with default
/// config and the single-invocation [`NoRetry`].
#[derive(Default)]
pub struct CircuitBreakerBuilder {
    breaker: Option<Arc<dyn Breaker>>,
    retry: Option<Arc<dyn Retry>>,
}

impl CircuitBreakerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breaker(mut self, breaker: Arc<dyn Breaker>) -> Self {
        self.breaker = Some(breaker);
        self
    }

    pub fn with_retry(mut self, retry: Arc<dyn Retry>) -> Self {
        self.retry = Some(retry);
        self
    }

    /// `build()` consumes the builder.
    pub fn build(self) -> CircuitBreaker {
        CircuitBreaker {
            breaker: self
                .breaker
                .unwrap_or_else(|| Arc::new(AdaptiveBreaker::default())),
            retry: self.retry.unwrap_or_else(|| Arc::new(NoRetry::new())),
            stop_once: Once::new(),
        }
    }
}

impl CircuitBreaker {
    fn through_retry(&self, attempt: &RetryableFn<'_>) -> Result<()> {
        match self.retry.try_on_conflict(attempt).into_try_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Executes `f` under breaker protection.
    pub fn exec(&self, f: &HandleFn) -> Result<()> {
        self.through_retry(&|| {
            self.breaker.exec(f)?;
            Ok(Box::new(()) as Box<dyn Any + Send + Sync>)
        })
    }

    /// Executes `f`, classifying its outcome with `acceptable`.
    pub fn exec_with_acceptable(&self, f: &HandleFn, acceptable: &AcceptableFn) -> Result<()> {
        self.through_retry(&|| {
            self.breaker.exec_with_acceptable(f, acceptable)?;
            Ok(Box::new(()) as Box<dyn Any + Send + Sync>)
        })
    }

    /// Executes `f`, substituting `fallback` when admission is denied.
    pub fn exec_with_fallback(&self, f: &HandleFn, fallback: &FallbackFn) -> Result<()> {
        self.through_retry(&|| {
            self.breaker.exec_with_fallback(f, fallback)?;
            Ok(Box::new(()) as Box<dyn Any + Send + Sync>)
        })
    }

    /// Executes `f` with both a fallback and a custom classifier.
    pub fn exec_with_fallback_acceptable(
        &self,
        f: &HandleFn,
        fallback: &FallbackFn,
        acceptable: &AcceptableFn,
    ) -> Result<()> {
        self.through_retry(&|| {
            self.breaker
                .exec_with_fallback_acceptable(f, fallback, acceptable)?;
            Ok(Box::new(()) as Box<dyn Any + Send + Sync>)
        })
    }

    /// Stops the underlying breaker. Idempotent.
    pub fn stop(&self) {
        self.stop_once.call_once(|| self.breaker.stop());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn default_collaborators() {
        let breaker = CircuitBreakerBuilder::new().build();
        breaker.exec(&|| Ok(())).unwrap();
        breaker.stop();
        breaker.stop();
        assert!(breaker.exec(&|| Ok(())).is_err());
    }

    #[test]
    fn work_errors_pass_through() {
        let breaker = CircuitBreakerBuilder::new().build();
        let err = breaker.exec(&|| Err(anyhow!("boom"))).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn injected_breaker_is_used() {
        let inner = Arc::new(AdaptiveBreaker::default());
        let breaker = CircuitBreakerBuilder::new()
            .with_breaker(inner.clone())
            .build();
        breaker.exec(&|| Ok(())).unwrap();
        assert_eq!(inner.history().unwrap(), (1.0, 1));
    }
}
