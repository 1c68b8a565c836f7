// See the Client-Side Throttling section of the Google SRE book,
// https://sre.google/sre-book/handling-overload/

use super::Config;
use crate::base::{
    default_acceptable, AcceptableFn, Breaker, BreakerError, FallbackFn, HandleFn, Notifier,
};
use crate::stat::RollingWindow;
use crate::{logging, utils, Error, Result};
use std::sync::Once;

// decimal places used when formatting ratios for diagnostics
const DISPLAY_PRECISION: i32 = 2;

/// The raw rejection estimate. Negative while the backend is healthy;
/// the clamped-to-zero value is the probability of shedding a request.
fn fuse_ratio(accepted: f64, total: u64, k: f64, protected: u64) -> f64 {
    (total as f64 - protected as f64 - k * accepted) / (total as f64 + 1.0)
}

/// AdaptiveBreaker sheds a fraction of requests proportional to the
/// failure rate observed over its rolling window, rather than tripping
/// between hard open/closed states. Successes are recorded as `1.0`
/// samples and failures as `0.0`, so the window sum is the accepted
/// count and the window count is the total.
///
/// The breaker is shared freely across threads; the only blocking point
/// is the window's mutex.
#[derive(Debug)]
pub struct AdaptiveBreaker {
    config: Config,
    window: RollingWindow,
    stop_once: Once,
}

impl Default for AdaptiveBreaker {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AdaptiveBreaker {
    pub fn new(config: Config) -> Self {
        let config = config.validated();
        let window = RollingWindow::new(config.state_window());
        AdaptiveBreaker {
            config,
            window,
            stop_once: Once::new(),
        }
    }

    /// The window aggregate: (accepted successes, total samples).
    pub fn history(&self) -> Result<(f64, u64)> {
        self.window.sum()
    }

    /// Decides admission for one request given the uniform draw `ratio`.
    fn accept(&self, ratio: f64) -> Result<()> {
        let (accepted, total) = self.history()?;

        let ref_factor = fuse_ratio(
            accepted,
            total,
            self.config.k(),
            self.config.protected(),
        );
        let fuse = ref_factor.max(0.0);

        if fuse <= 0.0 || ratio >= fuse {
            self.config.callback().on_accept(None, ref_factor);
            return Ok(());
        }

        logging::debug!(
            "admission denied, fuse ratio {}",
            utils::round(fuse, DISPLAY_PRECISION)
        );
        let deny: Error = BreakerError::ServiceUnavailable.into();
        self.config.callback().on_accept(Some(&deny), ref_factor);
        Err(deny)
    }

    fn record_success(&self) {
        let op_err = self.window.add(1.0).err();
        self.config.callback().on_success(&op_err);
    }

    fn record_failure(&self, reason: Option<&Error>) {
        let op_err = self.window.add(0.0).err();
        self.config.callback().on_failure(&op_err, reason);
    }

    fn exec_inner(
        &self,
        f: &HandleFn,
        fallback: Option<&FallbackFn>,
        acceptable: &AcceptableFn,
    ) -> Result<()> {
        if let Err(deny) = self.accept(utils::random_ratio()) {
            self.record_failure(Some(&deny));
            return match fallback {
                Some(fallback) => fallback(deny),
                None => Err(deny),
            };
        }

        let err = f().err();
        if acceptable(err.as_ref()) {
            self.record_success();
        } else {
            self.record_failure(err.as_ref());
        }

        match err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Notifier for AdaptiveBreaker {
    fn mark_success(&self) {
        self.record_success();
    }

    fn mark_failure(&self, reason: &Error) {
        self.record_failure(Some(reason));
    }
}

impl Breaker for AdaptiveBreaker {
    fn allow(&self) -> Result<&dyn Notifier> {
        self.accept(utils::random_ratio())?;
        Ok(self)
    }

    fn exec(&self, f: &HandleFn) -> Result<()> {
        self.exec_inner(f, None, &default_acceptable)
    }

    fn exec_with_acceptable(&self, f: &HandleFn, acceptable: &AcceptableFn) -> Result<()> {
        self.exec_inner(f, None, acceptable)
    }

    fn exec_with_fallback(&self, f: &HandleFn, fallback: &FallbackFn) -> Result<()> {
        self.exec_inner(f, Some(fallback), &default_acceptable)
    }

    fn exec_with_fallback_acceptable(
        &self,
        f: &HandleFn,
        fallback: &FallbackFn,
        acceptable: &AcceptableFn,
    ) -> Result<()> {
        self.exec_inner(f, Some(fallback), acceptable)
    }

    fn stop(&self) {
        self.stop_once.call_once(|| self.window.stop());
    }
}
