use super::{Callback, NopCallback};
use crate::stat::DEFAULT_WINDOW_SECS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default sensitivity constant.
pub const DEFAULT_K: f64 = 1.5;

/// Default grace quota of requests that pass regardless of history.
pub const DEFAULT_PROTECTED: u64 = 5;

/// Default look-back of the breaker's window, in seconds.
pub const DEFAULT_STATE_WINDOW_SECS: usize = DEFAULT_WINDOW_SECS;

fn default_callback() -> Arc<dyn Callback> {
    Arc::new(NopCallback)
}

/// Config carries the breaker's knobs. All fields are optional; invalid
/// values are reset to their defaults when the breaker is built.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    // sensitivity multiplier on the success count, 1 <= k < 5;
    // higher k sheds less aggressively
    k: f64,
    protected: u64,
    // seconds of look-back for the rolling window
    state_window: usize,
    #[serde(skip, default = "default_callback")]
    callback: Arc<dyn Callback>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            k: DEFAULT_K,
            protected: DEFAULT_PROTECTED,
            state_window: DEFAULT_STATE_WINDOW_SECS,
            callback: default_callback(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    pub fn with_protected(mut self, protected: u64) -> Self {
        self.protected = protected;
        self
    }

    pub fn with_state_window(mut self, state_window: usize) -> Self {
        self.state_window = state_window;
        self
    }

    pub fn with_callback(mut self, callback: Arc<dyn Callback>) -> Self {
        self.callback = callback;
        self
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn protected(&self) -> u64 {
        self.protected
    }

    pub fn state_window(&self) -> usize {
        self.state_window
    }

    pub fn callback(&self) -> &Arc<dyn Callback> {
        &self.callback
    }

    /// Replaces out-of-range knobs with their defaults.
    pub(crate) fn validated(mut self) -> Self {
        if self.k < 1.0 || self.k >= 5.0 {
            self.k = DEFAULT_K;
        }
        if self.state_window == 0 {
            self.state_window = DEFAULT_STATE_WINDOW_SECS;
        }
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("k", &self.k)
            .field("protected", &self.protected)
            .field("state_window", &self.state_window)
            .finish()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmtted = serde_json::to_string_pretty(self).unwrap();
        write!(f, "{}", fmtted)
    }
}
