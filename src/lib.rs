//! # fuseguard
//!
//! An adaptive client-side circuit breaker in the Google SRE
//! "client-side throttling" family. Instead of flipping between hard
//! open/closed states, the breaker sheds a fraction of requests
//! proportional to the failure rate observed over a rolling time
//! window, so a recovering dependency keeps receiving probe traffic
//! while an unhealthy one is relieved of load.
//!
//! There are three layers:
//! 1. a rolling time window (`core::stat`) that aggregates
//!    success/failure samples over the last W seconds in fixed memory,
//! 2. a probabilistic admission decision (`core::circuitbreaker`)
//!    computed from the window aggregate,
//! 3. an execute-with-protection surface (`api`) that wires
//!    caller-supplied work, fallbacks, acceptability classification and
//!    an optional retry collaborator together.
//!
//! ## Usage
//!
//! ```no_run
//! use fuseguard::api::CircuitBreakerBuilder;
//!
//! let breaker = CircuitBreakerBuilder::new().build();
//! let result = breaker.exec(&|| {
//!     // call the protected downstream here
//!     Ok(())
//! });
//! breaker.stop();
//! # let _ = result;
//! ```
//!
//! When the breaker denies a request it returns
//! [`BreakerError::ServiceUnavailable`]; once stopped, every operation
//! fails with [`BreakerError::WindowStopped`]. Errors produced by the
//! caller's own work pass through unchanged.

/// Public execution surface combining a breaker with a retry collaborator.
pub mod api;
/// Core implementations: the capability traits and error taxonomy, the
/// rolling-window statistic structures, the admission breaker and the
/// retry collaborator.
pub mod core;
/// Adapters for logging crates.
pub mod logging;
// Utility functions: power-of-two rounding, decimal rounding, the random
// source and time helpers.
pub mod utils;

// re-export preludes
pub use crate::core::*;
pub use api::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
