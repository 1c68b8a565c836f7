use super::{Bucket, Ring};
use crate::base::BreakerError;
use crate::utils::curr_time_millis;
use crate::Result;
use std::sync::Mutex;

/// The real-time width of one window slot.
pub const DEFAULT_SLOT_INTERVAL_MS: u64 = 500;

/// The default look-back of the window, in seconds.
pub const DEFAULT_WINDOW_SECS: usize = 10;

const SLOTS_PER_SECOND: usize = (1000 / DEFAULT_SLOT_INTERVAL_MS) as usize;

// Bounds on the slot count; out-of-range requests fall back to the default.
const MIN_WINDOW_SLOTS: usize = 2;
const MAX_WINDOW_SLOTS: usize = 600;

#[derive(Debug)]
struct WindowState {
    ring: Ring<Bucket>,
    // number of slots that constitute the visible window; the ring may
    // hold more from the power-of-two rounding, the excess is never read
    size: usize,
    interval_ms: u64,
    // index of the current (writable) slot
    offset: usize,
    // start of the current slot, aligned to a slot boundary
    updated_at: u64,
    running: bool,
}

impl WindowState {
    /// Invalidates the slots that have aged out since the last update
    /// and moves `offset` onto the slot covering `now`. Catch-up is
    /// clamped to `size`: a longer gap makes the whole window stale and
    /// resets it in one sweep.
    fn rotate(&mut self, now: u64) {
        let span = (now.saturating_sub(self.updated_at) / self.interval_ms) as usize;
        if span == 0 {
            return;
        }
        let span = span.min(self.size);
        for i in 1..=span {
            let idx = ((self.offset + i) % self.size) as isize;
            if let Some(bucket) = self.ring.at_mut(idx) {
                bucket.reset();
            }
        }
        self.offset = (self.offset + span) % self.size;
        // flooring keeps slot boundaries absolute; carrying the residual
        // would drift them across calls
        self.updated_at = now - now % self.interval_ms;
    }
}

/// RollingWindow maintains a sliding aggregate of numeric samples over
/// the last W seconds, sliced into fixed slots. Writes are amortized
/// O(1), reads are O(size), and both are serialized by one mutex.
///
/// The window stops exactly once and cannot be restarted; all calls
/// after [`stop`](RollingWindow::stop) fail with
/// [`BreakerError::WindowStopped`].
#[derive(Debug)]
pub struct RollingWindow {
    state: Mutex<WindowState>,
}

impl RollingWindow {
    /// Creates a window looking back `window_secs` seconds. Requests
    /// that translate to fewer than 2 or more than 600 slots fall back
    /// to the default of 10 seconds.
    pub fn new(window_secs: usize) -> Self {
        let mut size = window_secs * SLOTS_PER_SECOND;
        if !(MIN_WINDOW_SLOTS..=MAX_WINDOW_SLOTS).contains(&size) {
            size = DEFAULT_WINDOW_SECS * SLOTS_PER_SECOND;
        }

        let mut ring = Ring::new(size);
        for _ in 0..ring.cap() {
            ring.push(Bucket::new());
        }

        let now = curr_time_millis();
        RollingWindow {
            state: Mutex::new(WindowState {
                ring,
                size,
                interval_ms: DEFAULT_SLOT_INTERVAL_MS,
                offset: 0,
                updated_at: now - now % DEFAULT_SLOT_INTERVAL_MS,
                running: true,
            }),
        }
    }

    /// The number of slots in the visible window.
    pub fn size(&self) -> usize {
        self.state.lock().unwrap().size
    }

    /// Adds a sample to the current slot.
    pub fn add(&self, value: f64) -> Result<()> {
        self.add_with_time(curr_time_millis(), value)
    }

    pub fn add_with_time(&self, now: u64, value: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(BreakerError::WindowStopped.into());
        }
        state.rotate(now);
        let idx = (state.offset % state.size) as isize;
        if let Some(bucket) = state.ring.at_mut(idx) {
            bucket.add(value);
        }
        Ok(())
    }

    /// Returns the sum of the samples and the number of samples in the
    /// window.
    pub fn sum(&self) -> Result<(f64, u64)> {
        self.sum_with_time(curr_time_millis())
    }

    pub fn sum_with_time(&self, now: u64) -> Result<(f64, u64)> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(BreakerError::WindowStopped.into());
        }
        state.rotate(now);
        let mut sum = 0.0;
        let mut count = 0;
        for i in 0..state.size {
            if let Some(bucket) = state.ring.at(i as isize) {
                sum += bucket.sum();
                count += bucket.count();
            }
        }
        Ok((sum, count))
    }

    /// Returns the average of the samples in the window, 0 when empty.
    pub fn avg(&self) -> Result<f64> {
        self.avg_with_time(curr_time_millis())
    }

    pub fn avg_with_time(&self, now: u64) -> Result<f64> {
        let (sum, count) = self.sum_with_time(now)?;
        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum / count as f64)
    }

    /// Stops the window. Idempotent; there is no resurrection path.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        if state.running {
            state.running = false;
            state.ring.reset();
        }
    }
}
