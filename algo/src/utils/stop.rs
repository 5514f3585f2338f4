/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A cooperative cancellation signal for long-running iterations.
///
/// A signal is raised when its deadline (if any) has passed, or when its flag
/// (if any) has been set. Iterative methods poll the signal once per outer
/// iteration and, if it is raised, stop returning their current
/// approximation.
///
/// Clones share the same flag.
///
/// # Examples
///
/// ```
/// use rgm_algo::utils::StopSignal;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let signal = StopSignal::never().flag(flag.clone());
/// assert!(!signal.is_raised());
/// flag.store(true, Ordering::Relaxed);
/// assert!(signal.is_raised());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    deadline: Option<Instant>,
    flag: Option<Arc<AtomicBool>>,
}

impl StopSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        Self::default()
    }

    /// Raises the signal at the given instant.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Raises the signal after the given duration from now.
    pub fn timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.deadline(deadline),
            // Too far in the future to be representable
            None => self,
        }
    }

    /// Raises the signal when `flag` is set.
    pub fn flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.flag = Some(flag);
        self
    }

    pub fn is_raised(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
