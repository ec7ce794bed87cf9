//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify behavioral
//! contracts without any real HTTP traffic.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xshield_core::config::{BackoffStrategy, RetryConfig};
use xshield_core::{Error, Result};

/// Outcome a scripted attempt produces
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Respond with this status code
    Status(u16),
    /// Fail before any status is received
    ConnectionError,
}

/// An operation that replays a script of outcomes and counts its attempts
///
/// Once the script is exhausted, the last step repeats forever.
#[derive(Clone)]
pub struct ScriptedOperation {
    steps: Arc<Mutex<VecDeque<Step>>>,
    last: Arc<Mutex<Step>>,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedOperation {
    pub fn new(steps: &[Step]) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps: Arc::new(Mutex::new(steps.iter().copied().collect())),
            last: Arc::new(Mutex::new(steps[steps.len() - 1])),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always respond with `status`
    pub fn always(status: u16) -> Self {
        Self::new(&[Step::Status(status)])
    }

    /// Number of attempts made so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Perform one attempt
    pub async fn call(&self) -> Result<u16> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut steps = self.steps.lock().unwrap();
            match steps.pop_front() {
                Some(step) => {
                    *self.last.lock().unwrap() = step;
                    step
                }
                None => *self.last.lock().unwrap(),
            }
        };
        match step {
            Step::Status(code) => Ok(code),
            Step::ConnectionError => Err(Error::transport("connection refused")),
        }
    }
}

/// Backoff policy with millisecond intervals for fast tests
pub fn fast_retry_config(max_elapsed: Duration) -> RetryConfig {
    RetryConfig::backoff(
        BackoffStrategy::new(
            Duration::from_millis(5),
            Duration::from_millis(20),
            1.5,
            max_elapsed,
        ),
        true,
    )
}
