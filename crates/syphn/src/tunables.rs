// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The numeric constants from the protocol's design, bundled so the CLI can
//! override any of them without touching the algorithms that use them.

use std::time::Duration;

use crate::config::Config;
use crate::extract;
use crate::hunk;
use crate::protocol;
use crate::sentinel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunables {
    pub sentinel_delay: Duration,
    pub clear_iter_delay: Duration,
    pub inject_delay: Duration,
    pub enter_delay: Duration,
    pub max_clear_iterations: u32,
    pub min_capture_n: usize,
    pub diff_margin: usize,
    pub absorb_threshold: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            sentinel_delay: sentinel::SENTINEL_DELAY,
            clear_iter_delay: sentinel::CLEAR_ITER_DELAY,
            inject_delay: protocol::INJECT_DELAY,
            enter_delay: protocol::ENTER_DELAY,
            max_clear_iterations: sentinel::MAX_CLEAR_ITERATIONS,
            min_capture_n: sentinel::MIN_CAPTURE_N,
            diff_margin: extract::DIFF_MARGIN,
            absorb_threshold: hunk::ABSORB_THRESHOLD,
        }
    }
}

impl From<&Config> for Tunables {
    fn from(config: &Config) -> Self {
        Self {
            sentinel_delay: Duration::from_millis(config.sentinel_delay_ms),
            clear_iter_delay: Duration::from_millis(config.clear_iter_delay_ms),
            inject_delay: Duration::from_millis(config.inject_delay_ms),
            enter_delay: Duration::from_millis(config.enter_delay_ms),
            max_clear_iterations: config.max_clear_iterations,
            min_capture_n: config.min_capture_n,
            diff_margin: config.diff_margin,
            absorb_threshold: config.absorb_threshold,
        }
    }
}
