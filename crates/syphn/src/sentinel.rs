// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inserts a unique sentinel, computes the capture window `N`, and drives
//! the input field to empty through a bounded convergence-clear loop.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::error::NudgeError;
use crate::pane_driver::{KeyToken, PaneDriver};
use crate::tunables::Tunables;

/// Wait after sentinel insertion before probing for it.
pub const SENTINEL_DELAY: Duration = Duration::from_millis(50);
/// Wait per clear iteration before re-capturing the window.
pub const CLEAR_ITER_DELAY: Duration = Duration::from_millis(50);
/// Convergence-clear iteration budget.
pub const MAX_CLEAR_ITERATIONS: u32 = 200;
/// Floor on the computed capture window `N`.
pub const MIN_CAPTURE_N: usize = 5;
/// Bounded history size for the small-cycle detector.
const CYCLE_WINDOW: usize = 8;

/// RFC-4648-alphabet base32, upper-case, no padding — just enough to turn
/// the first three hash bytes into four glyphs. No base32 crate exists
/// anywhere in this codebase's dependency tree, so this one narrow
/// wire-format detail is hand-rolled rather than pulled in wholesale.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn base32_encode_4(bytes: [u8; 3]) -> String {
    let buf = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32;
    let mut out = String::with_capacity(4);
    for i in 0..4u32 {
        // Top 20 of the 24 available bits, 5 bits per glyph; the low 4
        // bits (an incomplete fifth group) are simply dropped.
        let shift = 24 - 5 * (i + 1);
        let idx = ((buf >> shift) & 0b11111) as usize;
        out.push(BASE32_ALPHABET[idx] as char);
    }
    out
}

/// Generate a sentinel: `§` + 4 base32 chars derived from a nanosecond
/// timestamp's SHA-256 hash + `§`.
pub fn generate() -> String {
    let ts_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let digest = Sha256::digest(ts_ns.to_be_bytes());
    let glyphs = base32_encode_4([digest[0], digest[1], digest[2]]);
    format!("\u{a7}{glyphs}\u{a7}")
}

/// Result of a successful `SentinelClear::clear` call.
pub struct ClearResult {
    /// Full capture taken before any keystroke was sent; this is the
    /// capture the diff uses so visual wrap positions match the user's
    /// actual input.
    pub original_capture: String,
    /// Window size, in logical lines from the bottom of the pane.
    pub n: usize,
}

/// Small-cycle detector over a bounded history of windowed captures. Fires
/// when the current capture repeats one already seen in the window —
/// almost always a modal editor interpreting `C-k` as something other than
/// kill-to-end-of-line, with `C-a` dismissing whatever that produced.
struct CycleDetector {
    history: VecDeque<String>,
}

impl CycleDetector {
    fn new() -> Self {
        Self { history: VecDeque::with_capacity(CYCLE_WINDOW) }
    }

    /// Returns `true` if `capture` is a repeat within the current window.
    fn push_and_check(&mut self, capture: String) -> bool {
        let is_cycle = self.history.contains(&capture);
        if self.history.len() == CYCLE_WINDOW {
            self.history.pop_front();
        }
        self.history.push_back(capture);
        is_cycle
    }
}

/// Drives a single pane through sentinel insertion, probing, and
/// convergence-clearing.
pub struct SentinelClear<'a> {
    driver: &'a dyn PaneDriver,
    tunables: Tunables,
}

impl<'a> SentinelClear<'a> {
    pub fn new(driver: &'a dyn PaneDriver, tunables: Tunables) -> Self {
        Self { driver, tunables }
    }

    pub async fn clear(&self, session: &str) -> Result<ClearResult, NudgeError> {
        let original_capture = self.driver.capture_all(session, 0).await?;

        let n = match self.insert_and_locate_sentinel(session).await? {
            Some(n) => n,
            None => return Err(NudgeError::SentinelNotFound),
        };

        self.converge(session, n).await?;

        Ok(ClearResult { original_capture, n })
    }

    /// Insert a sentinel and locate it in a subsequent probe capture,
    /// retrying once via the modal-editor-compatibility path if the first
    /// attempt doesn't find it. Returns the computed window `N`.
    async fn insert_and_locate_sentinel(&self, session: &str) -> Result<Option<usize>, NudgeError> {
        if let Some(n) = self.try_insert_sentinel(session).await? {
            return Ok(Some(n));
        }

        // Modal-editor retry: the pane might be in a normal-mode editor
        // (C-a incremented a number, letters ran commands). Escape, enter
        // insert-like mode, and try once more with a fresh sentinel.
        self.driver.send_raw(session, KeyToken::Escape).await?;
        tokio::time::sleep(self.tunables.sentinel_delay).await;
        self.driver.send_raw(session, KeyToken::LowerI).await?;
        tokio::time::sleep(self.tunables.sentinel_delay).await;

        self.try_insert_sentinel(session).await
    }

    async fn try_insert_sentinel(&self, session: &str) -> Result<Option<usize>, NudgeError> {
        let sentinel = generate();
        self.driver.send_raw(session, KeyToken::CtrlA).await?;
        self.driver.send_literal(session, &sentinel).await?;
        tokio::time::sleep(self.tunables.sentinel_delay).await;

        let probe = self.driver.capture_all(session, 0).await?;
        Ok(locate_sentinel(&probe, &sentinel).map(|lines_from_bottom| {
            (lines_from_bottom + 2).max(self.tunables.min_capture_n)
        }))
    }

    async fn converge(&self, session: &str, n: usize) -> Result<(), NudgeError> {
        let mut prev = self.driver.capture_window(session, n).await?;
        let mut cycle = CycleDetector::new();

        for _ in 0..self.tunables.max_clear_iterations {
            self.driver.send_raw(session, KeyToken::CtrlA).await?;
            self.driver.send_raw(session, KeyToken::CtrlK).await?;
            tokio::time::sleep(self.tunables.clear_iter_delay).await;

            let cur = self.driver.capture_window(session, n).await?;
            if cur == prev {
                return Ok(());
            }
            if cycle.push_and_check(cur.clone()) {
                return Err(NudgeError::ClearStalled);
            }
            prev = cur;
        }

        Err(NudgeError::ClearIterationLimitExceeded)
    }
}

/// Search backward for the sentinel in `capture`, returning the number of
/// logical lines from the bottom of the pane to the sentinel's line.
fn locate_sentinel(capture: &str, sentinel: &str) -> Option<usize> {
    let lines: Vec<&str> = capture.lines().collect();
    lines.iter().rev().position(|line| line.contains(sentinel))
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
