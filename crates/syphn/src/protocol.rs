// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level orchestration: pre-checks, clear, capture, extract, inject +
//! submit, restore, wake.

use std::time::Duration;

use regex::Regex;
use std::sync::OnceLock;

use crate::error::NudgeError;
use crate::extract;
use crate::pane_driver::{KeyToken, PaneDriver};
use crate::sentinel::SentinelClear;
use crate::tunables::Tunables;

/// Wait after literal injection, before `Enter`.
pub const INJECT_DELAY: Duration = Duration::from_millis(100);
/// Wait after `Enter`, before restoring the original input (if any).
pub const ENTER_DELAY: Duration = Duration::from_millis(200);
/// Bounded tail scanned for a paste-placeholder marker.
const PASTE_SCAN_LINES: usize = 50;

/// The paste-placeholder marker regex — the single permitted piece of
/// client-specific pattern matching in the whole core. Its purpose is to
/// avoid corrupting an in-progress large paste; other clients with
/// different markers require extending this regex, not the algorithm.
fn paste_placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[Pasted text #\d+ \+\d+ lines\]").expect("paste placeholder regex is valid")
    })
}

/// Outcome of a successful delivery. The reconstructed original input is
/// carried for observability only; it is not part of the caller-facing
/// contract besides success/failure.
#[derive(Debug, Clone, Default)]
pub struct DeliveryOutcome {
    pub restored_input: Option<String>,
}

/// Drives a single `deliver(session, message)` call against a [`PaneDriver`].
pub struct NudgeProtocol<'a> {
    driver: &'a dyn PaneDriver,
    tunables: Tunables,
}

impl<'a> NudgeProtocol<'a> {
    pub fn new(driver: &'a dyn PaneDriver) -> Self {
        Self { driver, tunables: Tunables::default() }
    }

    pub fn with_tunables(driver: &'a dyn PaneDriver, tunables: Tunables) -> Self {
        Self { driver, tunables }
    }

    pub async fn deliver(
        &self,
        session: &str,
        message: &str,
    ) -> Result<DeliveryOutcome, NudgeError> {
        // 1. Pre-checks.
        if self.driver.is_blocked(session).await? {
            return Err(NudgeError::PaneBlocked);
        }
        let tail = self.driver.capture_window(session, PASTE_SCAN_LINES).await?;
        if paste_placeholder_regex().is_match(&tail) {
            return Err(NudgeError::PasteDetected);
        }

        // 2. Clear.
        let clear = SentinelClear::new(self.driver, self.tunables)
            .clear(session)
            .await?;

        // 3. Capture cleared state.
        let cleared = self
            .driver
            .capture_all(session, clear.n + self.tunables.diff_margin)
            .await?;

        // 4. Extract.
        let original_input = extract::extract(
            &clear.original_capture,
            &cleared,
            clear.n,
            self.tunables.diff_margin,
            self.tunables.absorb_threshold,
        );

        // 5. Inject and submit.
        self.driver.send_literal(session, message).await?;
        tokio::time::sleep(self.tunables.inject_delay).await;
        self.driver.send_raw(session, KeyToken::Enter).await?;

        // 6. Restore.
        let restored_input = if !original_input.is_empty() {
            tokio::time::sleep(self.tunables.enter_delay).await;
            self.driver.send_literal(session, &original_input).await?;
            Some(original_input)
        } else {
            None
        };

        // 7. Wake.
        self.driver.wake(session).await?;

        Ok(DeliveryOutcome { restored_input })
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
