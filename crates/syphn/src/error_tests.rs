// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    pane_blocked = { NudgeError::PaneBlocked, "PANE_BLOCKED", 10 },
    paste_detected = { NudgeError::PasteDetected, "PASTE_DETECTED", 11 },
    sentinel_not_found = { NudgeError::SentinelNotFound, "SENTINEL_NOT_FOUND", 12 },
    clear_stalled = { NudgeError::ClearStalled, "CLEAR_STALLED", 13 },
    clear_iteration_limit = {
        NudgeError::ClearIterationLimitExceeded, "CLEAR_ITERATION_LIMIT_EXCEEDED", 14
    },
)]
fn as_str_and_exit_code(error: NudgeError, expected_str: &str, expected_code: i32) {
    assert_eq!(error.as_str(), expected_str);
    assert_eq!(error.exit_code(), expected_code);
}

#[test]
fn pane_driver_failure_display_includes_kind() {
    let err = NudgeError::PaneDriverFailure("tmux: no such session".to_owned());
    assert_eq!(err.as_str(), "PANE_DRIVER_FAILURE");
    assert_eq!(err.exit_code(), 15);
    assert_eq!(err.to_string(), "PANE_DRIVER_FAILURE: tmux: no such session");
}

#[test]
fn display_matches_as_str_for_plain_variants() {
    assert_eq!(NudgeError::PaneBlocked.to_string(), "PANE_BLOCKED");
}
