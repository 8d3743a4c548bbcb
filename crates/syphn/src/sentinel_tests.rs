// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pane_driver::{ScriptedPaneDriver, SENTINEL_PLACEHOLDER};
use crate::tunables::Tunables;

#[test]
fn generated_sentinel_has_the_documented_shape() {
    let sentinel = generate();
    let glyphs: Vec<char> = sentinel.chars().collect();
    assert_eq!(glyphs.len(), 6);
    assert_eq!(glyphs[0], '\u{a7}');
    assert_eq!(glyphs[5], '\u{a7}');
    for c in &glyphs[1..5] {
        assert!(c.is_ascii_uppercase() || c.is_ascii_digit(), "{c} not base32");
    }
    assert_eq!(sentinel.len(), 8, "2 bytes of § + 4 ASCII glyphs == 8 bytes");
}

#[test]
fn two_sentinels_in_succession_differ() {
    let a = generate();
    // Nanosecond timestamps differ with overwhelming probability between
    // two calls under a normal clock.
    std::thread::sleep(Duration::from_nanos(1));
    let b = generate();
    assert_ne!(a, b);
}

#[test]
fn cycle_detector_fires_on_oscillation() {
    let mut detector = CycleDetector::new();
    assert!(!detector.push_and_check("A".to_owned()));
    assert!(!detector.push_and_check("B".to_owned()));
    assert!(detector.push_and_check("A".to_owned()));
}

#[test]
fn cycle_detector_does_not_fire_on_distinct_sequence() {
    let mut detector = CycleDetector::new();
    for i in 0..(CYCLE_WINDOW + 1) {
        assert!(!detector.push_and_check(format!("state-{i}")));
    }
}

#[tokio::test]
async fn clear_converges_when_captures_stabilize() {
    let driver = ScriptedPaneDriver::new();
    driver.push_full_capture("output\n\u{276F} hello");
    // Probe capture after sentinel insertion: the real sentinel lands on the
    // last line wherever the placeholder appears.
    driver.push_full_capture(format!("output\n\u{276F} {SENTINEL_PLACEHOLDER}"));
    // Convergence window captures: two identical captures end the loop.
    driver.push_window_capture("\u{276F} ");
    driver.push_window_capture("\u{276F} ");

    let clear = SentinelClear::new(&driver, Tunables::default());
    let result = clear.clear("s").await.unwrap();
    assert_eq!(result.original_capture, "output\n\u{276F} hello");
    assert!(result.n >= MIN_CAPTURE_N);
}

#[tokio::test]
async fn clear_fails_with_sentinel_not_found_after_retry() {
    let driver = ScriptedPaneDriver::new();
    driver.push_full_capture("output\n\u{276F} hello");
    // Neither the first nor the modal-editor-retry probe contains a sentinel.
    driver.push_full_capture("output\n\u{276F} hello");
    driver.push_full_capture("output\n\u{276F} hello");

    let clear = SentinelClear::new(&driver, Tunables::default());
    let err = clear.clear("s").await.unwrap_err();
    assert_eq!(err, NudgeError::SentinelNotFound);
}

#[tokio::test]
async fn clear_fails_with_clear_stalled_on_oscillation() {
    let driver = ScriptedPaneDriver::new();
    driver.push_full_capture("output\n\u{276F} hello");
    driver.push_full_capture(format!("output\n\u{276F} {SENTINEL_PLACEHOLDER}"));

    driver.push_window_capture("state-start");
    driver.push_window_capture("state-B");
    driver.push_window_capture("state-A");
    driver.push_window_capture("state-B");

    let clear = SentinelClear::new(&driver, Tunables::default());
    let err = clear.clear("s").await.unwrap_err();
    assert_eq!(err, NudgeError::ClearStalled);
}
