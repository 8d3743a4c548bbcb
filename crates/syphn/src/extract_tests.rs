// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

// S1 — clean clear.
#[test]
fn s1_clean_clear() {
    let original = "output line 1\noutput line 2\n\u{276F} hello world";
    let cleared = "output line 1\noutput line 2\n\u{276F} ";
    assert_eq!(extract(original, cleared, 0, 20, 4), "hello world");
}

// S2 — multi-line.
#[test]
fn s2_multi_line() {
    let original = "output\n\u{276F} line one\n  line two\n  line three";
    let cleared = "output\n\u{276F} ";
    assert_eq!(extract(original, cleared, 0, 20, 4), "line one\nline two\nline three");
}

// S3 — Python REPL continuation prefix.
#[test]
fn s3_python_repl() {
    let original = "Python 3.12.0\n>>> for i in range(3):\n...     print(i)\n...     total += i";
    let cleared = "Python 3.12.0\n>>> ";
    assert_eq!(extract(original, cleared, 0, 20, 4), "for i in range(3):\nprint(i)\ntotal += i");
}

// S4 — input plus an unrelated status-bar hunk.
#[test]
fn s4_input_and_status_bar() {
    let separator = "\u{2500}".repeat(40);
    let original = format!("output\n\u{276F} my input\n{separator}\n  ctrl+t to hide tasks");
    let cleared = format!("output\n\u{276F} \n{separator}\n  ctrl+t \u{b7} ctrl+g to edit");
    assert_eq!(extract(&original, &cleared, 0, 20, 4), "my input");
}

// S5 — status-only change, no input cleared.
#[test]
fn s5_status_only_change() {
    let original = "\u{276F} \nstatus: idle";
    let cleared = "\u{276F} \nstatus: busy";
    assert_eq!(extract(original, cleared, 0, 20, 4), "");
}

#[yare::parameterized(
    chevron = { "\u{276F} " },
    dollar = { "$ " },
    percent = { "% " },
    angle = { "> " },
    arrow = { "\u{2192} " },
    hash = { "# " },
    lambda = { "\u{3bb} " },
    chevrons = { ">>> " },
)]
fn prompt_agnosticism(prompt: &str) {
    let original = format!("output{prompt}hello world");
    let cleared = format!("output{prompt}");
    assert_eq!(extract(&original, &cleared, 0, 20, 4), "hello world");
}

#[yare::parameterized(
    chevron = { "\u{276F} " },
    dollar = { "$ " },
    percent = { "% " },
    angle = { "> " },
    arrow = { "\u{2192} " },
    hash = { "# " },
    lambda = { "\u{3bb} " },
    chevrons = { ">>> " },
)]
fn multi_line_with_continuation_prefix(prompt: &str) {
    let original = format!("output\n{prompt}line one\n  line two\n  line three");
    let cleared = format!("output\n{prompt}");
    assert_eq!(extract(&original, &cleared, 0, 20, 4), "line one\nline two\nline three");
}

#[test]
fn separator_independence() {
    let without_separator = {
        let original = "output\n\u{276F} my input\n  ctrl+t to hide tasks";
        let cleared = "output\n\u{276F} \n  ctrl+t \u{b7} ctrl+g to edit";
        extract(original, cleared, 0, 20, 4)
    };
    let with_separator = {
        let separator = "-".repeat(40);
        let original = format!("output\n\u{276F} my input\n{separator}\n  ctrl+t to hide tasks");
        let cleared = format!("output\n\u{276F} \n{separator}\n  ctrl+t \u{b7} ctrl+g to edit");
        extract(&original, &cleared, 0, 20, 4)
    };
    assert_eq!(without_separator, with_separator);
}

#[test]
fn symmetric_change_guard_returns_empty() {
    // Inserted length >= Deleted length in the selected candidate: a
    // status-bar text swap, not a clear.
    let original = "\u{276F} \nstatus: ok";
    let cleared = "\u{276F} \nstatus: a much longer replacement message";
    assert_eq!(extract(original, cleared, 0, 20, 4), "");
}

#[test]
fn trailing_absorbed_newline_is_right_trimmed() {
    let original = "\u{276F} hello\n";
    let cleared = "\u{276F} \n";
    assert_eq!(extract(original, cleared, 0, 20, 4), "hello");
}
