// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn line_zero_is_never_part_of_the_prefix() {
    // Only one non-empty continuation line ("  line two"); line 0 is ignored
    // even though it also starts with spaces.
    let deleted = b"  line zero\n  line two";
    assert_eq!(detect(deleted), b"  ");
}

#[test]
fn single_continuation_line_uses_leading_whitespace() {
    let deleted = b"line one\n\t\tline two";
    assert_eq!(detect(deleted), b"\t\t");
}

#[test]
fn multiple_continuation_lines_use_longest_common_prefix() {
    let deleted = b"for i in range(3):\n...     print(i)\n...     total += i";
    assert_eq!(detect(deleted), b"...     ");
}

#[test]
fn empty_continuation_lines_are_skipped() {
    let deleted = b"header\n\n  body";
    assert_eq!(detect(deleted), b"  ");
}

#[test]
fn no_continuation_lines_yields_empty_prefix() {
    assert_eq!(detect(b"only line"), Vec::<u8>::new());
}

#[test]
fn whitelist_stops_at_first_alphanumeric() {
    assert_eq!(trim_to_noncontent(b">>> hello"), b">>> ");
    assert_eq!(trim_to_noncontent(b"...123"), b"...");
}

#[test]
fn whitelist_stops_at_non_ascii_byte() {
    let mut prefix = b"> ".to_vec();
    prefix.extend_from_slice("🎉".as_bytes());
    assert_eq!(trim_to_noncontent(&prefix), b"> ");
}

#[test]
fn whitelist_keeps_only_enumerated_chars() {
    assert_eq!(trim_to_noncontent(b" \t.>|:"), b" \t.>|:");
    assert_eq!(trim_to_noncontent(b" \t.>|:X"), b" \t.>|:");
}

#[test]
fn common_prefix_never_splits_a_multibyte_code_point() {
    let emoji = "🎉🎉hello".as_bytes();
    let other = "🎉🎉world".as_bytes();
    let len = common_byte_prefix_len_utf8_safe(emoji, other);
    assert!(std::str::from_utf8(&emoji[..len]).is_ok());
    // The shared run is the two emoji (8 bytes of 🎉 each is 4 bytes).
    assert_eq!(len, 8);
}

#[test]
fn common_prefix_of_partial_multibyte_overlap_snaps_down() {
    // Two different 3-byte CJK characters whose first byte happens to
    // match must not yield a 1-byte "common prefix".
    let a = "日本".as_bytes();
    let b = "日本語".as_bytes();
    let len = common_byte_prefix_len_utf8_safe(a, b);
    assert!(std::str::from_utf8(&a[..len]).is_ok());
    assert_eq!(len, a.len());
}
