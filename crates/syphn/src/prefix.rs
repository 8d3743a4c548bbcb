// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extracts the TUI's continuation-line prefix from the `Deleted` region of
//! a candidate hunk; dynamically derived, never configured.
//!
//! Whitelist membership is the one piece of domain knowledge allowed in the
//! whole extraction path, and it is documented at this single point: a
//! prefix may only consist of `{ ' ', '\t', '.', '>', '|', ':' }`. Anything
//! else — the first ASCII alphanumeric, or any byte ≥ 0x80 (emoji, CJK,
//! etc) — is content, not prefix.

const PREFIX_WHITELIST: &[u8] = b" \t.>|:";

/// Detect the continuation prefix shared by the continuation lines (lines
/// 1.. — line 0 never has one, the TUI's leading prompt glyph lives in the
/// Equal region before the hunk) of a `Deleted` byte region.
pub fn detect(deleted: &[u8]) -> Vec<u8> {
    let lines: Vec<&[u8]> = split_lines(deleted);
    let continuation_lines: Vec<&[u8]> =
        lines.iter().skip(1).filter(|l| !l.is_empty()).copied().collect();

    match continuation_lines.len() {
        0 => Vec::new(),
        1 => leading_space_run(continuation_lines[0]),
        _ => {
            let mut prefix = continuation_lines[0];
            for line in &continuation_lines[1..] {
                let common = common_byte_prefix_len_utf8_safe(prefix, line);
                prefix = &prefix[..common];
            }
            trim_to_noncontent(prefix).to_vec()
        }
    }
}

fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    data.split(|&b| b == b'\n').collect()
}

fn leading_space_run(line: &[u8]) -> Vec<u8> {
    line.iter().take_while(|&&b| b == b' ' || b == b'\t').copied().collect()
}

/// Longest common byte prefix of `a` and `b`, snapped down to a UTF-8
/// code-point boundary so the result never splits a multi-byte sequence.
pub fn common_byte_prefix_len_utf8_safe(a: &[u8], b: &[u8]) -> usize {
    let raw = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    let mut len = raw;
    // A UTF-8 continuation byte (0b10xxxxxx) in the middle of the shared
    // prefix means we've cut a multi-byte code point; back up to its start.
    while len > 0 && is_continuation_byte(a[len - 1]) {
        len -= 1;
    }
    len
}

fn is_continuation_byte(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}

/// Retain only whitelisted non-content bytes from the front of `prefix`,
/// stopping at the first ASCII alphanumeric or any byte ≥ 0x80.
pub fn trim_to_noncontent(prefix: &[u8]) -> &[u8] {
    let end = prefix
        .iter()
        .position(|&b| b >= 0x80 || b.is_ascii_alphanumeric() || !PREFIX_WHITELIST.contains(&b))
        .unwrap_or(prefix.len());
    &prefix[..end]
}

#[cfg(test)]
#[path = "prefix_tests.rs"]
mod tests;
