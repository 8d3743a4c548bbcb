// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selects the candidate hunk representing the cleared input and
//! reconstructs the original user text, stripping the detected
//! continuation prefix.

use crate::diff::diff;
use crate::hunk::{group, Hunk};
use crate::prefix;

/// Typical margin of extra lines trimmed along with the window hint `N`,
/// to bound diff cost on huge scrollback while still giving the diff
/// enough surrounding context to find the real edit.
pub const DIFF_MARGIN: usize = 20;

/// A hunk augmented with its detected continuation prefix.
#[derive(Debug, Clone)]
struct CandidateHunk {
    hunk: Hunk,
    prefix: Vec<u8>,
}

/// Reconstruct the original user input from two pane captures.
///
/// `original` and `cleared` are full captures taken before and after the
/// convergence clear; `n` is the window size computed by `SentinelClear`.
/// `diff_margin` and `absorb_threshold` are the tunable counterparts of
/// [`DIFF_MARGIN`] and [`ABSORB_THRESHOLD`] (callers typically pass the
/// values from [`crate::tunables::Tunables`]).
/// Known irreducible losses (documented, not fixed): leading newlines in
/// the input land in the Equal region and cannot be recovered; trailing
/// spaces per line are stripped by the multiplexer's join-then-depad step.
pub fn extract(
    original: &str,
    cleared: &str,
    n: usize,
    diff_margin: usize,
    absorb_threshold: usize,
) -> String {
    let trimmed_original = last_lines(original, n + diff_margin);
    let trimmed_cleared = last_lines(cleared, n + diff_margin);

    let ops = diff(trimmed_original.as_bytes(), trimmed_cleared.as_bytes());
    let hunks = group(&ops, absorb_threshold);

    let candidates: Vec<CandidateHunk> = hunks
        .into_iter()
        .filter(|h| !h.deleted.is_empty())
        .map(|hunk| {
            let prefix = prefix::detect(&hunk.deleted);
            CandidateHunk { hunk, prefix }
        })
        .collect();

    let selected = match select(&candidates) {
        Some(c) => c,
        None => return String::new(),
    };

    if selected.hunk.inserted.len() >= selected.hunk.deleted.len() {
        // A symmetric swap (status-bar text change), not cleared input.
        return String::new();
    }

    reconstruct(&selected.hunk.deleted, &selected.prefix)
}

/// Selection policy, in tie-break order:
/// a. The last candidate (scanning backward) with a non-empty prefix.
/// b. Otherwise, the candidate with the smallest `Inserted` length.
fn select(candidates: &[CandidateHunk]) -> Option<&CandidateHunk> {
    if let Some(c) = candidates.iter().rev().find(|c| !c.prefix.is_empty()) {
        return Some(c);
    }
    candidates.iter().min_by_key(|c| c.hunk.inserted.len())
}

/// Split `deleted` by newline; leave line 0 untouched; for lines 1..,
/// strip the detected prefix exactly once if present. Rejoin with `\n` and
/// right-trim trailing newlines (an absorbed separator newline can leave a
/// spurious one).
fn reconstruct(deleted: &[u8], prefix: &[u8]) -> String {
    let lines: Vec<&[u8]> = deleted.split(|&b| b == b'\n').collect();
    let mut out_lines: Vec<Vec<u8>> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if i == 0 || prefix.is_empty() {
            out_lines.push(line.to_vec());
            continue;
        }
        if line.starts_with(prefix) {
            out_lines.push(line[prefix.len()..].to_vec());
        } else {
            out_lines.push(line.to_vec());
        }
    }

    let joined = out_lines.join(&b'\n');
    let text = String::from_utf8_lossy(&joined).into_owned();
    text.trim_end_matches('\n').to_owned()
}

/// Return the last `n` logical lines of `text`. `n == 0` means "all".
fn last_lines(text: &str, n: usize) -> String {
    if n == 0 {
        return text.to_owned();
    }
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
