// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Groups a flat [`DiffOp`] sequence into [`Hunk`]s, absorbing small `Equal`
//! regions so spurious byte-level coincidences don't fragment a logical
//! change.

use crate::diff::DiffOp;

/// Large enough that single-character coincidences (the letters `s`, `n`,
/// `t` shared between unrelated phrases) don't split a logical input
/// change; small enough that real structural boundaries (status
/// separators, long common suffixes) still break hunks. The source has
/// evolved this between `4` (byte-level diffs of small panes) and `32`
/// (large panes with big separator-line `Equal` runs) — this crate fixes
/// it at the small-pane end, validated at the exact-threshold and
/// threshold-minus-one boundaries.
pub const ABSORB_THRESHOLD: usize = 4;

/// A contiguous change: a `Deleted` byte region from the source capture
/// paired with an `Inserted` byte region from the target capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    pub deleted: Vec<u8>,
    pub inserted: Vec<u8>,
}

/// Consume a flat diff op sequence and emit hunks.
///
/// The rule is NOT "every Equal ends a hunk": Equal regions of at least
/// `absorb_threshold` bytes end the current hunk; shorter Equal regions are
/// absorbed into it (appended to both `deleted` and `inserted`, since the
/// region is present on both sides).
pub fn group(ops: &[DiffOp], absorb_threshold: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;

    for op in ops {
        match op {
            DiffOp::Delete(bytes) => {
                current.get_or_insert_with(Hunk::default).deleted.extend_from_slice(bytes);
            }
            DiffOp::Insert(bytes) => {
                current.get_or_insert_with(Hunk::default).inserted.extend_from_slice(bytes);
            }
            DiffOp::Equal(bytes) => {
                if bytes.len() >= absorb_threshold {
                    if let Some(hunk) = current.take() {
                        hunks.push(hunk);
                    }
                } else if let Some(hunk) = current.as_mut() {
                    hunk.deleted.extend_from_slice(bytes);
                    hunk.inserted.extend_from_slice(bytes);
                }
                // A short Equal with no open hunk (e.g. the bracketing
                // prefix/suffix) is simply skipped — it belongs to neither
                // side of a change.
            }
        }
    }

    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }

    hunks
}

#[cfg(test)]
#[path = "hunk_tests.rs"]
mod tests;
