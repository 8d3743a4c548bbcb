// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-level Myers diff: the shortest edit script between two captures.

/// A single diff operation, each carrying the byte slice it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    Equal(Vec<u8>),
    Delete(Vec<u8>),
    Insert(Vec<u8>),
}

/// Compute the shortest edit script between `a` and `b`.
///
/// Common prefix and suffix are stripped before running the core algorithm
/// and re-emitted as `Equal` operations bracketing the middle diff, which
/// makes the typical case (a tiny change inside a large capture) near-linear.
/// The core itself is the classic O((N+M)·D) Myers algorithm with a trace
/// kept for backtracking — no heuristic shortcuts that would lose
/// optimality. Consecutive operations of the same kind are merged in a
/// final pass.
pub fn diff(a: &[u8], b: &[u8]) -> Vec<DiffOp> {
    if a == b {
        return if a.is_empty() { vec![] } else { vec![DiffOp::Equal(a.to_vec())] };
    }

    let prefix_len = common_prefix_len(a, b);
    let suffix_len = common_suffix_len(&a[prefix_len..], &b[prefix_len..]);

    let mid_a = &a[prefix_len..a.len() - suffix_len];
    let mid_b = &b[prefix_len..b.len() - suffix_len];

    let mut ops = Vec::new();
    if prefix_len > 0 {
        ops.push(DiffOp::Equal(a[..prefix_len].to_vec()));
    }
    ops.extend(myers_core(mid_a, mid_b));
    if suffix_len > 0 {
        ops.push(DiffOp::Equal(a[a.len() - suffix_len..].to_vec()));
    }

    merge_adjacent(ops)
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

/// Myers's O((N+M)·D) algorithm with full backtrack, applied to the
/// (prefix/suffix-stripped) middle region.
fn myers_core(a: &[u8], b: &[u8]) -> Vec<DiffOp> {
    let n = a.len() as isize;
    let m = b.len() as isize;

    if n == 0 && m == 0 {
        return vec![];
    }
    if n == 0 {
        return vec![DiffOp::Insert(b.to_vec())];
    }
    if m == 0 {
        return vec![DiffOp::Delete(a.to_vec())];
    }

    let max = (n + m) as usize;
    let offset = max as isize;
    let mut v = vec![0isize; 2 * max + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'outer: for d in 0..=max as isize {
        trace.push(v.clone());
        for k in (-d..=d).step_by(2) {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;

            if x >= n && y >= m {
                trace[d as usize] = v.clone();
                break 'outer;
            }
        }
    }

    backtrack(a, b, &trace, offset)
}

fn backtrack(a: &[u8], b: &[u8], trace: &[Vec<isize>], offset: isize) -> Vec<DiffOp> {
    let mut ops = Vec::new();
    let mut x = a.len() as isize;
    let mut y = b.len() as isize;

    for d in (0..trace.len()).rev() {
        let v = &trace[d];
        let k = x - y;
        let idx = (k + offset) as usize;

        let prev_k = if k == -(d as isize) || (k != d as isize && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_idx = (prev_k + offset) as usize;
        let prev_x = v[prev_idx];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(DiffOp::Equal(vec![a[(x - 1) as usize]]));
            x -= 1;
            y -= 1;
        }

        if d == 0 {
            break;
        }

        if x == prev_x {
            ops.push(DiffOp::Insert(vec![b[(y - 1) as usize]]));
            y -= 1;
        } else {
            ops.push(DiffOp::Delete(vec![a[(x - 1) as usize]]));
            x -= 1;
        }
    }

    ops.reverse();
    ops
}

/// Merge consecutive operations of the same kind into a single op.
fn merge_adjacent(ops: Vec<DiffOp>) -> Vec<DiffOp> {
    let mut merged: Vec<DiffOp> = Vec::with_capacity(ops.len());
    for op in ops {
        match (merged.last_mut(), op) {
            (Some(DiffOp::Equal(prev)), DiffOp::Equal(bytes)) => prev.extend(bytes),
            (Some(DiffOp::Delete(prev)), DiffOp::Delete(bytes)) => prev.extend(bytes),
            (Some(DiffOp::Insert(prev)), DiffOp::Insert(bytes)) => prev.extend(bytes),
            (_, op) => merged.push(op),
        }
    }
    merged
}

/// Reconstruct the string each `DiffOp` sequence side applies to, used by
/// the round-trip property test.
pub fn reconstruct_target(ops: &[DiffOp]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            DiffOp::Equal(bytes) | DiffOp::Insert(bytes) => out.extend_from_slice(bytes),
            DiffOp::Delete(_) => {}
        }
    }
    out
}

pub fn reconstruct_source(ops: &[DiffOp]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            DiffOp::Equal(bytes) | DiffOp::Delete(bytes) => out.extend_from_slice(bytes),
            DiffOp::Insert(_) => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
