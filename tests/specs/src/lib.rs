// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `syphn` binary as a subprocess against a real child
//! command and checks its exit code — the only externally observable
//! outcome, since delivery itself happens inside a PTY this process does
//! not attach a viewer to.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

/// Resolve the path to the compiled `syphn` binary.
pub fn syphn_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("syphn")
}

/// Run `syphn --message <message> -- <command>` and wait up to `timeout`
/// for it to exit, returning its exit code.
pub async fn run_syphn(message: &str, command: &[&str], timeout: Duration) -> anyhow::Result<i32> {
    let binary = syphn_binary();
    anyhow::ensure!(binary.exists(), "syphn binary not found at {}", binary.display());

    let mut child = Command::new(&binary)
        .arg("--message")
        .arg(message)
        .arg("--sentinel-delay-ms")
        .arg("5")
        .arg("--clear-iter-delay-ms")
        .arg("5")
        .arg("--inject-delay-ms")
        .arg("5")
        .arg("--enter-delay-ms")
        .arg("5")
        .arg("--")
        .args(command)
        .spawn()?;

    let status = tokio::time::timeout(timeout, child.wait()).await??;
    Ok(status.code().unwrap_or(-1))
}
