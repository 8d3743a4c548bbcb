// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `syphn` binary against a real
//! child process and check its exit code.

use std::time::Duration;

use syphn_specs::run_syphn;

const TIMEOUT: Duration = Duration::from_secs(15);

// `cat` echoes whatever it's fed back to its own stdout, and a PTY in
// canonical mode echoes input on the line itself — so a clean pane with
// nothing typed, nudged with a message, should deliver and exit 0.
#[tokio::test]
async fn delivers_into_a_clean_cat_pane() -> anyhow::Result<()> {
    let code = run_syphn("hello from the nudge", &["cat"], TIMEOUT).await?;
    assert_eq!(code, 0, "expected a clean delivery to exit 0");
    Ok(())
}

#[tokio::test]
async fn exits_nonzero_when_no_command_is_given() -> anyhow::Result<()> {
    let code = run_syphn("hello", &[], TIMEOUT).await?;
    assert_ne!(code, 0, "clap should reject a missing command");
    Ok(())
}
