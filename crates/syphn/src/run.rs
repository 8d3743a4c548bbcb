// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::pty::host::PtyHost;
use crate::protocol::NudgeProtocol;
use crate::tunables::Tunables;

/// Readiness timeout: how long to wait for the spawned command's first byte
/// of output before giving up on the readiness heuristic and attempting
/// delivery anyway.
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// A placeholder session identifier: `PtyHost` hosts exactly one pane per
/// process, so the `session` argument threaded through `PaneDriver` is
/// unused beyond logging.
const SESSION: &str = "pty";

/// Initialize tracing/logging from config.
///
/// Uses `try_init` so it's safe to call multiple times (e.g. from tests).
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;

    // Priority: --log-level / SYPHN_LOG_LEVEL > RUST_LOG > default ("info").
    let filter = if std::env::var("SYPHN_LOG_LEVEL").is_err() && config.log_level == "info" {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    } else {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let result = match config.log_format.as_str() {
        "json" => fmt::fmt().with_env_filter(filter).json().try_init(),
        _ => fmt::fmt().with_env_filter(filter).try_init(),
    };
    drop(result);
}

/// Spawn `config.command` under a [`PtyHost`], wait for it to produce its
/// first byte of output, then deliver `config.message` via
/// [`NudgeProtocol::deliver`]. Returns the process exit code: `0` on
/// success, or the delivered [`crate::error::NudgeError`]'s `exit_code()`.
pub async fn run(config: Config) -> anyhow::Result<i32> {
    init_tracing(&config);
    config.validate()?;

    let message = config.resolve_message()?;
    let tunables = Tunables::from(&config);

    info!(command = ?config.command, "spawning pane");
    let host = PtyHost::spawn(&config.command, config.cols, config.rows)?;

    if !host.wait_for_output(READY_TIMEOUT).await {
        info!("no output observed within the readiness timeout; attempting delivery anyway");
    }

    let protocol = NudgeProtocol::with_tunables(&host, tunables);
    match protocol.deliver(SESSION, &message).await {
        Ok(outcome) => {
            info!(restored = ?outcome.restored_input, "nudge delivered");
            Ok(0)
        }
        Err(e) => {
            error!(error = %e, "nudge delivery failed");
            Ok(e.exit_code())
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
