// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read;

use clap::Parser;

/// Deliver a text nudge into a running terminal program's input field.
#[derive(Debug, Parser)]
#[command(name = "syphn", version, about)]
pub struct Config {
    /// Terminal columns for the hosted PTY.
    #[arg(long, env = "SYPHN_COLS", default_value = "200")]
    pub cols: u16,

    /// Terminal rows for the hosted PTY.
    #[arg(long, env = "SYPHN_ROWS", default_value = "50")]
    pub rows: u16,

    /// Log format (json or text).
    #[arg(long, env = "SYPHN_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "SYPHN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Message to deliver. Pass `-` to read it from stdin.
    #[arg(long, env = "SYPHN_MESSAGE")]
    pub message: String,

    /// Wait after sentinel insertion before probing for it, in milliseconds.
    #[arg(long, env = "SYPHN_SENTINEL_DELAY_MS", default_value = "50")]
    pub sentinel_delay_ms: u64,

    /// Wait per clear iteration before re-capturing the window, in milliseconds.
    #[arg(long, env = "SYPHN_CLEAR_ITER_DELAY_MS", default_value = "50")]
    pub clear_iter_delay_ms: u64,

    /// Wait after literal injection, before `Enter`, in milliseconds.
    #[arg(long, env = "SYPHN_INJECT_DELAY_MS", default_value = "100")]
    pub inject_delay_ms: u64,

    /// Wait after `Enter`, before restoring the original input, in milliseconds.
    #[arg(long, env = "SYPHN_ENTER_DELAY_MS", default_value = "200")]
    pub enter_delay_ms: u64,

    /// Convergence-clear iteration budget.
    #[arg(long, env = "SYPHN_MAX_CLEAR_ITERATIONS", default_value = "200")]
    pub max_clear_iterations: u32,

    /// Floor on the computed capture window `N`.
    #[arg(long, env = "SYPHN_MIN_CAPTURE_N", default_value = "5")]
    pub min_capture_n: usize,

    /// Extra lines of context trimmed along with the window hint `N`.
    #[arg(long, env = "SYPHN_DIFF_MARGIN", default_value = "20")]
    pub diff_margin: usize,

    /// Equal-region length below which a hunk is absorbed into its neighbor.
    #[arg(long, env = "SYPHN_ABSORB_THRESHOLD", default_value = "4")]
    pub absorb_threshold: usize,

    /// Command to run (after --).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.command.is_empty() {
            anyhow::bail!("a command to run must be specified after --");
        }
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other}"),
        }
        Ok(())
    }

    /// Resolve `--message`, reading stdin if it's `-`.
    pub fn resolve_message(&self) -> anyhow::Result<String> {
        if self.message != "-" {
            return Ok(self.message.clone());
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow::anyhow!("failed to read message from stdin: {e}"))?;
        Ok(buf.trim_end_matches('\n').to_owned())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
