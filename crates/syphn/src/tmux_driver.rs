// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live [`PaneDriver`] realization that shells out to a real `tmux` binary.
//! `session` is a tmux target (`session-name`, `session:window`, or
//! `session:window.pane`), passed straight through to `-t`.

use tokio::process::Command;

use crate::error::NudgeError;
use crate::pane_driver::{BoxFuture, KeyToken, PaneDriver};

fn tmux_key_name(token: KeyToken) -> &'static str {
    match token {
        KeyToken::CtrlA => "C-a",
        KeyToken::CtrlK => "C-k",
        KeyToken::Enter => "Enter",
        KeyToken::Escape => "Escape",
        KeyToken::LowerI => "i",
    }
}

/// Drives a pane through the `tmux` CLI rather than a hosted PTY. The socket
/// name is fixed at construction so every call in a `deliver()` targets the
/// same tmux server.
pub struct TmuxPaneDriver {
    socket: Option<String>,
}

impl TmuxPaneDriver {
    pub fn new() -> Self {
        Self { socket: None }
    }

    pub fn with_socket(socket: impl Into<String>) -> Self {
        Self { socket: Some(socket.into()) }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("tmux");
        if let Some(socket) = &self.socket {
            cmd.arg("-L").arg(socket);
        }
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<String, NudgeError> {
        let output = self
            .command()
            .args(args)
            .output()
            .await
            .map_err(|e| NudgeError::PaneDriverFailure(format!("spawning tmux failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(NudgeError::PaneDriverFailure(format!(
                "tmux {args:?} failed: {stderr}"
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TmuxPaneDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneDriver for TmuxPaneDriver {
    fn send_raw<'a>(&'a self, session: &'a str, token: KeyToken) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.run(&["send-keys", "-t", session, tmux_key_name(token)])
                .await
                .map(|_| ())
        })
    }

    fn send_literal<'a>(&'a self, session: &'a str, text: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.run(&["send-keys", "-l", "-t", session, "--", text])
                .await
                .map(|_| ())
        })
    }

    fn capture_all<'a>(&'a self, session: &'a str, _line_hint: usize) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let out = self
                .run(&["capture-pane", "-p", "-e", "-J", "-t", session, "-S", "-"])
                .await?;
            Ok(out.trim_end_matches('\n').to_owned())
        })
    }

    fn capture_window<'a>(&'a self, session: &'a str, n: usize) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let start = format!("-{n}");
            let out = self
                .run(&["capture-pane", "-p", "-e", "-J", "-t", session, "-S", &start])
                .await?;
            Ok(out.trim_end_matches('\n').to_owned())
        })
    }

    fn is_blocked<'a>(&'a self, session: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let out = self
                .run(&["display-message", "-p", "-t", session, "#{pane_in_mode}"])
                .await?;
            Ok(out.trim() == "1")
        })
    }

    fn wake<'a>(&'a self, session: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move { self.run(&["refresh-client", "-t", session]).await.map(|_| ()) })
    }
}

#[cfg(test)]
#[path = "tmux_driver_tests.rs"]
mod tests;
