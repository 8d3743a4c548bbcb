// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosts a single child process on a real PTY and implements [`PaneDriver`]
//! directly against it — no terminal multiplexer in between.
//!
//! Output is mirrored two ways as it streams off the master fd: into a
//! [`Screen`] (for alt-screen / modal-state detection) and into a
//! [`RingBuffer`] of raw bytes (scrollback beyond what `Screen`'s fixed
//! viewport retains). Captures replay the ring through a throwaway,
//! oversized `avt::Vt` to reconstruct a full, wrapped transcript — the same
//! technique `Screen` itself uses to render a viewport, just with enough
//! rows that nothing scrolls off.

use std::ffi::CString;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use nix::libc;
use nix::pty::{forkpty, ForkptyResult, Winsize};
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{execvp, ForkResult, Pid};
use tokio::io::unix::AsyncFd;
use tokio::task::JoinHandle;

use super::nbio::{read_chunk, set_nonblocking, write_all, PtyFd};
use crate::error::NudgeError;
use crate::pane_driver::{BoxFuture, KeyToken, PaneDriver};
use crate::ring::RingBuffer;
use crate::screen::Screen;

/// Scrollback retained beyond the screen's own viewport.
const RING_CAPACITY: usize = 1 << 20;
/// Row count for the throwaway transcript-rendering terminal. Large enough
/// that a capture never scrolls content off before it's read back out.
const TRANSCRIPT_ROWS: usize = 10_000;

fn key_bytes(token: KeyToken) -> &'static [u8] {
    match token {
        KeyToken::CtrlA => b"\x01",
        KeyToken::CtrlK => b"\x0b",
        KeyToken::Enter => b"\r",
        KeyToken::Escape => b"\x1b",
        KeyToken::LowerI => b"i",
    }
}

struct Mirror {
    screen: Screen,
    ring: RingBuffer,
}

/// Re-render the full scrollback held in `ring_bytes` as plain lines, at the
/// given terminal width. Pure and independent of any live PTY so it can be
/// unit-tested without spawning a process.
fn render_transcript(ring_bytes: &[u8], cols: u16) -> String {
    let mut vt = avt::Vt::new(cols.max(1) as usize, TRANSCRIPT_ROWS);
    let text = String::from_utf8_lossy(ring_bytes);
    let _ = vt.feed_str(&text);
    let mut lines: Vec<String> = vt.view().map(|line| line.text()).collect();
    while matches!(lines.last(), Some(line) if line.trim_end().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Return the last `n` logical lines of `text`. `n == 0` means "all".
fn last_n_lines(text: &str, n: usize) -> String {
    if n == 0 {
        return text.to_owned();
    }
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Hosts a child process on a real PTY and implements `PaneDriver` directly
/// against it.
pub struct PtyHost {
    master: Arc<AsyncFd<PtyFd>>,
    child_pid: Pid,
    cols: Arc<AtomicU16>,
    rows: Arc<AtomicU16>,
    mirror: Arc<Mutex<Mirror>>,
    reader: JoinHandle<()>,
}

impl PtyHost {
    /// Spawn `command` (must be non-empty: `command[0]` is the program) on a
    /// fresh PTY of the given size, and start mirroring its output.
    // forkpty is unsafe: the post-fork child is partially initialized until exec.
    #[allow(unsafe_code)]
    pub fn spawn(command: &[String], cols: u16, rows: u16) -> anyhow::Result<Self> {
        anyhow::ensure!(!command.is_empty(), "command must have at least one element");

        let winsize = Winsize { ws_col: cols, ws_row: rows, ws_xpixel: 0, ws_ypixel: 0 };

        // SAFETY: forkpty's child-side partial initialization is resolved by
        // execvp-ing immediately below, with no intervening allocation.
        let ForkptyResult { master, fork_result } =
            unsafe { forkpty(&winsize, None) }.context("forkpty failed")?;

        match fork_result {
            ForkResult::Child => {
                std::env::set_var("TERM", "xterm-256color");
                std::env::set_var("SYPHN", "1");

                let c_args: Vec<CString> = command
                    .iter()
                    .map(|s| CString::new(s.as_bytes()))
                    .collect::<Result<_, _>>()
                    .context("invalid command argument")?;

                execvp(&c_args[0], &c_args).context("execvp failed")?;
                unreachable!("execvp replaces the process image on success");
            }
            ForkResult::Parent { child } => {
                set_nonblocking(&master)?;
                let master = Arc::new(AsyncFd::new(PtyFd(master)).context("AsyncFd::new failed")?);
                let mirror = Arc::new(Mutex::new(Mirror {
                    screen: Screen::new(cols, rows),
                    ring: RingBuffer::new(RING_CAPACITY),
                }));

                let reader = tokio::spawn(Self::read_loop(master.clone(), mirror.clone()));

                Ok(Self {
                    master,
                    child_pid: child,
                    cols: Arc::new(AtomicU16::new(cols)),
                    rows: Arc::new(AtomicU16::new(rows)),
                    mirror,
                    reader,
                })
            }
        }
    }

    async fn read_loop(master: Arc<AsyncFd<PtyFd>>, mirror: Arc<Mutex<Mirror>>) {
        let mut buf = vec![0u8; 8192];
        loop {
            match read_chunk(&master, &mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let mut state = mirror.lock().unwrap_or_else(|e| e.into_inner());
                    state.screen.feed(&buf[..n]);
                    state.ring.write(&buf[..n]);
                }
                Err(e) if e.raw_os_error() == Some(libc::EIO) => break,
                Err(_) => break,
            }
        }
    }

    /// The child process's PID, for callers that need to signal it directly.
    pub fn child_pid(&self) -> u32 {
        self.child_pid.as_raw() as u32
    }

    // TIOCSWINSZ is a well-defined ioctl; the Winsize value is fully initialized.
    #[allow(unsafe_code)]
    pub fn resize(&self, cols: u16, rows: u16) -> anyhow::Result<()> {
        use std::os::fd::AsRawFd;

        self.cols.store(cols, Ordering::Relaxed);
        self.rows.store(rows, Ordering::Relaxed);
        self.mirror.lock().unwrap_or_else(|e| e.into_inner()).screen.resize(cols, rows);

        let ws = Winsize { ws_col: cols, ws_row: rows, ws_xpixel: 0, ws_ypixel: 0 };
        // SAFETY: see above.
        let ret = unsafe { libc::ioctl(self.master.as_raw_fd(), libc::TIOCSWINSZ, &ws) };
        anyhow::ensure!(ret >= 0, "TIOCSWINSZ ioctl failed: {}", std::io::Error::last_os_error());
        Ok(())
    }

    /// Poll until the child has produced at least one byte of output, or
    /// `timeout` elapses. A simple readiness heuristic: this crate does not
    /// try to recognize the target program's prompt.
    pub async fn wait_for_output(&self, timeout: std::time::Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.mirror.lock().unwrap_or_else(|e| e.into_inner()).screen.seq() > 0 {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }

    fn render_all(&self) -> String {
        let state = self.mirror.lock().unwrap_or_else(|e| e.into_inner());
        let oldest = state.ring.total_written().saturating_sub(RING_CAPACITY as u64);
        let cols = self.cols.load(Ordering::Relaxed);
        match state.ring.read_from(oldest) {
            Some((a, b)) => {
                let mut bytes = Vec::with_capacity(a.len() + b.len());
                bytes.extend_from_slice(a);
                bytes.extend_from_slice(b);
                render_transcript(&bytes, cols)
            }
            None => String::new(),
        }
    }
}

impl PaneDriver for PtyHost {
    fn send_raw<'a>(&'a self, _session: &'a str, token: KeyToken) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            write_all(&self.master, key_bytes(token))
                .await
                .map_err(|e| NudgeError::PaneDriverFailure(e.to_string()))
        })
    }

    fn send_literal<'a>(&'a self, _session: &'a str, text: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            write_all(&self.master, text.as_bytes())
                .await
                .map_err(|e| NudgeError::PaneDriverFailure(e.to_string()))
        })
    }

    fn capture_all<'a>(&'a self, _session: &'a str, _line_hint: usize) -> BoxFuture<'a, String> {
        Box::pin(async move { Ok(self.render_all()) })
    }

    fn capture_window<'a>(&'a self, _session: &'a str, n: usize) -> BoxFuture<'a, String> {
        Box::pin(async move { Ok(last_n_lines(&self.render_all(), n)) })
    }

    fn is_blocked<'a>(&'a self, _session: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            Ok(self.mirror.lock().unwrap_or_else(|e| e.into_inner()).screen.is_alt_screen())
        })
    }

    fn wake<'a>(&'a self, _session: &'a str) -> BoxFuture<'a, ()> {
        // No out-of-process multiplexer sits between us and the pane; there
        // is no disconnected-client channel to redeliver output to.
        Box::pin(async move { Ok(()) })
    }
}

impl Drop for PtyHost {
    fn drop(&mut self) {
        self.reader.abort();
        let _ = kill(self.child_pid, Signal::SIGHUP);
        std::thread::sleep(std::time::Duration::from_millis(50));
        let _ = kill(self.child_pid, Signal::SIGKILL);
        let _ = waitpid(self.child_pid, Some(WaitPidFlag::WNOHANG));
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
