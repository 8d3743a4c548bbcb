// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The only component that touches the outside world.
//!
//! Structural polymorphism over the pane: a small, enumerated method set
//! implemented by an in-process test double ([`ScriptedPaneDriver`]) and a
//! live adapter over a real terminal multiplexer
//! ([`crate::tmux_driver::TmuxPaneDriver`] / [`crate::pty::PtyHost`]).

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use crate::error::NudgeError;

/// Named control tokens accepted by `send_raw`. Any other token is outside
/// this crate's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    CtrlA,
    CtrlK,
    Enter,
    Escape,
    /// Lowercase `i`, used to enter insert mode in a modal editor.
    LowerI,
}

impl KeyToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CtrlA => "C-a",
            Self::CtrlK => "C-k",
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::LowerI => "i",
        }
    }
}

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, NudgeError>> + Send + 'a>>;

/// Placeholder a scripted capture can embed in place of whatever text the
/// next `send_literal` call sends — `ScriptedPaneDriver` splices the actual
/// argument in before returning the capture, so a test doesn't need to know
/// in advance what a randomly generated sentinel will look like.
pub const SENTINEL_PLACEHOLDER: &str = "\u{1}SENTINEL\u{1}";

/// Opaque adapter to the terminal multiplexer. Object-safe for use as
/// `Arc<dyn PaneDriver>`; the set of operations is fixed and does not grow
/// by reflection or by reading the TUI's content.
pub trait PaneDriver: Send + Sync {
    /// Send a named control token. Used for control actions only.
    fn send_raw<'a>(&'a self, session: &'a str, token: KeyToken) -> BoxFuture<'a, ()>;

    /// Send a UTF-8 string as if typed verbatim; the only channel for
    /// arbitrary text.
    fn send_literal<'a>(&'a self, session: &'a str, text: &'a str) -> BoxFuture<'a, ()>;

    /// Pane content joined into logical lines. `line_hint == 0` means all
    /// scrollback.
    fn capture_all<'a>(&'a self, session: &'a str, line_hint: usize) -> BoxFuture<'a, String>;

    /// Exactly the last `n` logical lines.
    fn capture_window<'a>(&'a self, session: &'a str, n: usize) -> BoxFuture<'a, String>;

    /// True if the pane reports a modal state (search, copy-mode, etc).
    fn is_blocked<'a>(&'a self, session: &'a str) -> BoxFuture<'a, bool>;

    /// Idempotent hint to redeliver recent output to disconnected clients.
    fn wake<'a>(&'a self, session: &'a str) -> BoxFuture<'a, ()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentAction {
    Raw(String, KeyToken),
    Literal(String, String),
    Wake(String),
}

#[derive(Default)]
struct ScriptedState {
    /// Full captures, consumed in order by `capture_all`.
    full: VecDeque<String>,
    /// Windowed captures, consumed in order by `capture_window`.
    window: VecDeque<String>,
    blocked: bool,
    log: Vec<SentAction>,
    /// Text from the most recent `send_literal` call, spliced into any
    /// queued capture containing [`SENTINEL_PLACEHOLDER`].
    last_literal: String,
}

/// In-memory test double that replays a fixed sequence of captures per
/// call. Used to unit-test `NudgeProtocol` and its collaborators without a
/// real terminal.
pub struct ScriptedPaneDriver {
    state: Mutex<ScriptedState>,
}

impl ScriptedPaneDriver {
    pub fn new() -> Self {
        Self { state: Mutex::new(ScriptedState::default()) }
    }

    /// Queue the next values `capture_all` will return, one per call.
    pub fn push_full_capture(&self, capture: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).full.push_back(capture.into());
    }

    /// Queue the next values `capture_window` will return, one per call.
    pub fn push_window_capture(&self, capture: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).window.push_back(capture.into());
    }

    pub fn set_blocked(&self, blocked: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).blocked = blocked;
    }

    /// Every `send_raw`/`send_literal`/`wake` call observed so far, in order.
    pub fn log(&self) -> Vec<SentAction> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).log.clone()
    }
}

impl Default for ScriptedPaneDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneDriver for ScriptedPaneDriver {
    fn send_raw<'a>(&'a self, session: &'a str, token: KeyToken) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.log.push(SentAction::Raw(session.to_owned(), token));
            Ok(())
        })
    }

    fn send_literal<'a>(&'a self, session: &'a str, text: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.last_literal = text.to_owned();
            state.log.push(SentAction::Literal(session.to_owned(), text.to_owned()));
            Ok(())
        })
    }

    fn capture_all<'a>(&'a self, _session: &'a str, _line_hint: usize) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let capture = state.full.pop_front().ok_or_else(|| {
                NudgeError::PaneDriverFailure("no scripted full capture left".to_owned())
            })?;
            Ok(capture.replace(SENTINEL_PLACEHOLDER, &state.last_literal))
        })
    }

    fn capture_window<'a>(&'a self, _session: &'a str, _n: usize) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let capture = state.window.pop_front().ok_or_else(|| {
                NudgeError::PaneDriverFailure("no scripted window capture left".to_owned())
            })?;
            Ok(capture.replace(SENTINEL_PLACEHOLDER, &state.last_literal))
        })
    }

    fn is_blocked<'a>(&'a self, _session: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move { Ok(self.state.lock().unwrap_or_else(|e| e.into_inner()).blocked) })
    }

    fn wake<'a>(&'a self, session: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.log.push(SentAction::Wake(session.to_owned()));
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "pane_driver_tests.rs"]
mod tests;
