//! Polling chat view
//!
//! One tokio task per open room. Every [`POLL_INTERVAL`] it fetches the last
//! [`HISTORY_LIMIT`] messages and replaces the visible list only when the id
//! of the newest message changed, or the list is still empty. Subscribers
//! watch a [`tokio::sync::watch`] channel and wake only on real changes.
//!
//! Errors are logged and the next tick tries again. There is no backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use academy_common::api::types::ChatMessage;

use crate::error::{ClientError, Result};

pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const HISTORY_LIMIT: i64 = 50;

/// Where the poller reads and writes messages
#[async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    /// Last `limit` messages of `room`, oldest first
    async fn fetch_recent(&self, room: &str, limit: i64) -> Result<Vec<ChatMessage>>;

    async fn send(&self, room: &str, author: &str, body: &str) -> Result<ChatMessage>;
}

/// What a chat window shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    room: String,
    messages: Vec<ChatMessage>,
    last_seen_id: Option<String>,
}

impl ChatView {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            ..Self::default()
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_seen_id(&self) -> Option<&str> {
        self.last_seen_id.as_deref()
    }

    /// Apply one poll result; returns true if the list was replaced
    pub fn apply_poll(&mut self, fetched: Vec<ChatMessage>) -> bool {
        let newest = fetched.last().map(|m| m.id.clone());
        if newest == self.last_seen_id && !self.messages.is_empty() {
            return false;
        }
        if fetched.is_empty() && self.messages.is_empty() {
            return false;
        }
        self.last_seen_id = newest;
        self.messages = fetched;
        true
    }

    /// Point the view at another room, forgetting everything seen so far
    pub fn switch_room(&mut self, room: impl Into<String>) {
        self.room = room.into();
        self.messages.clear();
        self.last_seen_id = None;
    }
}

#[derive(Debug)]
enum Command {
    Send { author: String, body: String },
    SwitchRoom(String),
}

/// Handle to a running poll task
///
/// Dropping the handle stops the task.
pub struct ChatPoller {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<ChatView>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    _guard: DropGuard,
}

impl ChatPoller {
    /// Start polling `room` at the standard interval
    pub fn spawn<T: ChatTransport>(transport: Arc<T>, room: impl Into<String>) -> Self {
        Self::spawn_with_interval(transport, room, POLL_INTERVAL)
    }

    pub fn spawn_with_interval<T: ChatTransport>(
        transport: Arc<T>,
        room: impl Into<String>,
        period: Duration,
    ) -> Self {
        let room = room.into();
        let (view_tx, view_rx) = watch::channel(ChatView::new(room.clone()));
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run(
            transport,
            room,
            period,
            view_tx,
            cmd_rx,
            cancel.clone(),
        ));

        Self {
            commands: cmd_tx,
            view: view_rx,
            _guard: cancel.clone().drop_guard(),
            cancel,
            handle,
        }
    }

    /// Receiver that wakes whenever the visible list is replaced
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.view.clone()
    }

    /// Snapshot of the current view
    pub fn view(&self) -> ChatView {
        self.view.borrow().clone()
    }

    /// Queue a message; the poller posts it and re-fetches right away
    pub async fn send(&self, author: impl Into<String>, body: impl Into<String>) -> Result<()> {
        self.commands
            .send(Command::Send {
                author: author.into(),
                body: body.into(),
            })
            .await
            .map_err(|_| ClientError::PollerStopped)
    }

    pub async fn switch_room(&self, room: impl Into<String>) -> Result<()> {
        self.commands
            .send(Command::SwitchRoom(room.into()))
            .await
            .map_err(|_| ClientError::PollerStopped)
    }

    /// Cancel the timer and wait for the task to finish
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!("Chat poller task ended abnormally: {}", e);
        }
    }
}

async fn run<T: ChatTransport>(
    transport: Arc<T>,
    mut room: String,
    period: Duration,
    view_tx: watch::Sender<ChatView>,
    mut commands: mpsc::Receiver<Command>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            command = commands.recv() => match command {
                Some(Command::Send { author, body }) => {
                    if let Err(e) = transport.send(&room, &author, &body).await {
                        warn!(room = %room, "Chat send failed: {}", e);
                    }
                    refresh(transport.as_ref(), &room, &view_tx).await;
                }
                Some(Command::SwitchRoom(next)) => {
                    debug!(from = %room, to = %next, "Switching chat room");
                    room = next;
                    view_tx.send_modify(|view| view.switch_room(room.clone()));
                    refresh(transport.as_ref(), &room, &view_tx).await;
                    ticker.reset();
                }
                None => break,
            },

            _ = ticker.tick() => refresh(transport.as_ref(), &room, &view_tx).await,
        }
    }

    debug!(room = %room, "Chat poller stopped");
}

async fn refresh<T: ChatTransport>(transport: &T, room: &str, view_tx: &watch::Sender<ChatView>) {
    match transport.fetch_recent(room, HISTORY_LIMIT).await {
        Ok(messages) => {
            let changed = view_tx.send_if_modified(|view| view.apply_poll(messages));
            if changed {
                debug!(room, "Chat view updated");
            }
        }
        Err(e) => warn!(room, "Chat poll failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(id: &str, seq: i64) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            seq,
            room_id: "room".to_string(),
            author: "Coach T".to_string(),
            body: format!("message {}", seq),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_poll_fills_empty_view() {
        let mut view = ChatView::new("general");
        assert!(view.apply_poll(vec![message("a", 1)]));
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.last_seen_id(), Some("a"));
    }

    #[test]
    fn test_same_last_id_does_not_replace() {
        let mut view = ChatView::new("general");
        view.apply_poll(vec![message("a", 1), message("b", 2)]);

        // Same newest id, even with different history, is not a change
        assert!(!view.apply_poll(vec![message("b", 2)]));
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn test_new_last_id_replaces() {
        let mut view = ChatView::new("general");
        view.apply_poll(vec![message("a", 1)]);
        assert!(view.apply_poll(vec![message("a", 1), message("c", 3)]));
        assert_eq!(view.last_seen_id(), Some("c"));
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn test_empty_polls_on_empty_view_are_not_changes() {
        let mut view = ChatView::new("general");
        assert!(!view.apply_poll(vec![]));
    }

    #[test]
    fn test_switch_room_resets() {
        let mut view = ChatView::new("general");
        view.apply_poll(vec![message("a", 1)]);
        view.switch_room("parents");
        assert_eq!(view.room(), "parents");
        assert!(view.messages().is_empty());
        assert_eq!(view.last_seen_id(), None);
    }
}
