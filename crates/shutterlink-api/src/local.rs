//! In-process transport pair.
//!
//! [`local_pair`] returns a [`LocalTransport`] for the session and a
//! [`LocalRemote`] that plays the controller: it reads requests, answers
//! them, publishes events, and can declare itself dead. Used when the
//! controller is embedded in the same process, and by tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::Error;
use crate::transport::Transport;

/// Create a connected transport / remote pair.
pub fn local_pair() -> (LocalTransport, LocalRemote) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let alive = Arc::new(AtomicBool::new(true));

    let transport = LocalTransport {
        requests: request_tx,
        replies: reply_rx,
        events: event_rx,
        alive: Arc::clone(&alive),
    };
    let remote = LocalRemote {
        requests: request_rx,
        replies: reply_tx,
        events: event_tx,
        alive,
    };
    (transport, remote)
}

// ── Session side ─────────────────────────────────────────────────────

/// Session half of an in-process pair.
#[derive(Debug)]
pub struct LocalTransport {
    requests: mpsc::UnboundedSender<Bytes>,
    replies: mpsc::UnboundedReceiver<Bytes>,
    events: mpsc::UnboundedReceiver<Bytes>,
    alive: Arc<AtomicBool>,
}

impl Transport for LocalTransport {
    async fn send_request(&mut self, payload: Bytes) -> Result<(), Error> {
        self.requests
            .send(payload)
            .map_err(|_| Error::ChannelClosed { channel: "request" })
    }

    async fn receive_reply(&mut self) -> Result<Bytes, Error> {
        self.replies
            .recv()
            .await
            .ok_or(Error::ChannelClosed { channel: "reply" })
    }

    fn try_receive_event(&mut self) -> Result<Option<Bytes>, Error> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(Error::ChannelClosed { channel: "event" })
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

// ── Controller side ──────────────────────────────────────────────────

/// Controller half of an in-process pair.
#[derive(Debug)]
pub struct LocalRemote {
    requests: mpsc::UnboundedReceiver<Bytes>,
    replies: mpsc::UnboundedSender<Bytes>,
    events: mpsc::UnboundedSender<Bytes>,
    alive: Arc<AtomicBool>,
}

impl LocalRemote {
    /// Wait for the next request. `None` once the session is dropped.
    pub async fn next_request(&mut self) -> Option<Bytes> {
        self.requests.recv().await
    }

    /// Take a request if one has already been sent.
    pub fn try_next_request(&mut self) -> Option<Bytes> {
        self.requests.try_recv().ok()
    }

    /// Queue a reply. Replies are delivered in the order they are queued.
    pub fn reply(&self, payload: impl Into<Bytes>) -> Result<(), Error> {
        self.replies
            .send(payload.into())
            .map_err(|_| Error::ChannelClosed { channel: "reply" })
    }

    /// Publish an event to the session.
    pub fn publish(&self, payload: impl Into<Bytes>) -> Result<(), Error> {
        self.events
            .send(payload.into())
            .map_err(|_| Error::ChannelClosed { channel: "event" })
    }

    /// Mark the controller as exited. The session sees this on its next
    /// liveness check.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// A cloneable publisher for driving events from another task.
    pub fn publisher(&self) -> LocalPublisher {
        LocalPublisher {
            events: self.events.clone(),
            alive: Arc::clone(&self.alive),
        }
    }
}

/// Event-only handle onto a [`LocalRemote`].
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    events: mpsc::UnboundedSender<Bytes>,
    alive: Arc<AtomicBool>,
}

impl LocalPublisher {
    pub fn publish(&self, payload: impl Into<Bytes>) -> Result<(), Error> {
        self.events
            .send(payload.into())
            .map_err(|_| Error::ChannelClosed { channel: "event" })
    }

    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
    }
}
