//! ZeroMQ socket-pair transport.
//!
//! Talks to a controller over a REQ socket (commands) and a SUB socket
//! (events). The SUB side is drained by a background task into an
//! unbounded channel, which is what makes
//! [`try_receive_event`](crate::Transport::try_receive_event) non-blocking.
//!
//! # Example
//!
//! ```rust,ignore
//! use shutterlink_api::{Endpoints, Transport, ZmqTransport};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let mut transport = ZmqTransport::connect(&Endpoints::localhost()?, &cancel).await?;
//!
//! transport.send_request(r#"{"msg_type":"Request","msg_id":"Synchronise","msg_seq_num":0}"#.into()).await?;
//! let reply = transport.receive_reply().await?;
//!
//! while let Some(event) = transport.try_receive_event()? {
//!     println!("{}", String::from_utf8_lossy(&event));
//! }
//! ```

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, SubSocket, ZmqMessage};

use crate::error::Error;
use crate::transport::{Endpoints, Transport};

// ── ZmqTransport ─────────────────────────────────────────────────────

/// REQ + SUB socket pair connected to a controller.
///
/// Dropping the transport stops the event pump.
pub struct ZmqTransport {
    req: ReqSocket,
    events: mpsc::UnboundedReceiver<Bytes>,
    cancel: CancellationToken,
    pump: JoinHandle<()>,
}

impl ZmqTransport {
    /// Connect both sockets and spawn the event pump.
    ///
    /// `cancel` is the session-wide stop signal (e.g. Ctrl-C). Cancelling it
    /// flips [`is_alive`](Transport::is_alive) to `false` and aborts any
    /// pending reply wait.
    pub async fn connect(endpoints: &Endpoints, cancel: &CancellationToken) -> Result<Self, Error> {
        let mut req = ReqSocket::new();
        req.connect(endpoints.reqrep.as_str()).await?;
        tracing::debug!(endpoint = %endpoints.reqrep, "request socket connected");

        let mut sub = SubSocket::new();
        sub.connect(endpoints.publisher.as_str()).await?;
        sub.subscribe("").await?;
        tracing::debug!(endpoint = %endpoints.publisher, "subscriber socket connected");

        let (event_tx, events) = mpsc::unbounded_channel();
        let cancel = cancel.child_token();
        let pump = tokio::spawn(event_pump(sub, event_tx, cancel.clone()));

        Ok(Self {
            req,
            events,
            cancel,
            pump,
        })
    }
}

impl Transport for ZmqTransport {
    async fn send_request(&mut self, payload: Bytes) -> Result<(), Error> {
        self.req.send(ZmqMessage::from(payload)).await?;
        Ok(())
    }

    async fn receive_reply(&mut self) -> Result<Bytes, Error> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            reply = self.req.recv() => Ok(flatten(reply?)),
        }
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
        !self.cancel.is_cancelled() && !self.pump.is_finished()
    }
}

impl Drop for ZmqTransport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background event pump ────────────────────────────────────────────

/// Forward every published message into `event_tx` until cancelled,
/// the subscription fails, or the receiving transport is dropped.
async fn event_pump(
    mut sub: SubSocket,
    event_tx: mpsc::UnboundedSender<Bytes>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            message = sub.recv() => {
                match message {
                    Ok(message) => {
                        if event_tx.send(flatten(message)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "event subscription failed");
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("event pump exiting");
}

/// Join a (possibly multipart) message into one payload.
fn flatten(message: ZmqMessage) -> Bytes {
    let mut frames = message.into_vec();
    if frames.len() == 1 {
        return frames.swap_remove(0);
    }
    Bytes::from(frames.concat())
}
