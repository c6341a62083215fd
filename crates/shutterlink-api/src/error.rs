use thiserror::Error;

/// Top-level error type for the `shutterlink-api` crate.
///
/// Covers every failure mode of the two channels a session talks over:
/// the request/reply channel and the event subscription.
/// `shutterlink-core` treats all of these as fatal for the session.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoints ───────────────────────────────────────────────────
    /// Endpoint string could not be parsed.
    #[error("Invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Endpoint parsed but uses a scheme the socket layer cannot dial.
    #[error("Unsupported endpoint '{endpoint}': expected tcp:// or ipc://")]
    UnsupportedEndpoint { endpoint: String },

    // ── Sockets ─────────────────────────────────────────────────────
    /// ZeroMQ socket failure (connect, send, or receive).
    #[error("Socket error: {0}")]
    Socket(#[from] zeromq::ZmqError),

    /// One side of a channel was dropped while the other still needed it.
    #[error("{channel} channel closed")]
    ChannelClosed { channel: &'static str },

    // ── Liveness ────────────────────────────────────────────────────
    /// The remote controller process has exited.
    #[error("Remote controller is no longer running")]
    RemoteGone,

    /// The session was asked to stop while blocked on the transport.
    #[error("Transport cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` if the remote side is gone rather than misbehaving.
    pub fn is_remote_gone(&self) -> bool {
        matches!(
            self,
            Self::RemoteGone | Self::ChannelClosed { .. } | Self::Cancelled
        )
    }
}
