// ── Core error types ──
//
// User-facing errors from shutterlink-core. Socket-level failures from
// `shutterlink_api` are translated into session-level variants by the
// `From` impl below; callers never match on transport internals.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fatal: the session cannot continue ───────────────────────────
    #[error("Camera controller is no longer running")]
    ControllerGone,

    #[error("Transport failure: {message}")]
    TransportFailed { message: String },

    #[error("Malformed {source_kind} payload: {reason}")]
    MalformedPayload {
        source_kind: &'static str,
        reason: String,
    },

    #[error("Session was stopped")]
    Cancelled,

    #[error("Session terminated earlier: {reason}")]
    SessionTerminated { reason: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Camera not found: {key}")]
    CameraNotFound { key: String },

    #[error("Photo not found: {key}")]
    PhotoNotFound { key: String },

    #[error("Property {property} not reported by camera {camera}")]
    PropertyNotFound { camera: String, property: String },

    #[error("No connected camera matches the current selection ({selection})")]
    NoActiveCamera { selection: String },
}

impl CoreError {
    /// Fatal errors poison the session: every later operation fails with
    /// [`CoreError::SessionTerminated`].
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ControllerGone
                | Self::TransportFailed { .. }
                | Self::MalformedPayload { .. }
                | Self::Cancelled
                | Self::SessionTerminated { .. }
        )
    }

    pub(crate) fn malformed(source_kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            source_kind,
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shutterlink_api::Error> for CoreError {
    fn from(err: shutterlink_api::Error) -> Self {
        match err {
            shutterlink_api::Error::RemoteGone | shutterlink_api::Error::ChannelClosed { .. } => {
                CoreError::ControllerGone
            }
            shutterlink_api::Error::Cancelled => CoreError::Cancelled,
            other => CoreError::TransportFailed {
                message: other.to_string(),
            },
        }
    }
}
