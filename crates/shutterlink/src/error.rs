//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use shutterlink_config::ConfigError;
use shutterlink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {endpoint}")]
    #[diagnostic(
        code(shutterlink::connection_failed),
        help(
            "Check that the controller is running and its endpoints are enabled.\n\
             Endpoint: {endpoint}\n\
             Override with --reqrep / --publisher or a profile."
        )
    )]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Lost the controller: {reason}")]
    #[diagnostic(
        code(shutterlink::controller_gone),
        help("The controller exited or the link failed. Restart it and try again.")
    )]
    ControllerGone { reason: String },

    // ── Controller replies ───────────────────────────────────────────
    #[error("Controller rejected {command}: {detail}")]
    #[diagnostic(code(shutterlink::rejected))]
    Rejected { command: String, detail: String },

    #[error("Controller sent a malformed message: {reason}")]
    #[diagnostic(
        code(shutterlink::protocol),
        help("The controller may speak a different protocol revision.")
    )]
    Protocol { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shutterlink::not_found),
        help("Run: shutterlink {list_command} to see what the controller knows")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No connected camera matches {selection}")]
    #[diagnostic(
        code(shutterlink::no_camera),
        help("Run: shutterlink ls to see camera status, or pick one with --camera")
    )]
    NoCamera { selection: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shutterlink::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shutterlink::confirmation_required),
        help("Pass --yes (-y) to go ahead.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shutterlink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create a config with: shutterlink config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(shutterlink::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ControllerGone { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::NoCamera { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedPayload { .. } => CliError::Protocol {
                reason: err.to_string(),
            },

            CoreError::ControllerGone
            | CoreError::TransportFailed { .. }
            | CoreError::Cancelled
            | CoreError::SessionTerminated { .. } => CliError::ControllerGone {
                reason: err.to_string(),
            },

            CoreError::CameraNotFound { key } => CliError::NotFound {
                resource_type: "camera".into(),
                identifier: key,
                list_command: "ls".into(),
            },

            CoreError::PhotoNotFound { key } => CliError::NotFound {
                resource_type: "photo".into(),
                identifier: key,
                list_command: "photos".into(),
            },

            CoreError::PropertyNotFound { camera, property } => CliError::NotFound {
                resource_type: "property".into(),
                identifier: format!("{property} on {camera}"),
                list_command: "ls -o json".into(),
            },

            CoreError::NoActiveCamera { selection } => CliError::NoCamera { selection },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
