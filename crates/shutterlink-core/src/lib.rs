//! Client-side session layer for a networked camera controller.
//!
//! - **[`Session`]** drives one conversation with a controller over any
//!   [`Transport`](shutterlink_api::Transport): it sends [`Command`]s as
//!   sequence-numbered requests, drains pending events before each reply
//!   is read, and offers timed and per-camera condition waits.
//!
//! - **[`StateStore`]** accumulates camera and photo records from
//!   `Synchronise` snapshots and `CameraUpdated` / `PhotoUpdated` events.
//!   Camera property info is merged per property type.
//!
//! - **[`Selection`]** names the cameras a camera-scoped command targets;
//!   [`resolve`] turns it into camera keys and picks the camera that
//!   single-camera reads go to.
//!
//! - **[`protocol`]** builds request documents and decodes replies and
//!   events.

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod resolve;
pub mod selection;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, MsgId};
pub use config::SessionConfig;
pub use error::CoreError;
pub use model::{CameraKey, CameraRecord, CameraStatus, FieldMap, PhotoKey, PhotoRecord, PropertyInfo};
pub use protocol::{Event, EventBody, Reply, ReplyBody};
pub use selection::{PhotoSelection, Selection, SelectionMode};
pub use session::{Session, WaitReport};
pub use store::StateStore;
