// ── Command API ──
//
// Every request a session can send is a `Command` variant. The message
// builder turns a command plus the session's current camera selection
// into a wire document; camera-scoped commands carry the selection,
// the rest do not.

use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::model::fields::{self, FieldMap};
use crate::selection::PhotoSelection;

/// Request identifiers (`msg_id`) understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum MsgId {
    Synchronise,
    SetConfig,
    Connect,
    Disconnect,
    Shoot,
    Autofocus,
    SetProperty,
    EnableLiveview,
    DisableLiveview,
    Download,
    SetSequenceNum,
    SetBatchNum,
    SetOptions,
    DeactivateLicense,
}

/// All requests a session can issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Session ──────────────────────────────────────────────────────
    /// Ask for a full snapshot of cameras and photos.
    Synchronise,
    /// Set a controller configuration key.
    SetConfig { key: String, value: Value },

    // ── Camera-scoped ────────────────────────────────────────────────
    Connect,
    Disconnect,
    Shoot {
        /// Bulb exposure length in seconds.
        bulb_timer: Option<u32>,
        /// Tag echoed back on the resulting photos.
        origin: Option<String>,
    },
    Autofocus,
    SetProperty { property: String, value: String },
    EnableLiveview,
    DisableLiveview,

    // ── Photos ───────────────────────────────────────────────────────
    Download { photos: PhotoSelection },

    // ── Capture grid / options ───────────────────────────────────────
    SetSequenceNum(u32),
    SetBatchNum(u32),
    SetUniqueTag(String),

    // ── Licensing ────────────────────────────────────────────────────
    DeactivateLicense,
}

impl Command {
    pub fn msg_id(&self) -> MsgId {
        match self {
            Self::Synchronise => MsgId::Synchronise,
            Self::SetConfig { .. } => MsgId::SetConfig,
            Self::Connect => MsgId::Connect,
            Self::Disconnect => MsgId::Disconnect,
            Self::Shoot { .. } => MsgId::Shoot,
            Self::Autofocus => MsgId::Autofocus,
            Self::SetProperty { .. } => MsgId::SetProperty,
            Self::EnableLiveview => MsgId::EnableLiveview,
            Self::DisableLiveview => MsgId::DisableLiveview,
            Self::Download { .. } => MsgId::Download,
            Self::SetSequenceNum(_) => MsgId::SetSequenceNum,
            Self::SetBatchNum(_) => MsgId::SetBatchNum,
            Self::SetUniqueTag(_) => MsgId::SetOptions,
            Self::DeactivateLicense => MsgId::DeactivateLicense,
        }
    }

    /// Camera-scoped commands carry the session's camera selection.
    pub fn is_camera_scoped(&self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Disconnect
                | Self::Shoot { .. }
                | Self::Autofocus
                | Self::SetProperty { .. }
                | Self::EnableLiveview
                | Self::DisableLiveview
        )
    }

    /// Write the command's own parameters into `doc`.
    pub(crate) fn encode_params(&self, doc: &mut FieldMap) {
        match self {
            Self::SetConfig { key, value } => {
                doc.insert(fields::CONFIG_KEY.into(), Value::String(key.clone()));
                doc.insert(fields::CONFIG_VALUE.into(), value.clone());
            }
            Self::Shoot { bulb_timer, origin } => {
                if let Some(seconds) = bulb_timer {
                    doc.insert(fields::CAMERA_BULB_TIMER.into(), Value::from(*seconds));
                }
                if let Some(origin) = origin {
                    doc.insert(fields::PHOTO_ORIGIN.into(), Value::String(origin.clone()));
                }
            }
            Self::SetProperty { property, value } => {
                doc.insert(fields::CAMERA_PROPERTY_TYPE.into(), Value::String(property.clone()));
                doc.insert(fields::CAMERA_PROPERTY_VALUE.into(), Value::String(value.clone()));
            }
            Self::Download { photos } => photos.encode_into(doc),
            Self::SetSequenceNum(num) => {
                doc.insert(fields::GRID_SEQUENCE_NUM.into(), Value::from(*num));
            }
            Self::SetBatchNum(num) => {
                doc.insert(fields::GRID_BATCH_NUM.into(), Value::from(*num));
            }
            Self::SetUniqueTag(tag) => {
                doc.insert(fields::GRID_UNIQUE_TAG.into(), Value::String(tag.clone()));
            }
            Self::Synchronise
            | Self::Connect
            | Self::Disconnect
            | Self::Autofocus
            | Self::EnableLiveview
            | Self::DisableLiveview
            | Self::DeactivateLicense => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_tag_is_sent_as_set_options() {
        assert_eq!(Command::SetUniqueTag("x".into()).msg_id().as_ref(), "SetOptions");
    }

    #[test]
    fn only_camera_commands_are_scoped() {
        assert!(Command::Autofocus.is_camera_scoped());
        assert!(!Command::Synchronise.is_camera_scoped());
        assert!(!Command::Download { photos: PhotoSelection::All }.is_camera_scoped());
        assert!(!Command::DeactivateLicense.is_camera_scoped());
    }
}
