// ── Camera and photo selection ──
//
// A selection names which cameras a camera-scoped command targets. It is
// carried on the wire as a `CameraSelection` mode string plus a sibling
// field holding the key, key list, or group name.

use std::fmt;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::fields::{self, FieldMap, str_field};
use crate::model::{CameraKey, PhotoKey};

/// Selection mode as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SelectionMode {
    All,
    Single,
    Multiple,
    Group,
}

/// Which cameras a camera-scoped command targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every camera the controller knows.
    #[default]
    All,
    /// Exactly one camera.
    Single(CameraKey),
    /// An explicit list. Order and duplicates are preserved.
    Multiple(Vec<CameraKey>),
    /// Every camera whose `CameraGroup` matches.
    Group(String),
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::All => SelectionMode::All,
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
            Self::Group(_) => SelectionMode::Group,
        }
    }

    /// Write the `CameraSelection` mode and its sibling field into `doc`.
    pub fn encode_into(&self, doc: &mut FieldMap) {
        doc.insert(
            fields::CAMERA_SELECTION.into(),
            Value::String(self.mode().to_string()),
        );
        match self {
            Self::All => {}
            Self::Single(key) => {
                doc.insert(fields::CAMERA_KEY.into(), Value::String(key.to_string()));
            }
            Self::Multiple(keys) => {
                doc.insert(fields::CAMERA_KEYS.into(), string_list(keys));
            }
            Self::Group(group) => {
                doc.insert(fields::CAMERA_GROUP.into(), Value::String(group.clone()));
            }
        }
    }

    /// Read a selection back out of an encoded request.
    pub fn from_fields(doc: &FieldMap) -> Result<Self, CoreError> {
        let mode = parse_mode(doc, fields::CAMERA_SELECTION)?;
        Ok(match mode {
            SelectionMode::All => Self::All,
            SelectionMode::Single => Self::Single(CameraKey::new(required_str(doc, fields::CAMERA_KEY)?)),
            SelectionMode::Multiple => Self::Multiple(
                required_list(doc, fields::CAMERA_KEYS)?
                    .into_iter()
                    .map(CameraKey::new)
                    .collect(),
            ),
            SelectionMode::Group => Self::Group(required_str(doc, fields::CAMERA_GROUP)?.to_owned()),
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all cameras"),
            Self::Single(key) => write!(f, "camera {key}"),
            Self::Multiple(keys) => {
                let keys: Vec<&str> = keys.iter().map(CameraKey::as_str).collect();
                write!(f, "cameras {}", keys.join(", "))
            }
            Self::Group(group) => write!(f, "group {group}"),
        }
    }
}

// ── PhotoSelection ───────────────────────────────────────────────────

/// Which photos a `Download` request targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoSelection {
    #[default]
    All,
    Single(PhotoKey),
    Multiple(Vec<PhotoKey>),
}

impl PhotoSelection {
    pub fn encode_into(&self, doc: &mut FieldMap) {
        let mode = match self {
            Self::All => SelectionMode::All,
            Self::Single(key) => {
                doc.insert(fields::PHOTO_KEY.into(), Value::String(key.to_string()));
                SelectionMode::Single
            }
            Self::Multiple(keys) => {
                doc.insert(fields::PHOTO_KEYS.into(), string_list(keys));
                SelectionMode::Multiple
            }
        };
        doc.insert(fields::PHOTO_SELECTION.into(), Value::String(mode.to_string()));
    }

    pub fn from_fields(doc: &FieldMap) -> Result<Self, CoreError> {
        match parse_mode(doc, fields::PHOTO_SELECTION)? {
            SelectionMode::All => Ok(Self::All),
            SelectionMode::Single => Ok(Self::Single(PhotoKey::new(required_str(doc, fields::PHOTO_KEY)?))),
            SelectionMode::Multiple => Ok(Self::Multiple(
                required_list(doc, fields::PHOTO_KEYS)?
                    .into_iter()
                    .map(PhotoKey::new)
                    .collect(),
            )),
            SelectionMode::Group => Err(CoreError::malformed(
                "request",
                "photos cannot be selected by group",
            )),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn string_list<T: fmt::Display>(keys: &[T]) -> Value {
    Value::Array(keys.iter().map(|k| Value::String(k.to_string())).collect())
}

fn parse_mode(doc: &FieldMap, field: &str) -> Result<SelectionMode, CoreError> {
    let raw = required_str(doc, field)?;
    raw.parse()
        .map_err(|_| CoreError::malformed("request", format!("unknown {field} mode '{raw}'")))
}

fn required_str<'a>(doc: &'a FieldMap, field: &str) -> Result<&'a str, CoreError> {
    str_field(doc, field)
        .ok_or_else(|| CoreError::malformed("request", format!("missing string {field}")))
}

fn required_list<'a>(doc: &'a FieldMap, field: &str) -> Result<Vec<&'a str>, CoreError> {
    doc.get(field)
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .ok_or_else(|| CoreError::malformed("request", format!("{field} is not a list of strings")))
}
