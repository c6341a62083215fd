use serde::Serialize;
use serde_json::Value;

use super::fields::{self, FieldMap, str_field};
use super::keys::{CameraKey, PhotoKey};

/// Accumulated state of one captured photo. All fields merge shallowly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRecord {
    #[serde(skip)]
    key: PhotoKey,
    #[serde(flatten)]
    fields: FieldMap,
}

impl PhotoRecord {
    pub fn new(key: PhotoKey) -> Self {
        Self {
            key,
            fields: FieldMap::new(),
        }
    }

    pub fn merge(&mut self, update: &FieldMap) {
        for (name, value) in update {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    pub fn key(&self) -> &PhotoKey {
        &self.key
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Camera that captured this photo.
    pub fn camera_key(&self) -> Option<CameraKey> {
        str_field(&self.fields, fields::CAMERA_KEY).map(CameraKey::new)
    }

    pub fn filename(&self) -> Option<&str> {
        str_field(&self.fields, fields::PHOTO_FILENAME)
    }

    pub fn location(&self) -> Option<&str> {
        str_field(&self.fields, fields::PHOTO_LOCATION)
    }

    pub fn origin(&self) -> Option<&str> {
        str_field(&self.fields, fields::PHOTO_ORIGIN)
    }
}

pub(crate) fn validate_photo_update(update: &FieldMap) -> Result<PhotoKey, String> {
    str_field(update, fields::PHOTO_KEY)
        .map(PhotoKey::new)
        .ok_or_else(|| format!("photo entry has no string {}", fields::PHOTO_KEY))
}
