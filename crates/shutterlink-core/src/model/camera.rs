use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use super::fields::{self, FieldMap, str_field};
use super::keys::CameraKey;

/// Connection status as reported in `CameraStatus`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CameraStatus {
    Ready,
    Busy,
    Disconnected,
    /// Missing or unrecognised status string.
    Unknown,
}

impl CameraStatus {
    /// A camera accepts commands only while `Ready` or `Busy`.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Ready | Self::Busy)
    }

    fn from_field(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Unknown)
    }
}

// ── PropertyInfo ─────────────────────────────────────────────────────

/// One entry of a camera's `CameraPropertyInfo` list, keyed by its
/// `CameraPropertyType`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyInfo(FieldMap);

impl PropertyInfo {
    pub fn property_type(&self) -> Option<&str> {
        str_field(&self.0, fields::CAMERA_PROPERTY_TYPE)
    }

    /// Current value (`CameraPropertyValue`).
    pub fn value(&self) -> Option<&Value> {
        self.0.get(fields::CAMERA_PROPERTY_VALUE)
    }

    /// Allowed values (`CameraPropertyRange`), if the camera reports one.
    pub fn range(&self) -> Option<&Value> {
        self.0.get(fields::CAMERA_PROPERTY_RANGE)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.0
    }

    fn merge(&mut self, update: &FieldMap) {
        for (name, value) in update {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

// ── CameraRecord ─────────────────────────────────────────────────────

/// Accumulated state of one camera.
///
/// Top-level fields merge shallowly (last write wins per field). The
/// `CameraPropertyInfo` list is merged one level deeper: each entry is
/// matched by `CameraPropertyType` and its fields are merged into the
/// stored entry, so a partial update to one property leaves the other
/// properties and the other fields of that property intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraRecord {
    #[serde(skip)]
    key: CameraKey,
    #[serde(flatten)]
    fields: FieldMap,
    #[serde(
        rename = "CameraPropertyInfo",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    properties: IndexMap<String, PropertyInfo>,
}

impl CameraRecord {
    pub fn new(key: CameraKey) -> Self {
        Self {
            key,
            fields: FieldMap::new(),
            properties: IndexMap::new(),
        }
    }

    /// Merge a camera update into this record.
    ///
    /// Callers validate the update first (see [`validate_camera_update`]);
    /// property entries without a type are ignored here.
    pub fn merge(&mut self, update: &FieldMap) {
        for (name, value) in update {
            if name == fields::CAMERA_PROPERTY_INFO {
                self.merge_properties(value);
            } else {
                self.fields.insert(name.clone(), value.clone());
            }
        }
    }

    fn merge_properties(&mut self, value: &Value) {
        let Some(entries) = value.as_array() else {
            return;
        };
        for entry in entries.iter().filter_map(Value::as_object) {
            if let Some(property_type) = str_field(entry, fields::CAMERA_PROPERTY_TYPE) {
                self.properties
                    .entry(property_type.to_owned())
                    .or_default()
                    .merge(entry);
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn key(&self) -> &CameraKey {
        &self.key
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn status(&self) -> CameraStatus {
        CameraStatus::from_field(str_field(&self.fields, fields::CAMERA_STATUS))
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    pub fn group(&self) -> Option<&str> {
        str_field(&self.fields, fields::CAMERA_GROUP)
    }

    pub fn make(&self) -> Option<&str> {
        str_field(&self.fields, fields::CAMERA_MAKE)
    }

    pub fn model(&self) -> Option<&str> {
        str_field(&self.fields, fields::CAMERA_MODEL)
    }

    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, fields::CAMERA_NAME)
    }

    pub fn serial_number(&self) -> Option<&str> {
        str_field(&self.fields, fields::CAMERA_SERIAL_NUMBER)
    }

    /// `false` when the camera never reported a live-view flag.
    pub fn liveview_enabled(&self) -> bool {
        self.fields
            .get(fields::CAMERA_LIVEVIEW_ENABLED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn liveview_frame_num(&self) -> Option<u64> {
        self.fields
            .get(fields::CAMERA_LIVEVIEW_FRAME_NUM)
            .and_then(Value::as_u64)
    }

    pub fn property(&self, property_type: &str) -> Option<&PropertyInfo> {
        self.properties.get(property_type)
    }

    /// Property entries in the order they were first reported.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyInfo)> {
        self.properties.iter().map(|(ty, info)| (ty.as_str(), info))
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Check the shape of a camera update and extract its key.
///
/// The update must carry a string `CameraKey`. If it carries
/// `CameraPropertyInfo`, that must be a list of objects, each with a
/// string `CameraPropertyType`.
pub(crate) fn validate_camera_update(update: &FieldMap) -> Result<CameraKey, String> {
    let key = str_field(update, fields::CAMERA_KEY)
        .ok_or_else(|| format!("camera entry has no string {}", fields::CAMERA_KEY))?;

    if let Some(info) = update.get(fields::CAMERA_PROPERTY_INFO) {
        let entries = info
            .as_array()
            .ok_or_else(|| format!("{} of camera {key} is not a list", fields::CAMERA_PROPERTY_INFO))?;
        for entry in entries {
            let typed = entry
                .as_object()
                .and_then(|obj| str_field(obj, fields::CAMERA_PROPERTY_TYPE))
                .is_some();
            if !typed {
                return Err(format!(
                    "property entry of camera {key} has no string {}",
                    fields::CAMERA_PROPERTY_TYPE
                ));
            }
        }
    }

    Ok(CameraKey::new(key))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> FieldMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn property_info_merges_by_type() {
        let mut camera = CameraRecord::new(CameraKey::new("d1"));
        camera.merge(&map(json!({
            "CameraKey": "d1",
            "CameraPropertyInfo": [
                {"CameraPropertyType": "ISO", "CameraPropertyValue": "100", "CameraPropertyRange": ["100", "200", "400"]},
                {"CameraPropertyType": "Aperture", "CameraPropertyValue": "f/8"}
            ]
        })));
        camera.merge(&map(json!({
            "CameraKey": "d1",
            "CameraPropertyInfo": [{"CameraPropertyType": "ISO", "CameraPropertyValue": "400"}]
        })));

        let iso = camera.property("ISO").unwrap();
        assert_eq!(iso.value(), Some(&json!("400")));
        assert_eq!(iso.range(), Some(&json!(["100", "200", "400"])));
        assert_eq!(
            camera.property("Aperture").unwrap().value(),
            Some(&json!("f/8"))
        );
    }

    #[test]
    fn status_drives_connectivity() {
        let mut camera = CameraRecord::new(CameraKey::new("d1"));
        assert_eq!(camera.status(), CameraStatus::Unknown);
        assert!(!camera.is_connected());

        camera.merge(&map(json!({"CameraStatus": "Busy"})));
        assert!(camera.is_connected());

        camera.merge(&map(json!({"CameraStatus": "Disconnected"})));
        assert!(!camera.is_connected());

        camera.merge(&map(json!({"CameraStatus": "Sleeping"})));
        assert_eq!(camera.status(), CameraStatus::Unknown);
    }

    #[test]
    fn serializes_flat_with_property_list() {
        let mut camera = CameraRecord::new(CameraKey::new("d1"));
        camera.merge(&map(json!({
            "CameraKey": "d1",
            "CameraPropertyInfo": [{"CameraPropertyType": "ISO", "CameraPropertyValue": "100"}]
        })));
        let value = serde_json::to_value(&camera).unwrap();
        assert_eq!(
            value,
            json!({
                "CameraKey": "d1",
                "CameraPropertyInfo": {"ISO": {"CameraPropertyType": "ISO", "CameraPropertyValue": "100"}}
            })
        );
    }

    #[test]
    fn validation_rejects_untyped_property_entries() {
        let err = validate_camera_update(&map(json!({
            "CameraKey": "d1",
            "CameraPropertyInfo": [{"CameraPropertyValue": "100"}]
        })))
        .unwrap_err();
        assert!(err.contains("CameraPropertyType"), "got: {err}");

        assert!(validate_camera_update(&map(json!({"CameraStatus": "Ready"}))).is_err());
    }
}
