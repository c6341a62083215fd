//! Wire field names and the open field-map type.

use serde_json::Value;

/// Insertion-ordered mapping of field name to arbitrary JSON value.
pub type FieldMap = serde_json::Map<String, Value>;

// ── Envelope ─────────────────────────────────────────────────────────
pub const MSG_TYPE: &str = "msg_type";
pub const MSG_ID: &str = "msg_id";
pub const MSG_SEQ_NUM: &str = "msg_seq_num";
pub const MSG_RESULT: &str = "msg_result";
pub const MSG_USER_STRING: &str = "msg_user_string";

// ── Camera ───────────────────────────────────────────────────────────
pub const CAMERA_KEY: &str = "CameraKey";
pub const CAMERA_KEYS: &str = "CameraKeys";
pub const CAMERA_GROUP: &str = "CameraGroup";
pub const CAMERA_SELECTION: &str = "CameraSelection";
pub const CAMERA_STATUS: &str = "CameraStatus";
pub const CAMERA_MAKE: &str = "CameraMake";
pub const CAMERA_MODEL: &str = "CameraModel";
pub const CAMERA_NAME: &str = "CameraName";
pub const CAMERA_SERIAL_NUMBER: &str = "CameraSerialNumber";
pub const CAMERA_LIVEVIEW_ENABLED: &str = "CameraLiveviewIsEnabled";
pub const CAMERA_LIVEVIEW_FRAME_NUM: &str = "CameraLiveviewFrameNum";
pub const CAMERA_PROPERTY_INFO: &str = "CameraPropertyInfo";
pub const CAMERA_PROPERTY_TYPE: &str = "CameraPropertyType";
pub const CAMERA_PROPERTY_VALUE: &str = "CameraPropertyValue";
pub const CAMERA_PROPERTY_RANGE: &str = "CameraPropertyRange";
pub const CAMERA_BULB_TIMER: &str = "CameraBulbTimer";

// ── Photo ────────────────────────────────────────────────────────────
pub const PHOTO_KEY: &str = "PhotoKey";
pub const PHOTO_KEYS: &str = "PhotoKeys";
pub const PHOTO_SELECTION: &str = "PhotoSelection";
pub const PHOTO_FILENAME: &str = "PhotoFilename";
pub const PHOTO_LOCATION: &str = "PhotoLocation";
pub const PHOTO_ORIGIN: &str = "PhotoOrigin";

// ── Snapshot ─────────────────────────────────────────────────────────
pub const CAMERA_INFO: &str = "CameraInfo";
pub const PHOTO_INFO: &str = "PhotoInfo";

// ── Options / config ─────────────────────────────────────────────────
pub const CONFIG_KEY: &str = "ConfigKey";
pub const CONFIG_VALUE: &str = "ConfigValue";
pub const GRID_SEQUENCE_NUM: &str = "GridSequenceNum";
pub const GRID_BATCH_NUM: &str = "GridBatchNum";
pub const GRID_UNIQUE_TAG: &str = "GridUniqueTag";

/// Borrow a string field, if present and a string.
pub(crate) fn str_field<'a>(fields: &'a FieldMap, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}
