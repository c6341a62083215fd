// ── Domain model ──
//
// Camera and photo records as reported by the controller. Records keep
// every field the controller sends (open mappings); typed accessors cover
// the handful of fields the session itself interprets.

pub mod camera;
pub mod fields;
pub mod keys;
pub mod photo;

pub use camera::{CameraRecord, CameraStatus, PropertyInfo};
pub use fields::FieldMap;
pub use keys::{CameraKey, PhotoKey};
pub use photo::PhotoRecord;
