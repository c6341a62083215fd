use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::RecordCollection;
use crate::error::CoreError;
use crate::model::camera::validate_camera_update;
use crate::model::photo::validate_photo_update;
use crate::model::{CameraKey, CameraRecord, FieldMap, PhotoKey, PhotoRecord, PropertyInfo};
use crate::protocol::Snapshot;

/// Everything the session knows about the controller's cameras and photos.
///
/// Starts empty and unsynchronised. A snapshot (from a `Synchronise`
/// reply or event) marks it synchronised; [`invalidate`](Self::invalidate)
/// clears the flag without discarding records.
#[derive(Debug)]
pub struct StateStore {
    cameras: RecordCollection<CameraKey, CameraRecord>,
    photos: RecordCollection<PhotoKey, PhotoRecord>,
    synchronised: bool,
    last_sync: Option<DateTime<Utc>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            cameras: RecordCollection::new(),
            photos: RecordCollection::new(),
            synchronised: false,
            last_sync: None,
        }
    }

    // ── Synchronisation ──────────────────────────────────────────────

    pub fn is_synchronised(&self) -> bool {
        self.synchronised
    }

    /// When the last snapshot was applied.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn invalidate(&mut self) {
        self.synchronised = false;
    }

    /// Merge every camera and photo of a snapshot, then mark the store
    /// synchronised. Nothing is applied if any entry is malformed.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), CoreError> {
        let camera_keys = snapshot
            .cameras
            .iter()
            .map(|c| validate_camera_update(c).map_err(|r| CoreError::malformed("snapshot", r)))
            .collect::<Result<Vec<_>, _>>()?;
        let photo_keys = snapshot
            .photos
            .iter()
            .map(|p| validate_photo_update(p).map_err(|r| CoreError::malformed("snapshot", r)))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, update) in camera_keys.into_iter().zip(&snapshot.cameras) {
            self.merge_camera(key, update);
        }
        for (key, update) in photo_keys.into_iter().zip(&snapshot.photos) {
            self.merge_photo(key, update);
        }

        self.synchronised = true;
        self.last_sync = Some(Utc::now());
        tracing::debug!(
            cameras = self.cameras.len(),
            photos = self.photos.len(),
            "store synchronised"
        );
        Ok(())
    }

    // ── Incremental updates ──────────────────────────────────────────

    /// Merge a camera update, creating the record on first sight.
    pub fn apply_camera_update(&mut self, update: &FieldMap) -> Result<CameraKey, CoreError> {
        let key = validate_camera_update(update).map_err(|r| CoreError::malformed("camera update", r))?;
        self.merge_camera(key.clone(), update);
        Ok(key)
    }

    /// Merge a photo update, creating the record on first sight.
    pub fn apply_photo_update(&mut self, update: &FieldMap) -> Result<PhotoKey, CoreError> {
        let key = validate_photo_update(update).map_err(|r| CoreError::malformed("photo update", r))?;
        self.merge_photo(key.clone(), update);
        Ok(key)
    }

    fn merge_camera(&mut self, key: CameraKey, update: &FieldMap) {
        if self
            .cameras
            .upsert_with(key.clone(), CameraRecord::new, |camera| camera.merge(update))
        {
            tracing::debug!(camera = %key, "new camera");
        }
    }

    fn merge_photo(&mut self, key: PhotoKey, update: &FieldMap) {
        if self
            .photos
            .upsert_with(key.clone(), PhotoRecord::new, |photo| photo.merge(update))
        {
            tracing::debug!(photo = %key, "new photo");
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Camera keys in first-seen order.
    pub fn camera_keys(&self) -> Vec<CameraKey> {
        self.cameras.keys()
    }

    /// Photo keys in first-seen order.
    pub fn photo_keys(&self) -> Vec<PhotoKey> {
        self.photos.keys()
    }

    pub fn cameras(&self) -> impl Iterator<Item = &CameraRecord> {
        self.cameras.values()
    }

    pub fn photos(&self) -> impl Iterator<Item = &PhotoRecord> {
        self.photos.values()
    }

    pub fn camera(&self, key: &CameraKey) -> Result<&CameraRecord, CoreError> {
        self.cameras.get(key).ok_or_else(|| CoreError::CameraNotFound {
            key: key.to_string(),
        })
    }

    pub fn photo(&self, key: &PhotoKey) -> Result<&PhotoRecord, CoreError> {
        self.photos.get(key).ok_or_else(|| CoreError::PhotoNotFound {
            key: key.to_string(),
        })
    }

    /// Unknown cameras count as not connected.
    pub fn is_camera_connected(&self, key: &CameraKey) -> bool {
        self.cameras
            .get(key)
            .is_some_and(CameraRecord::is_connected)
    }

    pub fn property(&self, key: &CameraKey, property_type: &str) -> Result<&PropertyInfo, CoreError> {
        self.camera(key)?
            .property(property_type)
            .ok_or_else(|| CoreError::PropertyNotFound {
                camera: key.to_string(),
                property: property_type.to_owned(),
            })
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Version counter bumped on every camera mutation.
    pub fn subscribe_cameras(&self) -> watch::Receiver<u64> {
        self.cameras.subscribe()
    }

    /// Version counter bumped on every photo mutation.
    pub fn subscribe_photos(&self) -> watch::Receiver<u64> {
        self.photos.subscribe()
    }

    pub fn camera_version(&self) -> u64 {
        self.cameras.version()
    }
}
