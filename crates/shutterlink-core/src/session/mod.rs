// ── Session ──
//
// One client conversation with a camera controller: a transport, a state
// store, a message builder and the current camera selection. All
// operations take `&mut self`, so requests, event drains and waits
// never interleave.

mod transaction;
mod wait;

use serde_json::Value;

use shutterlink_api::Transport;

use crate::command::Command;
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::{CameraKey, CameraRecord, PhotoKey, PhotoRecord, PropertyInfo};
use crate::protocol::{MessageBuilder, Reply};
use crate::resolve;
use crate::selection::{PhotoSelection, Selection};
use crate::store::StateStore;

pub use wait::WaitReport;

/// A client session against one controller.
///
/// Errors that leave the conversation in an unknown state (transport
/// failures, a vanished controller, malformed payloads) terminate the
/// session: every later operation returns
/// [`CoreError::SessionTerminated`].
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    builder: MessageBuilder,
    store: StateStore,
    selection: Selection,
    config: SessionConfig,
    terminated: Option<String>,
}

impl<T: Transport + Send> Session<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            builder: MessageBuilder::new(),
            store: StateStore::new(),
            selection: Selection::All,
            config,
            terminated: None,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.is_some()
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select(&mut self, selection: Selection) {
        tracing::debug!(%selection, "selection changed");
        self.selection = selection;
    }

    pub fn select_all_cameras(&mut self) {
        self.select(Selection::All);
    }

    pub fn select_camera(&mut self, key: impl Into<CameraKey>) {
        self.select(Selection::Single(key.into()));
    }

    pub fn select_cameras(&mut self, keys: impl IntoIterator<Item = CameraKey>) {
        self.select(Selection::Multiple(keys.into_iter().collect()));
    }

    pub fn select_camera_group(&mut self, group: impl Into<String>) {
        self.select(Selection::Group(group.into()));
    }

    /// Cameras the current selection targets.
    pub fn target_cameras(&self) -> Vec<CameraKey> {
        resolve::target_cameras(&self.store, &self.selection)
    }

    /// Camera that single-camera reads go to.
    pub fn active_camera(&self) -> Result<&CameraRecord, CoreError> {
        let key = resolve::active_camera(&self.store, &self.selection).ok_or_else(|| {
            CoreError::NoActiveCamera {
                selection: self.selection.to_string(),
            }
        })?;
        self.store.camera(&key)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn camera_keys(&self) -> Vec<CameraKey> {
        self.store.camera_keys()
    }

    pub fn photo_keys(&self) -> Vec<PhotoKey> {
        self.store.photo_keys()
    }

    pub fn camera(&self, key: &CameraKey) -> Result<&CameraRecord, CoreError> {
        self.store.camera(key)
    }

    pub fn photo(&self, key: &PhotoKey) -> Result<&PhotoRecord, CoreError> {
        self.store.photo(key)
    }

    /// Property info of the active camera.
    pub fn property(&self, property_type: &str) -> Result<&PropertyInfo, CoreError> {
        let camera = self.active_camera()?;
        self.store.property(camera.key(), property_type)
    }

    /// Current value of a property on the active camera.
    pub fn property_value(&self, property_type: &str) -> Result<&Value, CoreError> {
        let camera = self.active_camera()?;
        self.store
            .property(camera.key(), property_type)?
            .value()
            .ok_or_else(|| CoreError::PropertyNotFound {
                camera: camera.key().to_string(),
                property: property_type.to_owned(),
            })
    }

    /// Allowed values of a property on the active camera, if reported.
    pub fn property_range(&self, property_type: &str) -> Result<Option<&Value>, CoreError> {
        Ok(self.property(property_type)?.range())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Request a full snapshot. The store is invalidated first and is
    /// synchronised again once the snapshot reply is applied.
    pub async fn synchronise(&mut self) -> Result<Reply, CoreError> {
        self.store.invalidate();
        self.execute(Command::Synchronise).await
    }

    pub async fn set_config(&mut self, key: impl Into<String>, value: Value) -> Result<Reply, CoreError> {
        self.execute(Command::SetConfig {
            key: key.into(),
            value,
        })
        .await
    }

    pub async fn connect(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::Connect).await
    }

    pub async fn disconnect(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::Disconnect).await
    }

    /// Trigger a capture on every selected camera.
    pub async fn shoot(&mut self, bulb_timer: Option<u32>, origin: Option<String>) -> Result<Reply, CoreError> {
        self.execute(Command::Shoot { bulb_timer, origin }).await
    }

    pub async fn autofocus(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::Autofocus).await
    }

    pub async fn set_property(
        &mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Reply, CoreError> {
        self.execute(Command::SetProperty {
            property: property.into(),
            value: value.into(),
        })
        .await
    }

    pub async fn enable_liveview(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::EnableLiveview).await
    }

    pub async fn disable_liveview(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::DisableLiveview).await
    }

    pub async fn download(&mut self, photos: PhotoSelection) -> Result<Reply, CoreError> {
        self.execute(Command::Download { photos }).await
    }

    pub async fn set_sequence_num(&mut self, num: u32) -> Result<Reply, CoreError> {
        self.execute(Command::SetSequenceNum(num)).await
    }

    pub async fn set_batch_num(&mut self, num: u32) -> Result<Reply, CoreError> {
        self.execute(Command::SetBatchNum(num)).await
    }

    pub async fn set_unique_tag(&mut self, tag: impl Into<String>) -> Result<Reply, CoreError> {
        self.execute(Command::SetUniqueTag(tag.into())).await
    }

    pub async fn deactivate_license(&mut self) -> Result<Reply, CoreError> {
        self.execute(Command::DeactivateLicense).await
    }
}
