// ── Reply and event application ──
//
// Routes decoded inbound messages to the store's merge operations.

use super::StateStore;
use crate::error::CoreError;
use crate::protocol::{Event, EventBody, Reply, ReplyBody};

impl StateStore {
    /// Apply the state carried by a reply. Only snapshot replies change
    /// the store.
    pub fn process_reply(&mut self, reply: &Reply) -> Result<(), CoreError> {
        match &reply.body {
            ReplyBody::Snapshot(snapshot) => self.apply_snapshot(snapshot),
            ReplyBody::Fields(_) => Ok(()),
        }
    }

    pub fn process_event(&mut self, event: &Event) -> Result<(), CoreError> {
        match &event.body {
            EventBody::CameraUpdated(update) => self.apply_camera_update(update).map(drop),
            EventBody::PhotoUpdated(update) => self.apply_photo_update(update).map(drop),
            EventBody::Synchronise(snapshot) => self.apply_snapshot(snapshot),
            EventBody::Other(_) => {
                tracing::trace!(msg_id = event.msg_id(), "ignoring event");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::{decode_event, decode_reply};

    #[test]
    fn camera_event_then_photo_event() {
        let mut store = StateStore::new();
        store
            .process_event(&decode_event(br#"{"msg_id":"CameraUpdated","CameraKey":"d1","CameraStatus":"Ready"}"#).unwrap())
            .unwrap();
        store
            .process_event(&decode_event(br#"{"msg_id":"PhotoUpdated","PhotoKey":"p1","CameraKey":"d1"}"#).unwrap())
            .unwrap();

        assert!(store.is_camera_connected(&"d1".into()));
        assert_eq!(
            store.photo(&"p1".into()).unwrap().camera_key(),
            Some("d1".into())
        );
        assert!(!store.is_synchronised());
    }

    #[test]
    fn synchronise_event_acts_as_snapshot() {
        let mut store = StateStore::new();
        store
            .process_event(&decode_event(br#"{"msg_id":"Synchronise","CameraInfo":[{"CameraKey":"d1"}]}"#).unwrap())
            .unwrap();
        assert!(store.is_synchronised());
    }

    #[test]
    fn plain_reply_leaves_store_untouched() {
        let mut store = StateStore::new();
        let version = store.camera_version();
        store
            .process_reply(&decode_reply(br#"{"msg_id":"Shoot","msg_result":true}"#).unwrap())
            .unwrap();
        assert_eq!(store.camera_version(), version);
    }
}
