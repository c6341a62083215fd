// ── Selection resolution ──
//
// Turns a selection into concrete camera keys against the current store.
// Group membership is recomputed from live state on every call.

use crate::model::CameraKey;
use crate::selection::Selection;
use crate::store::StateStore;

/// Camera keys a selection targets.
///
/// `All` and `Group` follow store insertion order. `Single` and
/// `Multiple` are returned verbatim (order and duplicates kept) with no
/// existence check; a stale key surfaces as not-found on lookup.
pub fn target_cameras(store: &StateStore, selection: &Selection) -> Vec<CameraKey> {
    match selection {
        Selection::All => store.camera_keys(),
        Selection::Single(key) => vec![key.clone()],
        Selection::Multiple(keys) => keys.clone(),
        Selection::Group(group) => store
            .cameras()
            .filter(|camera| camera.group() == Some(group.as_str()))
            .map(|camera| camera.key().clone())
            .collect(),
    }
}

/// The one camera a single-camera read goes to.
///
/// `Single` is returned unconditionally so a caller can query a camera
/// that is not (yet) connected. Every other mode yields the first
/// connected camera in iteration order, or `None`.
pub fn active_camera(store: &StateStore, selection: &Selection) -> Option<CameraKey> {
    match selection {
        Selection::Single(key) => Some(key.clone()),
        Selection::Multiple(keys) => keys.iter().find(|key| store.is_camera_connected(key)).cloned(),
        Selection::All | Selection::Group(_) => target_cameras(store, selection)
            .into_iter()
            .find(|key| store.is_camera_connected(key)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn store() -> StateStore {
        let mut store = StateStore::new();
        for camera in [
            json!({"CameraKey": "A", "CameraStatus": "Ready", "CameraGroup": "g1"}),
            json!({"CameraKey": "B", "CameraStatus": "Disconnected", "CameraGroup": "g1"}),
            json!({"CameraKey": "C", "CameraStatus": "Busy", "CameraGroup": "g2"}),
        ] {
            store.apply_camera_update(camera.as_object().unwrap()).unwrap();
        }
        store
    }

    fn keys(raw: &[&str]) -> Vec<CameraKey> {
        raw.iter().map(|k| CameraKey::new(*k)).collect()
    }

    #[test]
    fn group_targets_ignore_connectivity_but_active_does_not() {
        let store = store();
        let group = Selection::Group("g1".into());
        assert_eq!(target_cameras(&store, &group), keys(&["A", "B"]));
        assert_eq!(active_camera(&store, &group), Some(CameraKey::new("A")));
    }

    #[test]
    fn all_targets_every_known_camera() {
        let store = store();
        assert_eq!(target_cameras(&store, &Selection::All), keys(&["A", "B", "C"]));
        assert_eq!(active_camera(&store, &Selection::All), Some(CameraKey::new("A")));
    }

    #[test]
    fn single_is_unchecked() {
        let store = store();
        let ghost = Selection::Single("ghost".into());
        assert_eq!(target_cameras(&store, &ghost), keys(&["ghost"]));
        assert_eq!(active_camera(&store, &ghost), Some(CameraKey::new("ghost")));
    }

    #[test]
    fn multiple_is_verbatim_and_active_scans_in_order() {
        let store = store();
        let selection = Selection::Multiple(keys(&["B", "C", "B", "A"]));
        assert_eq!(target_cameras(&store, &selection), keys(&["B", "C", "B", "A"]));
        assert_eq!(active_camera(&store, &selection), Some(CameraKey::new("C")));
    }

    #[test]
    fn no_connected_camera_in_scope() {
        let store = store();
        assert!(active_camera(&store, &Selection::Group("nowhere".into())).is_none());
        assert!(active_camera(&store, &Selection::Multiple(keys(&["B"]))).is_none());
        assert!(target_cameras(&store, &Selection::Group("nowhere".into())).is_empty());
    }
}
