use serde_json::Value;

use crate::error::CoreError;
use crate::model::camera::validate_camera_update;
use crate::model::fields::{self, FieldMap};
use crate::model::photo::validate_photo_update;

const REPLY: &str = "reply";
const EVENT: &str = "event";

/// The `msg_*` fields common to every inbound document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub msg_type: Option<String>,
    pub msg_id: String,
    pub seq_num: Option<u64>,
    pub result: Option<bool>,
    /// Human-readable detail the controller attaches to some replies.
    pub user_string: Option<String>,
}

/// Full set of cameras and photos, as carried by a `Synchronise` reply
/// or event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub cameras: Vec<FieldMap>,
    pub photos: Vec<FieldMap>,
}

// ── Replies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Snapshot(Snapshot),
    /// Any other reply; the non-envelope fields as sent.
    Fields(FieldMap),
}

/// Decoded answer to one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub envelope: Envelope,
    pub body: ReplyBody,
}

impl Reply {
    /// `false` only when the controller explicitly reported failure.
    pub fn is_success(&self) -> bool {
        self.envelope.result.unwrap_or(true)
    }

    pub fn msg_id(&self) -> &str {
        &self.envelope.msg_id
    }
}

/// Decode bytes read from the request/reply channel.
///
/// A `Synchronise` reply that carries `CameraInfo` decodes to a snapshot;
/// a failed `Synchronise` without it decodes to plain fields.
pub fn decode_reply(raw: &[u8]) -> Result<Reply, CoreError> {
    let (envelope, body) = split(parse_object(raw, REPLY)?, REPLY)?;
    let body = if envelope.msg_id == "Synchronise" && body.contains_key(fields::CAMERA_INFO) {
        ReplyBody::Snapshot(parse_snapshot(&body, REPLY)?)
    } else {
        ReplyBody::Fields(body)
    };
    Ok(Reply { envelope, body })
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    CameraUpdated(FieldMap),
    PhotoUpdated(FieldMap),
    Synchronise(Snapshot),
    /// Event types the session does not interpret.
    Other(FieldMap),
}

/// Decoded asynchronous notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub envelope: Envelope,
    pub body: EventBody,
}

impl Event {
    pub fn msg_id(&self) -> &str {
        &self.envelope.msg_id
    }
}

/// Decode bytes read from the event channel.
pub fn decode_event(raw: &[u8]) -> Result<Event, CoreError> {
    let (envelope, body) = split(parse_object(raw, EVENT)?, EVENT)?;
    let body = match envelope.msg_id.as_str() {
        "CameraUpdated" => {
            validate_camera_update(&body).map_err(|reason| CoreError::malformed(EVENT, reason))?;
            EventBody::CameraUpdated(body)
        }
        "PhotoUpdated" => {
            validate_photo_update(&body).map_err(|reason| CoreError::malformed(EVENT, reason))?;
            EventBody::PhotoUpdated(body)
        }
        "Synchronise" => EventBody::Synchronise(parse_snapshot(&body, EVENT)?),
        other => {
            tracing::warn!(msg_id = other, "unrecognised event, passing through");
            EventBody::Other(body)
        }
    };
    Ok(Event { envelope, body })
}

// ── Helpers ──────────────────────────────────────────────────────────

fn parse_object(raw: &[u8], kind: &'static str) -> Result<FieldMap, CoreError> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(other) => Err(CoreError::malformed(
            kind,
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
        Err(e) => Err(CoreError::malformed(kind, e.to_string())),
    }
}

/// Strip the `msg_*` envelope off a document.
fn split(mut doc: FieldMap, kind: &'static str) -> Result<(Envelope, FieldMap), CoreError> {
    let msg_id = match doc.remove(fields::MSG_ID) {
        Some(Value::String(id)) => id,
        _ => return Err(CoreError::malformed(kind, "missing string msg_id")),
    };
    let seq_num = match doc.remove(fields::MSG_SEQ_NUM) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) if n.is_u64() => n.as_u64(),
        Some(other) => {
            return Err(CoreError::malformed(
                kind,
                format!("msg_seq_num is {}, expected an unsigned integer", json_kind(&other)),
            ));
        }
    };
    let result = match doc.remove(fields::MSG_RESULT) {
        None | Some(Value::Null) => None,
        Some(Value::Bool(ok)) => Some(ok),
        Some(other) => {
            return Err(CoreError::malformed(
                kind,
                format!("msg_result is {}, expected a boolean", json_kind(&other)),
            ));
        }
    };
    let msg_type = take_string(&mut doc, fields::MSG_TYPE);
    let user_string = take_string(&mut doc, fields::MSG_USER_STRING);

    Ok((
        Envelope {
            msg_type,
            msg_id,
            seq_num,
            result,
            user_string,
        },
        doc,
    ))
}

fn take_string(doc: &mut FieldMap, field: &str) -> Option<String> {
    match doc.remove(field) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn parse_snapshot(body: &FieldMap, kind: &'static str) -> Result<Snapshot, CoreError> {
    let cameras = object_list(body, fields::CAMERA_INFO, kind)?;
    for camera in &cameras {
        validate_camera_update(camera).map_err(|reason| CoreError::malformed(kind, reason))?;
    }
    let photos = if body.contains_key(fields::PHOTO_INFO) {
        object_list(body, fields::PHOTO_INFO, kind)?
    } else {
        Vec::new()
    };
    for photo in &photos {
        validate_photo_update(photo).map_err(|reason| CoreError::malformed(kind, reason))?;
    }
    Ok(Snapshot { cameras, photos })
}

fn object_list(body: &FieldMap, field: &str, kind: &'static str) -> Result<Vec<FieldMap>, CoreError> {
    body.get(field)
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_object().cloned())
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| CoreError::malformed(kind, format!("{field} is not a list of objects")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn synchronise_reply_decodes_to_snapshot() {
        let raw = json!({
            "msg_type": "Response",
            "msg_id": "Synchronise",
            "msg_seq_num": 0,
            "msg_result": true,
            "CameraInfo": [{"CameraKey": "d1", "CameraStatus": "Ready"}],
            "PhotoInfo": [{"PhotoKey": "p1"}]
        })
        .to_string();

        let reply = decode_reply(raw.as_bytes()).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.envelope.seq_num, Some(0));
        let ReplyBody::Snapshot(snapshot) = reply.body else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.cameras.len(), 1);
        assert_eq!(snapshot.photos.len(), 1);
    }

    #[test]
    fn failed_reply_keeps_its_fields() {
        let raw = br#"{"msg_id":"Shoot","msg_seq_num":3,"msg_result":false,"msg_user_string":"no cameras"}"#;
        let reply = decode_reply(raw).unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.envelope.user_string.as_deref(), Some("no cameras"));
        assert_eq!(reply.body, ReplyBody::Fields(FieldMap::new()));
    }

    #[test]
    fn camera_event_strips_envelope() {
        let raw = br#"{"msg_type":"Event","msg_id":"CameraUpdated","CameraKey":"d1","CameraStatus":"Busy"}"#;
        let event = decode_event(raw).unwrap();
        let EventBody::CameraUpdated(body) = event.body else {
            panic!("expected camera update");
        };
        assert_eq!(
            Value::Object(body),
            json!({"CameraKey": "d1", "CameraStatus": "Busy"})
        );
    }

    #[test]
    fn unknown_event_is_passed_through() {
        let event = decode_event(br#"{"msg_id":"NetworkPing","Payload":1}"#).unwrap();
        assert!(matches!(event.body, EventBody::Other(_)));
        assert_eq!(event.msg_id(), "NetworkPing");
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let cases: [&[u8]; 5] = [
            b"not json",
            br#"[1,2,3]"#,
            br#"{"msg_seq_num":1}"#,
            br#"{"msg_id":"Shoot","msg_result":"yes"}"#,
            br#"{"msg_id":"Shoot","msg_seq_num":-4}"#,
        ];
        for raw in cases {
            let err = decode_reply(raw).unwrap_err();
            assert!(err.is_fatal(), "expected fatal error for {raw:?}");
        }

        let err = decode_event(br#"{"msg_id":"CameraUpdated","CameraStatus":"Ready"}"#).unwrap_err();
        assert!(matches!(err, CoreError::MalformedPayload { source_kind: "event", .. }));
    }
}
