use bytes::Bytes;
use serde_json::Value;

use crate::command::{Command, MsgId};
use crate::model::fields::{self, FieldMap};
use crate::selection::Selection;

/// Assigns sequence numbers and renders commands into request documents.
///
/// Sequence numbers start at 0 and increase by one per built message, so
/// within a session they are strictly increasing in send order.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    next_seq: u64,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next built message will carry.
    pub fn next_seq_num(&self) -> u64 {
        self.next_seq
    }

    /// Build a request for `command`. Camera-scoped commands pick up
    /// `selection`; others ignore it.
    pub fn build(&mut self, command: &Command, selection: &Selection) -> OutboundMessage {
        let seq_num = self.next_seq;
        self.next_seq += 1;

        let msg_id = command.msg_id();
        let mut document = FieldMap::new();
        document.insert(fields::MSG_TYPE.into(), Value::String("Request".into()));
        document.insert(fields::MSG_ID.into(), Value::String(msg_id.to_string()));
        document.insert(fields::MSG_SEQ_NUM.into(), Value::from(seq_num));

        if command.is_camera_scoped() {
            selection.encode_into(&mut document);
        }
        command.encode_params(&mut document);

        OutboundMessage {
            seq_num,
            msg_id,
            document,
        }
    }
}

/// A fully built request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub seq_num: u64,
    pub msg_id: MsgId,
    pub document: FieldMap,
}

impl OutboundMessage {
    /// Serialize to the JSON bytes sent over the request channel.
    pub fn encode(&self) -> Bytes {
        Bytes::from(Value::Object(self.document.clone()).to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::selection::PhotoSelection;

    #[test]
    fn sequence_numbers_start_at_zero_and_increase() {
        let mut builder = MessageBuilder::new();
        let seqs: Vec<u64> = (0..3)
            .map(|_| builder.build(&Command::Synchronise, &Selection::All).seq_num)
            .collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(builder.next_seq_num(), 3);
    }

    #[test]
    fn camera_command_carries_selection() {
        let mut builder = MessageBuilder::new();
        let message = builder.build(&Command::Autofocus, &Selection::Single("d1".into()));
        assert_eq!(
            Value::Object(message.document),
            json!({
                "msg_type": "Request",
                "msg_id": "Autofocus",
                "msg_seq_num": 0,
                "CameraSelection": "Single",
                "CameraKey": "d1"
            })
        );
    }

    #[test]
    fn non_camera_command_ignores_selection() {
        let mut builder = MessageBuilder::new();
        let message = builder.build(
            &Command::Download {
                photos: PhotoSelection::Multiple(vec!["p1".into(), "p2".into()]),
            },
            &Selection::Group("studio".into()),
        );
        assert!(!message.document.contains_key("CameraSelection"));
        assert_eq!(message.document.get("PhotoKeys"), Some(&json!(["p1", "p2"])));
    }

    #[test]
    fn shoot_includes_optional_parameters() {
        let mut builder = MessageBuilder::new();
        let message = builder.build(
            &Command::Shoot {
                bulb_timer: Some(30),
                origin: Some("batch-7".into()),
            },
            &Selection::All,
        );
        assert_eq!(message.document.get("CameraBulbTimer"), Some(&json!(30)));
        assert_eq!(message.document.get("PhotoOrigin"), Some(&json!("batch-7")));

        let plain = builder.build(
            &Command::Shoot {
                bulb_timer: None,
                origin: None,
            },
            &Selection::All,
        );
        assert!(!plain.document.contains_key("CameraBulbTimer"));
    }

    #[test]
    fn encode_is_compact_json() {
        let mut builder = MessageBuilder::new();
        let bytes = builder
            .build(&Command::SetSequenceNum(12), &Selection::All)
            .encode();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["GridSequenceNum"], json!(12));
        assert_eq!(parsed["msg_id"], json!("SetSequenceNum"));
    }
}
