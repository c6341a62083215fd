//! Wire documents exchanged with the controller.
//!
//! Every message is a single JSON object. Requests carry `msg_type`,
//! `msg_id`, a per-session `msg_seq_num`, and command parameters.
//! Replies echo `msg_id`/`msg_seq_num` and add a boolean `msg_result`.
//! Events carry `msg_id` plus the changed camera or photo fields.

mod builder;
mod inbound;

pub use builder::{MessageBuilder, OutboundMessage};
pub use inbound::{Envelope, Event, EventBody, Reply, ReplyBody, Snapshot, decode_event, decode_reply};
