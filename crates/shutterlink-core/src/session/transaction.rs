// ── Transaction engine ──
//
// send request -> drain pending events -> block for reply -> drain again
// -> apply reply. Every event queued by the time the reply is read is
// applied before it.

use shutterlink_api::Transport;
use tracing::{debug, warn};

use super::Session;
use crate::command::Command;
use crate::error::CoreError;
use crate::protocol::{Event, OutboundMessage, Reply, decode_event, decode_reply};

impl<T: Transport + Send> Session<T> {
    /// Send one command and return its reply.
    ///
    /// A reply with `msg_result: false` is still `Ok`; inspect
    /// [`Reply::is_success`].
    pub async fn execute(&mut self, command: Command) -> Result<Reply, CoreError> {
        self.ensure_running()?;
        let message = self.builder.build(&command, &self.selection);
        let result = self.transact(&message).await;
        self.settle(result)
    }

    /// Apply every event queued right now and return them.
    pub fn poll_events(&mut self) -> Result<Vec<Event>, CoreError> {
        self.ensure_running()?;
        let result = self.check_alive().and_then(|()| self.apply_pending_events());
        self.settle(result)
    }

    async fn transact(&mut self, message: &OutboundMessage) -> Result<Reply, CoreError> {
        self.check_alive()?;
        debug!(msg_id = %message.msg_id, seq = message.seq_num, "sending request");
        self.transport.send_request(message.encode()).await?;

        self.apply_pending_events()?;

        let raw = self.transport.receive_reply().await?;
        // Published while the controller handled the request.
        self.apply_pending_events()?;
        let reply = decode_reply(&raw)?;
        if let Some(seq) = reply.envelope.seq_num {
            if seq != message.seq_num {
                warn!(expected = message.seq_num, got = seq, "reply sequence mismatch");
            }
        }
        self.store.process_reply(&reply)?;

        if reply.is_success() {
            debug!(msg_id = %message.msg_id, seq = message.seq_num, "request succeeded");
        } else {
            debug!(
                msg_id = %message.msg_id,
                seq = message.seq_num,
                detail = reply.envelope.user_string.as_deref().unwrap_or(""),
                "request rejected by controller"
            );
        }
        Ok(reply)
    }

    // ── Shared plumbing for transactions and waits ───────────────────

    /// Decode and apply events until none is pending.
    pub(super) fn apply_pending_events(&mut self) -> Result<Vec<Event>, CoreError> {
        let mut applied = Vec::new();
        while let Some(raw) = self.transport.try_receive_event()? {
            let event = decode_event(&raw)?;
            self.store.process_event(&event)?;
            applied.push(event);
        }
        if !applied.is_empty() {
            tracing::trace!(count = applied.len(), "applied events");
        }
        Ok(applied)
    }

    pub(super) fn check_alive(&self) -> Result<(), CoreError> {
        if self.transport.is_alive() {
            Ok(())
        } else {
            Err(CoreError::ControllerGone)
        }
    }

    pub(super) fn ensure_running(&self) -> Result<(), CoreError> {
        match &self.terminated {
            Some(reason) => Err(CoreError::SessionTerminated {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Terminate the session if `result` carries a fatal error.
    pub(super) fn settle<R>(&mut self, result: Result<R, CoreError>) -> Result<R, CoreError> {
        if let Err(err) = &result {
            if err.is_fatal() && self.terminated.is_none() {
                warn!(error = %err, "session terminated");
                self.terminated = Some(err.to_string());
            }
        }
        result
    }
}
