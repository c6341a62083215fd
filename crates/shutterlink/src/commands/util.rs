//! Shared helpers for command handlers.

use serde_json::Value;

use shutterlink_core::{CameraKey, Reply, Selection};

use crate::cli::{GlobalOpts, SelectionArgs};
use crate::error::CliError;

/// Build a camera selection from `--camera` / `--group`.
///
/// One `--camera` selects that camera alone; several keep their order.
pub fn selection(args: &SelectionArgs) -> Selection {
    if let Some(ref group) = args.group {
        return Selection::Group(group.clone());
    }
    match args.cameras.as_slice() {
        [] => Selection::All,
        [key] => Selection::Single(CameraKey::new(key.as_str())),
        keys => Selection::Multiple(keys.iter().map(|k| CameraKey::new(k.as_str())).collect()),
    }
}

/// Turn a reply with `msg_result == false` into an error.
pub fn check_reply(reply: &Reply) -> Result<(), CliError> {
    if reply.is_success() {
        return Ok(());
    }
    Err(CliError::Rejected {
        command: reply.msg_id().to_owned(),
        detail: reply
            .envelope
            .user_string
            .clone()
            .unwrap_or_else(|| "controller reported failure".into()),
    })
}

/// Check a reply and print a one-line acknowledgement to stderr.
pub fn acknowledge(reply: &Reply, message: &str, global: &GlobalOpts) -> Result<(), CliError> {
    check_reply(reply)?;
    if !global.quiet {
        eprintln!("{message}");
    }
    Ok(())
}

/// Destructive commands need `--yes`; there is no interactive prompt.
pub fn require_confirmation(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}

/// Render a field value for a table cell: strings bare, everything else as JSON.
pub fn value_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".into(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
