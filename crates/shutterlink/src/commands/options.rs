//! `set-options`: grid naming options applied by the controller.

use shutterlink_api::Transport;
use shutterlink_core::Session;

use crate::cli::{GlobalOpts, SetOptionsArgs};
use crate::error::CliError;

use super::util;

/// Send one request per option given, in sequence / batch / tag order.
///
/// [`preflight`](super::preflight) rejects an invocation with no options
/// before the controller is contacted.
pub async fn handle<T: Transport + Send>(
    session: &mut Session<T>,
    args: SetOptionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(num) = args.sequence {
        let reply = session.set_sequence_num(num).await?;
        util::acknowledge(&reply, &format!("Sequence number set to {num}"), global)?;
    }
    if let Some(num) = args.batch {
        let reply = session.set_batch_num(num).await?;
        util::acknowledge(&reply, &format!("Batch number set to {num}"), global)?;
    }
    if let Some(tag) = args.unique {
        let message = format!("Unique tag set to {tag}");
        let reply = session.set_unique_tag(tag).await?;
        util::acknowledge(&reply, &message, global)?;
    }
    Ok(())
}
