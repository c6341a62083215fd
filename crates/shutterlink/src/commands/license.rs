//! `deactivate`: release the controller's license seat.

use shutterlink_api::Transport;
use shutterlink_core::Session;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn deactivate<T: Transport + Send>(
    session: &mut Session<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = session.deactivate_license().await?;
    util::acknowledge(&reply, "License deactivated", global)
}
