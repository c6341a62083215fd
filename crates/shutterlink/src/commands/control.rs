//! Camera control: shoot, autofocus, connect, disconnect.

use shutterlink_api::Transport;
use shutterlink_core::Session;

use crate::cli::{GlobalOpts, SelectionArgs, ShootArgs};
use crate::error::CliError;

use super::util;

pub async fn shoot<T: Transport + Send>(
    session: &mut Session<T>,
    args: ShootArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.select(util::selection(&args.selection));
    let message = match args.bulb {
        Some(secs) => format!("Bulb capture ({secs}s) triggered on {}", session.selection()),
        None => format!("Capture triggered on {}", session.selection()),
    };
    let reply = session.shoot(args.bulb, args.origin).await?;
    util::acknowledge(&reply, &message, global)
}

pub async fn autofocus<T: Transport + Send>(
    session: &mut Session<T>,
    args: &SelectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.select(util::selection(args));
    let reply = session.autofocus().await?;
    util::acknowledge(&reply, "Autofocus started", global)
}

pub async fn connect<T: Transport + Send>(
    session: &mut Session<T>,
    args: &SelectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.select(util::selection(args));
    let reply = session.connect().await?;
    util::acknowledge(&reply, "Connect requested", global)
}

pub async fn disconnect<T: Transport + Send>(
    session: &mut Session<T>,
    args: &SelectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.select(util::selection(args));
    let reply = session.disconnect().await?;
    util::acknowledge(&reply, "Disconnect requested", global)
}
