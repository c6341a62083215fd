//! `test`: drive one camera through a full capture cycle.
//!
//! Each loop synchronises, connects, focuses, switches storage to the
//! card, shoots, waits for the new photo to land on the camera, then
//! downloads it and waits for it to reach local disk.

use std::collections::HashSet;

use serde::Serialize;
use tabled::Tabled;

use shutterlink_api::Transport;
use shutterlink_core::{CameraKey, CameraStatus, PhotoKey, PhotoSelection, Session};

use crate::cli::{GlobalOpts, PropertyName, TestArgs};
use crate::error::CliError;
use crate::output;

use super::util;

const ON_CAMERA: &str = "Camera";
const ON_LOCAL_DISK: &str = "Local Disk";

#[derive(Debug, Clone, Serialize, Tabled)]
struct CycleRow {
    #[tabled(rename = "Loop")]
    round: u32,
    #[tabled(rename = "Camera")]
    camera: CameraKey,
    #[tabled(rename = "Photo")]
    photo: PhotoKey,
}

pub async fn handle<T: Transport + Send>(
    session: &mut Session<T>,
    args: &TestArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rows = Vec::new();
    for round in 1..=args.loops {
        session.select(util::selection(&args.selection));
        let (camera, photo) = run_cycle(session).await?;
        tracing::info!(round, %camera, %photo, "capture cycle complete");
        if !global.quiet {
            eprintln!("Loop {round}/{}: {photo} from {camera} downloaded", args.loops);
        }
        rows.push(CycleRow { round, camera, photo });
    }

    let out = output::render_list(&global.output, &rows, CycleRow::clone, |r| r.photo.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn run_cycle<T: Transport + Send>(
    session: &mut Session<T>,
) -> Result<(CameraKey, PhotoKey), CliError> {
    util::check_reply(&session.synchronise().await?)?;
    let camera = session
        .target_cameras()
        .into_iter()
        .next()
        .ok_or_else(|| CliError::NoCamera {
            selection: session.selection().to_string(),
        })?;
    session.select_camera(camera.clone());

    util::check_reply(&session.connect().await?)?;
    util::check_reply(&session.autofocus().await?)?;
    until_ready(session, &camera).await?;

    let storage = session
        .set_property(PropertyName::Storage.wire_name(), "Card")
        .await?;
    util::check_reply(&storage)?;

    let known: HashSet<PhotoKey> = session.photo_keys().into_iter().collect();
    util::check_reply(&session.shoot(None, None).await?)?;
    until_ready(session, &camera).await?;
    let photo = session
        .wait_for_photo(|p| {
            !known.contains(p.key())
                && p.camera_key().as_ref() == Some(&camera)
                && p.location() == Some(ON_CAMERA)
        })
        .await?;

    let download = session
        .download(PhotoSelection::Single(photo.clone()))
        .await?;
    util::check_reply(&download)?;
    until_ready(session, &camera).await?;
    session
        .wait_for_photo(|p| p.key() == &photo && p.location() == Some(ON_LOCAL_DISK))
        .await?;

    Ok((camera, photo))
}

/// Wait for the camera to finish its current operation.
async fn until_ready<T: Transport + Send>(
    session: &mut Session<T>,
    camera: &CameraKey,
) -> Result<(), CliError> {
    let report = session.wait_for_status(CameraStatus::Ready).await?;
    if report.dropped.contains(camera) {
        return Err(CliError::NoCamera {
            selection: format!("camera {camera}"),
        });
    }
    Ok(())
}
