//! `ls`: camera listing.

use tabled::Tabled;

use shutterlink_api::Transport;
use shutterlink_core::{CameraRecord, Session};

use crate::cli::{GlobalOpts, SelectionArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Live view")]
    liveview: String,
}

impl CameraRow {
    fn new(camera: &CameraRecord, color: bool) -> Self {
        let model = match (camera.make(), camera.model()) {
            (Some(make), Some(model)) => format!("{make} {model}"),
            (None, Some(model)) => model.to_owned(),
            (Some(make), None) => make.to_owned(),
            (None, None) => "-".into(),
        };
        let liveview = if camera.liveview_enabled() {
            camera
                .liveview_frame_num()
                .map_or_else(|| "on".into(), |frame| format!("on (#{frame})"))
        } else {
            "off".into()
        };
        Self {
            key: camera.key().to_string(),
            name: camera.name().unwrap_or("-").to_owned(),
            model,
            serial: camera.serial_number().unwrap_or("-").to_owned(),
            status: output::status_label(camera.status(), color),
            group: camera.group().unwrap_or("-").to_owned(),
            liveview,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

/// Synchronise, then list the cameras the selection targets.
pub async fn handle<T: Transport + Send>(
    session: &mut Session<T>,
    args: &SelectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = session.synchronise().await?;
    util::check_reply(&reply)?;

    session.select(util::selection(args));
    let targets = session.target_cameras();
    let cameras: Vec<&CameraRecord> = targets
        .iter()
        .filter_map(|key| session.camera(key).ok())
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &cameras,
        |c| CameraRow::new(c, color),
        |c| c.key().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
