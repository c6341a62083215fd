//! Photo listing and download.

use tabled::Tabled;

use shutterlink_api::Transport;
use shutterlink_core::{PhotoKey, PhotoRecord, PhotoSelection, Session};

use crate::cli::{DownloadArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PhotoRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Camera")]
    camera: String,
    #[tabled(rename = "Filename")]
    filename: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

impl From<&PhotoRecord> for PhotoRow {
    fn from(p: &PhotoRecord) -> Self {
        Self {
            key: p.key().to_string(),
            camera: p.camera_key().map_or_else(|| "-".into(), |k| k.to_string()),
            filename: p.filename().unwrap_or("-").to_owned(),
            location: p.location().unwrap_or("-").to_owned(),
            origin: p.origin().unwrap_or("-").to_owned(),
        }
    }
}

pub async fn list<T: Transport + Send>(
    session: &mut Session<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = session.synchronise().await?;
    util::check_reply(&reply)?;

    let photos: Vec<&PhotoRecord> = session.store().photos().collect();
    let out = output::render_list(
        &global.output,
        &photos,
        |p| PhotoRow::from(*p),
        |p| p.key().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Ask the controller to download photos; no keys means every photo.
pub async fn download<T: Transport + Send>(
    session: &mut Session<T>,
    args: DownloadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut keys: Vec<PhotoKey> = args.photos.into_iter().map(PhotoKey::from).collect();
    let (photos, message) = match keys.len() {
        0 => (PhotoSelection::All, "Download of all photos requested".to_owned()),
        1 => {
            let key = keys.remove(0);
            let message = format!("Download of {key} requested");
            (PhotoSelection::Single(key), message)
        }
        n => (PhotoSelection::Multiple(keys), format!("Download of {n} photos requested")),
    };

    let reply = session.download(photos).await?;
    util::acknowledge(&reply, &message, global)
}
