//! `listen`: print controller events as they arrive.

use std::io::{self, Write};

use chrono::{Local, SecondsFormat};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use shutterlink_api::Transport;
use shutterlink_core::model::fields;
use shutterlink_core::{Event, EventBody, FieldMap, Session};

use crate::cli::{GlobalOpts, ListenArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// Poll for events until interrupted, the controller goes away, or
/// `--count` events have been printed.
pub async fn handle<T: Transport + Send>(
    session: &mut Session<T>,
    args: &ListenArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    if args.sync {
        let reply = session.synchronise().await?;
        util::check_reply(&reply)?;
        tracing::info!(cameras = session.store().camera_count(), "store synchronised");
    }

    let color = output::should_color(&global.color);
    let poll_interval = session.config().poll_interval;
    let mut seen = 0_u64;

    loop {
        let events = match session.poll_events() {
            Ok(events) => events,
            Err(_) if cancel.is_cancelled() => break,
            Err(e) => return Err(e.into()),
        };

        for event in &events {
            if !global.quiet {
                let line = format_event(event, args.brief, &global.output, color);
                writeln!(io::stdout().lock(), "{line}")?;
            }
            seen += 1;
            if args.count.is_some_and(|limit| seen >= limit) {
                return Ok(());
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(poll_interval) => {}
        }
    }

    tracing::debug!(events = seen, "listen stopped");
    Ok(())
}

// ── Formatting ──────────────────────────────────────────────────────

fn format_event(event: &Event, brief: bool, format: &OutputFormat, color: bool) -> String {
    let time = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);

    if matches!(format, OutputFormat::Json | OutputFormat::JsonCompact) {
        return output::render_json_compact(&json!({
            "time": time,
            "msg_id": event.msg_id(),
            "body": body_value(&event.body),
        }));
    }

    let detail = if brief {
        brief_detail(&event.body)
    } else {
        output::render_json_compact(&body_value(&event.body))
    };
    let mut line = format!(
        "{} {} {detail}",
        output::dim(&time, color),
        output::accent(event.msg_id(), color)
    );
    line.truncate(line.trim_end().len());
    line
}

fn body_value(body: &EventBody) -> Value {
    match body {
        EventBody::CameraUpdated(map) | EventBody::PhotoUpdated(map) | EventBody::Other(map) => {
            Value::Object(map.clone())
        }
        EventBody::Synchronise(snapshot) => json!({
            fields::CAMERA_INFO: snapshot.cameras,
            fields::PHOTO_INFO: snapshot.photos,
        }),
    }
}

fn brief_detail(body: &EventBody) -> String {
    let key = |map: &FieldMap, field: &str| util::value_cell(map.get(field));
    match body {
        EventBody::CameraUpdated(map) => key(map, fields::CAMERA_KEY),
        EventBody::PhotoUpdated(map) => key(map, fields::PHOTO_KEY),
        EventBody::Synchronise(snapshot) => format!(
            "cameras={} photos={}",
            snapshot.cameras.len(),
            snapshot.photos.len()
        ),
        EventBody::Other(_) => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shutterlink_core::protocol::decode_event;

    use super::*;

    #[test]
    fn brief_shows_the_record_key() {
        let event = decode_event(
            br#"{"msg_type":"Event","msg_id":"CameraUpdated","CameraKey":"d1","CameraStatus":"Busy"}"#,
        )
        .unwrap();
        let line = format_event(&event, true, &OutputFormat::Table, false);
        assert!(line.ends_with(" CameraUpdated d1"), "got: {line}");
    }

    #[test]
    fn full_line_carries_the_fields() {
        let event = decode_event(
            br#"{"msg_type":"Event","msg_id":"PhotoUpdated","PhotoKey":"p1","PhotoFilename":"a.jpg"}"#,
        )
        .unwrap();
        let line = format_event(&event, false, &OutputFormat::Table, false);
        assert!(line.contains(r#""PhotoFilename":"a.jpg""#), "got: {line}");
    }

    #[test]
    fn json_output_is_one_object_per_event() {
        let event = decode_event(
            br#"{"msg_type":"Event","msg_id":"Synchronise","CameraInfo":[{"CameraKey":"d1"}],"PhotoInfo":[]}"#,
        )
        .unwrap();
        let line = format_event(&event, false, &OutputFormat::JsonCompact, false);
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["msg_id"], "Synchronise");
        assert_eq!(value["body"]["CameraInfo"][0]["CameraKey"], "d1");
    }
}
