//! Rendering for `--output`.
//!
//! Camera and photo listings become rounded `tabled` tables, single views
//! use a hand-written detail layout, `plain` prints one key per line, and
//! the structured formats go through serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use shutterlink_core::CameraStatus;

use crate::cli::{ColorMode, OutputFormat};

// ── Color ────────────────────────────────────────────────────────────

/// Resolve `--color` against the terminal and `NO_COLOR`.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        ColorMode::Always => true,
        ColorMode::Never => false,
    }
}

/// Camera status label: green when ready, yellow when busy, red when
/// disconnected.
pub fn status_label(status: CameraStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        CameraStatus::Ready => label.green().to_string(),
        CameraStatus::Busy => label.yellow().to_string(),
        CameraStatus::Disconnected => label.red().to_string(),
        CameraStatus::Unknown => label.dimmed().to_string(),
    }
}

pub fn dim(text: &str, color: bool) -> String {
    paint(text, color, |t| t.dimmed().to_string())
}

/// Event and message ids.
pub fn accent(text: &str, color: bool) -> String {
    paint(text, color, |t| t.cyan().bold().to_string())
}

fn paint(text: &str, color: bool, style: impl FnOnce(&str) -> String) -> String {
    if color { style(text) } else { text.to_owned() }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Render a collection of records.
///
/// `to_row` builds the table row for each record and `key_of` gives the
/// line printed in `plain` mode. The structured formats serialize the
/// records themselves, not the rows.
pub fn render_list<T, R>(
    format: &OutputFormat,
    records: &[T],
    to_row: impl Fn(&T) -> R,
    key_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = records.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => records.iter().map(key_of).collect::<Vec<_>>().join("\n"),
        structured => render_structured(structured, records),
    }
}

/// Render one record. `detail` lays it out for `table` mode.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    record: &T,
    detail: impl Fn(&T) -> String,
    key_of: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => detail(record),
        OutputFormat::Plain => key_of(record),
        structured => render_structured(structured, record),
    }
}

fn render_structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        _ => serde_json::to_string(data).map_err(|e| e.to_string()),
    };
    rendered.unwrap_or_else(|reason| {
        tracing::error!(%reason, "failed to serialize output");
        String::new()
    })
}

/// Single-line JSON, used for streamed events.
pub fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    render_structured(&OutputFormat::JsonCompact, data)
}

/// Write `rendered` to stdout unless `--quiet` is set or there is nothing
/// to show.
pub fn print_output(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{rendered}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Camera {
        key: &'static str,
        group: &'static str,
    }

    #[derive(Tabled)]
    struct CameraRow {
        #[tabled(rename = "Key")]
        key: String,
    }

    fn cameras() -> Vec<Camera> {
        vec![
            Camera { key: "d1", group: "left" },
            Camera { key: "d2", group: "right" },
        ]
    }

    fn render(format: &OutputFormat) -> String {
        render_list(
            format,
            &cameras(),
            |c| CameraRow { key: c.key.into() },
            |c| c.key.into(),
        )
    }

    #[test]
    fn plain_prints_one_key_per_line() {
        assert_eq!(render(&OutputFormat::Plain), "d1\nd2");
    }

    #[test]
    fn json_serializes_records_not_rows() {
        assert_eq!(
            render(&OutputFormat::JsonCompact),
            r#"[{"key":"d1","group":"left"},{"key":"d2","group":"right"}]"#
        );
        assert!(render(&OutputFormat::Yaml).contains("group: right"));
    }

    #[test]
    fn table_has_header_and_rows() {
        let out = render(&OutputFormat::Table);
        assert!(out.contains("Key"));
        assert!(out.contains("d2"));
        assert!(!out.contains("left"));
    }

    #[test]
    fn single_record_uses_detail_layout_for_tables() {
        let camera = Camera { key: "d1", group: "left" };
        let out = render_single(&OutputFormat::Table, &camera, |c| format!("group: {}", c.group), |c| c.key.into());
        assert_eq!(out, "group: left");
    }

    #[test]
    fn uncolored_status_is_the_bare_label() {
        assert_eq!(status_label(CameraStatus::Ready, false), "Ready");
        assert_ne!(status_label(CameraStatus::Ready, true), "Ready");
        assert_eq!(accent("Shoot", false), "Shoot");
    }
}
