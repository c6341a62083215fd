//! Camera property commands.

use serde::Serialize;
use serde_json::Value;

use shutterlink_api::Transport;
use shutterlink_core::Session;

use crate::cli::{GetPropertyArgs, GlobalOpts, SetPropertyArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// What `get-property` prints.
#[derive(Debug, Serialize)]
struct PropertyView {
    camera: String,
    property: &'static str,
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<Value>,
}

fn detail(view: &PropertyView) -> String {
    let mut lines = vec![
        format!("Camera:   {}", view.camera),
        format!("Property: {}", view.property),
        format!("Value:    {}", util::value_cell(view.value.as_ref())),
    ];
    if let Some(ref range) = view.range {
        let values = match range {
            Value::Array(items) => items
                .iter()
                .map(|v| util::value_cell(Some(v)))
                .collect::<Vec<_>>()
                .join(", "),
            other => util::value_cell(Some(other)),
        };
        lines.push(format!("Range:    {values}"));
    }
    lines.join("\n")
}

pub async fn set<T: Transport + Send>(
    session: &mut Session<T>,
    args: SetPropertyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.select(util::selection(&args.selection));
    let property = args.property.wire_name();
    let message = format!("{property} set to {} on {}", args.value, session.selection());
    let reply = session.set_property(property, args.value).await?;
    util::acknowledge(&reply, &message, global)
}

/// Read a property from the first connected camera of the selection.
pub async fn get<T: Transport + Send>(
    session: &mut Session<T>,
    args: &GetPropertyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = session.synchronise().await?;
    util::check_reply(&reply)?;

    session.select(util::selection(&args.selection));
    let property = args.property.wire_name();
    let camera = session.active_camera()?.key().to_string();
    let info = session.property(property)?;

    let view = PropertyView {
        camera,
        property,
        value: info.value().cloned(),
        range: if args.range { info.range().cloned() } else { None },
    };
    let out = output::render_single(&global.output, &view, detail, |v| {
        util::value_cell(v.value.as_ref())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
