//! Command dispatch: bridges CLI args -> session operations -> output formatting.

pub mod cameras;
pub mod config_cmd;
pub mod control;
pub mod cycle;
pub mod license;
pub mod listen;
pub mod options;
pub mod photos;
pub mod properties;
pub mod util;

use tokio_util::sync::CancellationToken;

use shutterlink_api::Transport;
use shutterlink_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Argument checks that need no controller, run before connecting.
pub fn preflight(cmd: &Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Deactivate => util::require_confirmation("deactivate license", global.yes),
        Command::SetOptions(args)
            if args.sequence.is_none() && args.batch.is_none() && args.unique.is_none() =>
        {
            Err(CliError::Validation {
                field: "options".into(),
                reason: "give at least one of --sequence, --batch, --unique".into(),
            })
        }
        _ => Ok(()),
    }
}

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch<T: Transport + Send>(
    cmd: Command,
    session: &mut Session<T>,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match cmd {
        Command::Ls(args) => cameras::handle(session, &args, global).await,
        Command::Photos => photos::list(session, global).await,
        Command::Listen(args) => listen::handle(session, &args, global, cancel).await,
        Command::Shoot(args) => control::shoot(session, args, global).await,
        Command::Connect(args) => control::connect(session, &args, global).await,
        Command::Disconnect(args) => control::disconnect(session, &args, global).await,
        Command::Autofocus(args) => control::autofocus(session, &args, global).await,
        Command::SetProperty(args) => properties::set(session, args, global).await,
        Command::GetProperty(args) => properties::get(session, &args, global).await,
        Command::SetOptions(args) => options::handle(session, args, global).await,
        Command::Download(args) => photos::download(session, args, global).await,
        Command::Deactivate => license::deactivate(session, global).await,
        Command::Test(args) => cycle::handle(session, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use serde_json::{Value, json};
    use tokio::task::JoinHandle;

    use shutterlink_api::{LocalRemote, LocalTransport, local_pair};

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["shutterlink", "--quiet", "--color", "never"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    /// Answers every request; `SetBatchNum` and `DeactivateLicense` are
    /// refused. Returns the requests it saw once the session is dropped.
    fn controller(mut remote: LocalRemote) -> JoinHandle<Vec<Value>> {
        tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(raw) = remote.next_request().await {
                let request: Value = serde_json::from_slice(&raw).unwrap();
                let msg_id = request["msg_id"].as_str().unwrap().to_owned();
                let mut reply = json!({
                    "msg_type": "Response",
                    "msg_id": msg_id,
                    "msg_seq_num": request["msg_seq_num"],
                    "msg_result": !matches!(msg_id.as_str(), "SetBatchNum" | "DeactivateLicense"),
                });
                if msg_id == "Synchronise" {
                    reply["CameraInfo"] = json!([
                        {
                            "CameraKey": "d1",
                            "CameraStatus": "Ready",
                            "CameraPropertyInfo": [{"CameraPropertyType": "ISO", "CameraPropertyValue": "400"}]
                        }
                    ]);
                    reply["PhotoInfo"] = json!([]);
                }
                seen.push(request);
                remote.reply(reply.to_string()).unwrap();
            }
            seen
        })
    }

    /// Plays a camera that goes busy and back to ready around every
    /// action, and reports each capture and download as photo updates.
    fn studio(mut remote: LocalRemote) -> JoinHandle<Vec<Value>> {
        tokio::spawn(async move {
            let mut seen = Vec::new();
            let mut shots = 0;
            while let Some(raw) = remote.next_request().await {
                let request: Value = serde_json::from_slice(&raw).unwrap();
                let msg_id = request["msg_id"].as_str().unwrap().to_owned();
                let mut reply = json!({
                    "msg_type": "Response",
                    "msg_id": msg_id,
                    "msg_seq_num": request["msg_seq_num"],
                    "msg_result": true,
                });
                let camera = |status: &str| {
                    json!({"msg_type": "Event", "msg_id": "CameraUpdated", "CameraKey": "d1", "CameraStatus": status})
                        .to_string()
                };
                let photo = |key: &str, location: &str| {
                    json!({
                        "msg_type": "Event",
                        "msg_id": "PhotoUpdated",
                        "PhotoKey": key,
                        "CameraKey": "d1",
                        "PhotoLocation": location
                    })
                    .to_string()
                };
                match msg_id.as_str() {
                    "Synchronise" => {
                        reply["CameraInfo"] = json!([{"CameraKey": "d1", "CameraStatus": "Ready"}]);
                        reply["PhotoInfo"] = json!([]);
                    }
                    "Autofocus" => {
                        remote.publish(camera("Busy")).unwrap();
                        remote.publish(camera("Ready")).unwrap();
                    }
                    "Shoot" => {
                        shots += 1;
                        remote.publish(camera("Busy")).unwrap();
                        remote.publish(photo(&format!("p{shots}"), "Camera")).unwrap();
                        remote.publish(camera("Ready")).unwrap();
                    }
                    "Download" => {
                        let key = request["PhotoKey"].as_str().unwrap();
                        remote.publish(camera("Busy")).unwrap();
                        remote.publish(camera("Ready")).unwrap();
                        remote.publish(photo(key, "Local Disk")).unwrap();
                    }
                    _ => {}
                }
                seen.push(request);
                remote.reply(reply.to_string()).unwrap();
            }
            seen
        })
    }

    async fn run(args: &[&str]) -> (Result<(), CliError>, Vec<Value>) {
        run_against(args, controller).await
    }

    async fn run_against(
        args: &[&str],
        spawn: fn(LocalRemote) -> JoinHandle<Vec<Value>>,
    ) -> (Result<(), CliError>, Vec<Value>) {
        let cli = parse(args);
        let (transport, remote): (LocalTransport, LocalRemote) = local_pair();
        let handle = spawn(remote);
        let mut session = Session::new(transport);
        let result = dispatch(cli.command, &mut session, &cli.global, &CancellationToken::new()).await;
        drop(session);
        (result, handle.await.unwrap())
    }

    // ── Preflight ────────────────────────────────────────────────────

    #[test]
    fn deactivate_needs_yes() {
        let cli = parse(&["deactivate"]);
        assert!(matches!(
            preflight(&cli.command, &cli.global),
            Err(CliError::NonInteractiveRequiresYes { .. })
        ));
        let cli = parse(&["deactivate", "--yes"]);
        assert!(preflight(&cli.command, &cli.global).is_ok());
    }

    #[test]
    fn set_options_needs_an_option() {
        let cli = parse(&["set-options"]);
        assert!(matches!(
            preflight(&cli.command, &cli.global),
            Err(CliError::Validation { .. })
        ));
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn shoot_encodes_selection_and_bulb() {
        let (result, seen) = run(&["shoot", "-c", "d1", "-c", "d2", "--bulb", "5"]).await;
        result.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["msg_id"], "Shoot");
        assert_eq!(seen[0]["CameraSelection"], "Multiple");
        assert_eq!(seen[0]["CameraKeys"], json!(["d1", "d2"]));
        assert_eq!(seen[0]["CameraBulbTimer"], 5);
    }

    #[tokio::test]
    async fn set_property_sends_wire_name() {
        let (result, seen) = run(&["set-property", "--group", "studio", "ISO", "800"]).await;
        result.unwrap();
        assert_eq!(seen[0]["CameraSelection"], "Group");
        assert_eq!(seen[0]["CameraGroup"], "studio");
        assert_eq!(seen[0]["CameraPropertyType"], "ISO");
        assert_eq!(seen[0]["CameraPropertyValue"], "800");
    }

    #[tokio::test]
    async fn get_property_reads_after_sync() {
        let (result, seen) = run(&["get-property", "iso"]).await;
        result.unwrap();
        assert_eq!(seen[0]["msg_id"], "Synchronise");
    }

    #[tokio::test]
    async fn get_property_on_unknown_camera_is_not_found() {
        let (result, _) = run(&["get-property", "-c", "ghost", "ISO"]).await;
        assert!(matches!(result, Err(CliError::NotFound { .. })));
    }

    #[tokio::test]
    async fn set_options_stops_at_first_rejection() {
        let (result, seen) =
            run(&["set-options", "--sequence", "3", "--batch", "7", "--unique", "tag"]).await;
        assert!(matches!(result, Err(CliError::Rejected { ref command, .. }) if command == "SetBatchNum"));
        let ids: Vec<&str> = seen.iter().map(|r| r["msg_id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["SetSequenceNum", "SetBatchNum"]);
    }

    #[tokio::test]
    async fn rejected_deactivation_exits_with_rejected_code() {
        let (result, _) = run(&["deactivate", "--yes"]).await;
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::REJECTED);
    }

    #[tokio::test]
    async fn download_without_keys_selects_all_photos() {
        let (result, seen) = run(&["download"]).await;
        result.unwrap();
        assert_eq!(seen[0]["msg_id"], "Download");
        assert_eq!(seen[0]["PhotoSelection"], "All");
    }

    // ── Capture cycle ────────────────────────────────────────────────

    #[tokio::test]
    async fn capture_cycle_runs_every_loop_to_local_disk() {
        let (result, seen) = run_against(&["test", "--loops", "2"], studio).await;
        result.unwrap();

        let ids: Vec<&str> = seen.iter().map(|r| r["msg_id"].as_str().unwrap()).collect();
        let cycle = ["Synchronise", "Connect", "Autofocus", "SetProperty", "Shoot", "Download"];
        assert_eq!(ids, [cycle, cycle].concat());

        let downloads: Vec<&Value> = seen.iter().filter(|r| r["msg_id"] == "Download").collect();
        assert_eq!(downloads[0]["PhotoSelection"], "Single");
        assert_eq!(downloads[0]["PhotoKey"], "p1");
        assert_eq!(downloads[1]["PhotoKey"], "p2");

        let storage = seen.iter().find(|r| r["msg_id"] == "SetProperty").unwrap();
        assert_eq!(storage["CameraSelection"], "Single");
        assert_eq!(storage["CameraKey"], "d1");
        assert_eq!(storage["CameraPropertyType"], "Storage");
        assert_eq!(storage["CameraPropertyValue"], "Card");
    }

    #[tokio::test]
    async fn capture_cycle_without_a_camera_stops_after_sync() {
        let (result, seen) = run(&["test", "--group", "nowhere"]).await;
        assert!(matches!(result, Err(CliError::NoCamera { .. })));
        assert_eq!(seen.len(), 1);
    }
}
