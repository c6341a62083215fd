//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists (pass --force to overwrite)", path.display()),
                });
            }

            let mut cfg = Config::default();
            cfg.profiles.insert("default".into(), config::Profile::default());
            let written = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
                eprintln!("  Try it: shutterlink ls");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, render_toml, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            apply_setting(profile, key, value)?;

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}' in {}", written.display());
            }
            Ok(())
        }
    }
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render config: {e}"))
}

fn apply_setting(profile: &mut config::Profile, key: &str, value: &str) -> Result<(), CliError> {
    let number = |field: &str| {
        value.parse::<u64>().map_err(|_| CliError::Validation {
            field: field.into(),
            reason: "must be a non-negative integer".into(),
        })
    };

    match key {
        "reqrep" => value.clone_into(&mut profile.reqrep),
        "publisher" => value.clone_into(&mut profile.publisher),
        "poll_interval_ms" | "poll-interval-ms" => {
            profile.poll_interval_ms = Some(number("poll_interval_ms")?);
        }
        "frame_slack" | "frame-slack" => profile.frame_slack = Some(number("frame_slack")?),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: reqrep, publisher, \
                     poll_interval_ms, frame_slack"
                ),
            });
        }
    }

    if matches!(key, "reqrep" | "publisher") {
        shutterlink_api::Endpoints::parse(&profile.reqrep, &profile.publisher).map_err(|e| {
            CliError::Validation {
                field: key.into(),
                reason: e.to_string(),
            }
        })?;
    }
    Ok(())
}
