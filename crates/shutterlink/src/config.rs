//! CLI configuration: thin wrapper around `shutterlink_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `--profile`, `--reqrep` and `--publisher` overrides.

use shutterlink_api::Endpoints;
use shutterlink_core::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use shutterlink_config::{
    Config, Profile, config_path, load_config_or_default, profile_to_session_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Look up the active profile and apply endpoint overrides
/// (flag > env > profile).
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);
    let mut profile = config.profile(&name).map_err(|_| CliError::ProfileNotFound {
        available: available_profiles(config),
        name,
    })?;

    if let Some(ref reqrep) = global.reqrep {
        profile.reqrep.clone_from(reqrep);
    }
    if let Some(ref publisher) = global.publisher {
        profile.publisher.clone_from(publisher);
    }
    Ok(profile)
}

/// Endpoints and session tuning for the active profile.
pub fn resolve_connection(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(Endpoints, SessionConfig), CliError> {
    let profile = resolve_profile(global, config)?;
    let endpoints = shutterlink_config::profile_endpoints(&profile)?;
    let session = profile_to_session_config(&profile, &config.defaults);
    Ok((endpoints, session))
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if !names.contains(&"default") {
        names.insert(0, "default");
    }
    names.join(", ")
}
