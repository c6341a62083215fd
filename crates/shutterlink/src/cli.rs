//! Clap derive structures for the `shutterlink` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shutterlink -- drive a camera controller from the command line
#[derive(Debug, Parser)]
#[command(
    name = "shutterlink",
    version,
    about = "Control a camera controller from the command line",
    long_about = "Talks to a running camera controller over its request/reply and\n\
        publisher endpoints: list cameras and photos, trigger captures,\n\
        change camera properties, and watch events as they arrive.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "SHUTTERLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Request/reply endpoint (overrides profile)
    #[arg(long, env = "SHUTTERLINK_REQREP", global = true, value_name = "ENDPOINT")]
    pub reqrep: Option<String>,

    /// Publisher endpoint (overrides profile)
    #[arg(long, env = "SHUTTERLINK_PUBLISHER", global = true, value_name = "ENDPOINT")]
    pub publisher: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHUTTERLINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation for destructive commands
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List cameras known to the controller
    #[command(alias = "cameras")]
    Ls(SelectionArgs),

    /// List captured photos
    Photos,

    /// Print controller events as they arrive
    Listen(ListenArgs),

    /// Capture a photo on the selected cameras
    #[command(alias = "trigger")]
    Shoot(ShootArgs),

    /// Change a camera property
    SetProperty(SetPropertyArgs),

    /// Show a camera property of the first selected camera
    GetProperty(GetPropertyArgs),

    /// Set file naming options (sequence, batch, unique tag)
    SetOptions(SetOptionsArgs),

    /// Connect the selected cameras
    Connect(SelectionArgs),

    /// Disconnect the selected cameras
    Disconnect(SelectionArgs),

    /// Run autofocus on the selected cameras
    #[command(alias = "af")]
    Autofocus(SelectionArgs),

    /// Download photos from the cameras to the controller
    Download(DownloadArgs),

    /// Deactivate the controller's license on this machine
    Deactivate,

    /// Run connect, autofocus, shoot and download on one camera, end to end
    Test(TestArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Selection Arguments ───────────────────────────────────────

/// Which cameras a command targets. No flag means every camera.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Target a camera by key (repeat for several)
    #[arg(long = "camera", short = 'c', value_name = "KEY", conflicts_with = "group")]
    pub cameras: Vec<String>,

    /// Target every camera in a group
    #[arg(long, short = 'g', value_name = "TAG")]
    pub group: Option<String>,
}

// ── Listen ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Print only the timestamp, event id, and camera or photo key
    #[arg(long, short = 'b')]
    pub brief: bool,

    /// Exit after this many events
    #[arg(long, short = 'n', value_name = "N")]
    pub count: Option<u64>,

    /// Synchronise first so the store is populated
    #[arg(long)]
    pub sync: bool,
}

// ── Capture ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShootArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Hold the shutter open for this many seconds (bulb mode)
    #[arg(long, value_name = "SECS")]
    pub bulb: Option<u32>,

    /// Tag recorded on the resulting photos
    #[arg(long, value_name = "TAG")]
    pub origin: Option<String>,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Photo keys to download (none means every photo)
    #[arg(value_name = "PHOTO_KEY")]
    pub photos: Vec<String>,
}

#[derive(Debug, Args)]
pub struct TestArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Number of capture cycles to run
    #[arg(
        long,
        short = 'l',
        value_name = "NUM",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub loops: u32,
}

// ── Properties ───────────────────────────────────────────────────────

/// Camera properties the controller accepts for `SetProperty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyName {
    #[value(name = "Aperture", alias = "aperture")]
    Aperture,
    #[value(name = "ShutterSpeed", alias = "shutter-speed")]
    ShutterSpeed,
    #[value(name = "ISO", alias = "iso")]
    Iso,
    #[value(name = "Exposure", alias = "exposure")]
    Exposure,
    #[value(name = "Quality", alias = "quality")]
    Quality,
    #[value(name = "ProgramMode", alias = "program-mode")]
    ProgramMode,
    #[value(name = "MeteringMode", alias = "metering-mode")]
    MeteringMode,
    #[value(name = "FocusMode", alias = "focus-mode")]
    FocusMode,
    #[value(name = "DriveMode", alias = "drive-mode")]
    DriveMode,
    #[value(name = "WhiteBalance", alias = "white-balance")]
    WhiteBalance,
    #[value(name = "Storage", alias = "storage")]
    Storage,
    #[value(name = "MirrorLockup", alias = "mirror-lockup")]
    MirrorLockup,
}

impl PropertyName {
    /// The `CameraPropertyType` string sent on the wire.
    #[allow(dead_code)]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Aperture => "Aperture",
            Self::ShutterSpeed => "ShutterSpeed",
            Self::Iso => "ISO",
            Self::Exposure => "Exposure",
            Self::Quality => "Quality",
            Self::ProgramMode => "ProgramMode",
            Self::MeteringMode => "MeteringMode",
            Self::FocusMode => "FocusMode",
            Self::DriveMode => "DriveMode",
            Self::WhiteBalance => "WhiteBalance",
            Self::Storage => "Storage",
            Self::MirrorLockup => "MirrorLockup",
        }
    }
}

#[derive(Debug, Args)]
pub struct SetPropertyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Property to change
    #[arg(value_enum)]
    pub property: PropertyName,

    /// New value, as the camera reports it (e.g. "1/125", "400")
    pub value: String,
}

#[derive(Debug, Args)]
pub struct GetPropertyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Property to read
    #[arg(value_enum)]
    pub property: PropertyName,

    /// Also show the values the camera accepts
    #[arg(long, short = 'r')]
    pub range: bool,
}

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetOptionsArgs {
    /// Grid sequence number
    #[arg(long, short = 's', value_name = "N")]
    pub sequence: Option<u32>,

    /// Grid batch number
    #[arg(long, short = 'b', value_name = "N")]
    pub batch: Option<u32>,

    /// Grid unique tag
    #[arg(long, short = 'u', value_name = "TAG")]
    pub unique: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with a default profile
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a value on the active profile
    Set {
        /// reqrep, publisher, poll_interval_ms or frame_slack
        key: String,
        value: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
