use aloha_core::EventType;
use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List saved geofences.
    List,
    /// Drop a new geofence.
    Add(AddArgs),
    /// Remove a geofence by identifier.
    Remove(RemoveArgs),
    /// Show monitoring capability, permission and registered regions.
    Status,
}

impl Commands {
    /// Whether the command rewrites the settings file.
    #[must_use]
    pub const fn requires_write_lock(&self) -> bool {
        matches!(self, Self::Add(_) | Self::Remove(_))
    }
}

/// Which boundary crossing notifies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Trigger {
    Entry,
    Exit,
}

impl From<Trigger> for EventType {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Entry => Self::OnEntry,
            Trigger::Exit => Self::OnExit,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct AddArgs {
    /// Latitude of the center, in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the center, in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Radius in meters.
    #[arg(long)]
    pub radius: f64,

    /// Message shown when the geofence fires.
    #[arg(long, default_value = "")]
    pub note: String,

    #[arg(long = "on", value_enum, default_value = "entry")]
    pub trigger: Trigger,

    /// Use this identifier instead of generating one.
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RemoveArgs {
    pub identifier: String,
}
