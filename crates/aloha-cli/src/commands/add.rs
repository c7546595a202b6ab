use aloha_core::{Coordinate, EventType, Geofence};
use anyhow::Context;

use crate::cli::{AddArgs, GlobalFlags};
use crate::commands::list::GeofenceRow;
use crate::context::AppContext;
use crate::output::output;

/// Build the geofence described by `aloha add` arguments.
pub fn geofence_from_args(args: &AddArgs) -> anyhow::Result<Geofence> {
    let center = Coordinate::new(args.lat, args.lon);
    let event_type = EventType::from(args.trigger);
    let geofence = match &args.id {
        Some(identifier) => {
            Geofence::with_identifier(identifier.clone(), center, args.radius, &args.note, event_type)
        }
        None => Geofence::new(center, args.radius, &args.note, event_type),
    };
    geofence.context("invalid geofence")
}

/// Handle `aloha add`.
pub async fn handle(args: &AddArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let geofence = geofence_from_args(args)?;
    let receipt = ctx.manager.add(geofence).await?;

    if let Some(warning) = receipt.warning() {
        if !flags.quiet {
            eprintln!("warning: {warning}");
        }
    }
    output(&GeofenceRow::from(&receipt.geofence), flags.format)
}

#[cfg(test)]
mod tests {
    use aloha_core::EventType;
    use pretty_assertions::assert_eq;

    use super::geofence_from_args;
    use crate::cli::AddArgs;
    use crate::cli::root_commands::Trigger;

    fn args(id: Option<&str>, radius: f64) -> AddArgs {
        AddArgs {
            lat: 21.3069,
            lon: -157.8583,
            radius,
            note: "Aloha".to_string(),
            trigger: Trigger::Exit,
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn explicit_identifier_is_kept() {
        let geofence = geofence_from_args(&args(Some("geo-cafebabe"), 50.0)).expect("valid");
        assert_eq!(geofence.identifier(), "geo-cafebabe");
        assert_eq!(geofence.event_type(), EventType::OnExit);
        assert_eq!(geofence.note(), "Aloha");
    }

    #[test]
    fn generated_identifier_has_prefix() {
        let geofence = geofence_from_args(&args(None, 50.0)).expect("valid");
        assert!(geofence.identifier().starts_with("geo-"));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let error = geofence_from_args(&args(None, 0.0)).expect_err("zero radius must fail");
        assert!(format!("{error:#}").contains("radius"));
    }
}
