use aloha_geofence::GeofenceError;

use crate::cli::{GlobalFlags, RemoveArgs};
use crate::commands::list::GeofenceRow;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aloha remove`.
///
/// Removing an identifier that is not in the collection changes nothing and
/// is reported as a note, not a failure.
pub async fn handle(
    args: &RemoveArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match ctx.manager.remove(&args.identifier).await {
        Ok(removed) => output(&GeofenceRow::from(&removed), flags.format),
        Err(GeofenceError::NotFound(identifier)) => {
            if !flags.quiet {
                eprintln!("note: no geofence with identifier '{identifier}'; nothing removed");
            }
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
