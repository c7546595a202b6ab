use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::List => commands::list::handle(ctx, flags).await,
        Commands::Add(args) => commands::add::handle(&args, ctx, flags).await,
        Commands::Remove(args) => commands::remove::handle(&args, ctx, flags).await,
        Commands::Status => commands::status::handle(ctx, flags).await,
    }
}
