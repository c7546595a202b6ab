use aloha_config::AlohaConfig;
use aloha_geofence::{GeofenceManager, InitializeReport, ManagerOptions, MapPresenter};
use aloha_monitor::{MonitoringWarning, PlatformEvent, SimulatedProvider};
use aloha_store::SettingsStore;
use anyhow::Context;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::GlobalFlags;
use crate::surface::TracingSurface;

pub type Manager = GeofenceManager<SettingsStore, SimulatedProvider>;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: AlohaConfig,
    pub manager: Manager,
    pub provider: SimulatedProvider,
    pub startup: InitializeReport,
    platform_events: mpsc::UnboundedReceiver<PlatformEvent>,
    presenter: JoinHandle<MapPresenter<TracingSurface>>,
}

impl AppContext {
    /// Open the settings store, arm the simulated provider and load the
    /// persisted collection.
    pub async fn init(config: AlohaConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let store = SettingsStore::new(
            config.storage.settings_path.clone(),
            config.storage.collection_key.clone(),
        );
        let (provider, platform_events) = SimulatedProvider::new(
            config.monitoring.simulate_supported,
            config.monitoring.simulate_authorization,
        );

        let manager = GeofenceManager::new(store, provider.clone(), ManagerOptions::from(&config));
        let presenter = tokio::spawn(
            MapPresenter::new(TracingSurface::default())
                .run(manager.subscribe(), manager.downgrade()),
        );

        let startup = manager.initialize().await.with_context(|| {
            format!(
                "failed to load geofences from {}",
                config.storage.settings_path.display()
            )
        })?;

        if startup.skipped > 0 && !flags.quiet {
            eprintln!(
                "warning: skipped {} unreadable geofence record(s) in {}",
                startup.skipped,
                config.storage.settings_path.display()
            );
        }
        if !flags.quiet {
            for line in startup_warning_lines(&startup) {
                eprintln!("{line}");
            }
        }

        let mut ctx = Self {
            config,
            manager,
            provider,
            startup,
            platform_events,
            presenter,
        };
        ctx.drain_platform_events(flags).await;
        Ok(ctx)
    }

    /// Feed platform notifications queued so far into the manager.
    ///
    /// The CLI runs one command per process, so events are drained at fixed
    /// points instead of by a background task.
    pub async fn drain_platform_events(&mut self, flags: &GlobalFlags) {
        while let Ok(event) = self.platform_events.try_recv() {
            if let PlatformEvent::MonitoringFailed { identifier, error } = &event {
                if !flags.quiet {
                    eprintln!("warning: monitoring failed for {identifier}: {error}");
                }
            }
            self.manager.apply_platform_event(event).await;
        }
    }

    /// Apply late platform events, then close the event channel and wait for
    /// the map presenter to finish.
    pub async fn shutdown(mut self, flags: &GlobalFlags) {
        self.drain_platform_events(flags).await;
        let Self {
            manager, presenter, ..
        } = self;
        drop(manager);
        match presenter.await {
            Ok(presenter) => {
                let (pins, circles) = presenter.surface().counts();
                tracing::debug!(pins, circles, "map presenter stopped");
            }
            Err(error) => tracing::warn!(%error, "map presenter task failed"),
        }
    }
}

/// One line per distinct monitoring warning raised while re-arming.
pub fn startup_warning_lines(report: &InitializeReport) -> Vec<String> {
    let mut grouped: Vec<(MonitoringWarning, usize)> = Vec::new();
    for (_, warning) in &report.warnings {
        match grouped.iter_mut().find(|(seen, _)| seen == warning) {
            Some((_, count)) => *count += 1,
            None => grouped.push((*warning, 1)),
        }
    }
    grouped
        .into_iter()
        .map(|(warning, count)| format!("warning: {warning} ({count} geofence(s))"))
        .collect()
}

#[cfg(test)]
mod tests {
    use aloha_config::AlohaConfig;
    use aloha_core::{AuthorizationState, Coordinate, EventType, Geofence};
    use pretty_assertions::assert_eq;

    use super::AppContext;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Raw,
            quiet: true,
            verbose: false,
            settings: None,
        }
    }

    fn config_in(dir: &tempfile::TempDir) -> AlohaConfig {
        let mut config = AlohaConfig::default();
        config.storage.settings_path = dir.path().join("settings.json");
        config
    }

    #[tokio::test]
    async fn added_geofence_survives_a_new_context() {
        let dir = tempfile::tempdir().expect("tempdir");

        let ctx = AppContext::init(config_in(&dir), &flags()).await.expect("init");
        let geofence = Geofence::with_identifier(
            "geo-0000aa01",
            Coordinate::new(21.3069, -157.8583),
            120.0,
            "Surf check",
            EventType::OnEntry,
        )
        .expect("valid geofence");
        ctx.manager.add(geofence.clone()).await.expect("add");
        ctx.shutdown(&flags()).await;

        let ctx = AppContext::init(config_in(&dir), &flags()).await.expect("reload");
        assert_eq!(ctx.startup.loaded, 1);
        assert_eq!(ctx.manager.all().await, vec![geofence]);
        assert_eq!(
            ctx.provider
                .regions()
                .into_iter()
                .map(|region| region.identifier)
                .collect::<Vec<_>>(),
            vec!["geo-0000aa01".to_string()]
        );
        ctx.shutdown(&flags()).await;
    }

    #[tokio::test]
    async fn undetermined_permission_is_requested_at_startup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config_in(&dir);
        config.monitoring.simulate_authorization = AuthorizationState::NotDetermined;

        let ctx = AppContext::init(config, &flags()).await.expect("init");
        assert_eq!(
            ctx.manager.authorization_state().await,
            AuthorizationState::AuthorizedAlways
        );
        ctx.shutdown(&flags()).await;
    }

    #[tokio::test]
    async fn restart_without_monitoring_reports_one_warning_line() {
        let dir = tempfile::tempdir().expect("tempdir");

        let ctx = AppContext::init(config_in(&dir), &flags()).await.expect("init");
        for id in ["geo-0000bb01", "geo-0000bb02"] {
            let geofence =
                Geofence::with_identifier(id, Coordinate::new(1.0, 2.0), 30.0, "", EventType::OnExit)
                    .expect("valid geofence");
            ctx.manager.add(geofence).await.expect("add");
        }
        ctx.shutdown(&flags()).await;

        let mut config = config_in(&dir);
        config.monitoring.simulate_supported = false;
        let ctx = AppContext::init(config, &flags()).await.expect("reload");

        assert_eq!(ctx.startup.warnings.len(), 2);
        let lines = super::startup_warning_lines(&ctx.startup);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("warning: geofencing is not supported"));
        assert!(lines[0].ends_with("(2 geofence(s))"));
        ctx.shutdown(&flags()).await;
    }
}
