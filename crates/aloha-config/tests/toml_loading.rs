//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed env var and file manipulation.

use aloha_config::AlohaConfig;
use aloha_core::AuthorizationState;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_storage_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
settings_path = "/var/lib/aloha/settings.json"
collection_key = "pins"
"#,
        )?;

        let config: AlohaConfig = Figment::from(Serialized::defaults(AlohaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.storage.settings_path.to_str(),
            Some("/var/lib/aloha/settings.json")
        );
        assert_eq!(config.storage.collection_key, "pins");
        Ok(())
    });
}

#[test]
fn loads_monitoring_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[monitoring]
max_geofences = 5
simulate_supported = false
simulate_authorization = "authorized_when_in_use"
"#,
        )?;

        let config: AlohaConfig = Figment::from(Serialized::defaults(AlohaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.monitoring.max_geofences, 5);
        assert!(!config.monitoring.simulate_supported);
        assert_eq!(
            config.monitoring.simulate_authorization,
            AuthorizationState::AuthorizedWhenInUse
        );
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[events]
channel_capacity = 8
",
        )?;

        let config: AlohaConfig = Figment::from(Serialized::defaults(AlohaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.events.channel_capacity, 8);
        assert_eq!(config.monitoring.max_geofences, 20);
        assert_eq!(config.storage.collection_key, "savedItems");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[monitoring]
max_geofences = 5
",
        )?;
        jail.set_env("ALOHA_MONITORING__MAX_GEOFENCES", "7");

        let config: AlohaConfig = Figment::from(Serialized::defaults(AlohaConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ALOHA_").split("__"))
            .extract()?;

        assert_eq!(config.monitoring.max_geofences, 7);
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".aloha")?;
        jail.create_file(
            ".aloha/config.toml",
            r#"
[storage]
collection_key = "project_pins"
"#,
        )?;

        let config = AlohaConfig::load().expect("config loads");
        assert_eq!(config.storage.collection_key, "project_pins");
        Ok(())
    });
}

#[test]
fn load_rejects_zero_limit_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("ALOHA_MONITORING__MAX_GEOFENCES", "0");
        assert!(AlohaConfig::load().is_err());
        Ok(())
    });
}
