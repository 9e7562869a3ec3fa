use hookd_domain::config::{CliOverrides, Config};

#[test]
fn config_round_trips_through_toml() {
    let toml_src = r#"
        [server]
        domain = "hookd.test.local"

        [server.dns]
        port = 5353

        [eviction]
        interaction_ttl = "1h"
        hook_ttl = "24h"
        max_per_hook = 500
        max_memory_mb = 256
        cleanup_interval = "10s"
    "#;
    let config: Config = toml::from_str(toml_src).unwrap();
    assert_eq!(config.server.domain, "hookd.test.local");
    assert_eq!(config.server.dns.port, 5353);
    assert_eq!(config.eviction.max_per_hook, 500);
    assert_eq!(config.eviction.interaction_ttl.as_secs(), 3600);
}

#[test]
fn load_falls_back_to_defaults_when_no_file_present() {
    let config = Config::load(None, CliOverrides {
        domain: Some("cli.test.local".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(config.server.domain, "cli.test.local");
    assert!(!config.server.api.auth_token.is_empty());
}
