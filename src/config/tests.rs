use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn listing_cache_defaults_match_the_admin_console() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.listing_cache.ttl, Duration::from_secs(30));
    assert_eq!(settings.listing_cache.page_size.get(), 9);
}

#[test]
fn listing_cache_ttl_rejects_zero() {
    let mut raw = RawSettings::default();
    raw.listing_cache.ttl_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero TTL rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "listing_cache.ttl_seconds",
            ..
        }
    ));
}

#[test]
fn uploads_limit_defaults_to_5_mib() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.uploads.max_bytes.get(), DEFAULT_UPLOAD_LIMIT_BYTES);
}

#[test]
fn uploads_limit_can_be_overridden_via_cli() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        uploads_max_bytes: Some(1_572_864),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.max_bytes.get(), 1_572_864);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["bytebrief"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn session_cookie_name_is_configurable() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        auth_session_cookie: Some("brief_admin".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.auth.session_cookie, "brief_admin");
}

#[test]
fn blank_database_url_is_treated_as_unset() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}
