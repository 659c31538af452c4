use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        logging: LoggingOverrides {
            log_level: Some("debug".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_match_development_setup() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 3001);
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.database.url, "sqlite://folio.db?mode=rwc");
    assert_eq!(settings.database.max_connections.get(), 5);
    assert_eq!(settings.environment, Environment::Development);
    assert_eq!(settings.rate_limit.window_seconds.get(), 900);
    assert_eq!(settings.rate_limit.max_requests.get(), 100);
    assert_eq!(settings.client.api_url.as_str(), "http://localhost:3001/api/");
    assert!(!settings.client.simulate_latency);
    assert_eq!(
        settings.client.latency.random_user,
        Duration::from_millis(1500)
    );
    assert_eq!(settings.seed.users.get(), 10);
    assert_eq!(settings.seed.posts_per_user.get(), 2);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        logging: LoggingOverrides {
            log_json: Some(true),
            ..Default::default()
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn environment_accepts_production_alias() {
    let raw = RawSettings {
        environment: Some("PROD".to_string()),
        ..Default::default()
    };
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.environment.is_production());
}

#[test]
fn unknown_environment_is_rejected() {
    let raw = RawSettings {
        environment: Some("staging".to_string()),
        ..Default::default()
    };
    let err = Settings::from_raw(raw).expect_err("staging is not supported");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "environment",
            ..
        }
    ));
}

#[test]
fn zero_rate_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.rate_limit.max_requests = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero ceiling");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "rate_limit.max_requests",
            ..
        }
    ));
}

#[test]
fn api_url_gains_trailing_slash() {
    let url = parse_api_url("http://example.test/api").expect("valid url");
    assert_eq!(
        url.join("posts/7").expect("join").as_str(),
        "http://example.test/api/posts/7"
    );

    let already = parse_api_url("http://example.test/api/").expect("valid url");
    assert_eq!(already.as_str(), "http://example.test/api/");

    assert!(parse_api_url("not a url").is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["folio"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "folio",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "sqlite::memory:",
        "--environment",
        "production",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("sqlite::memory:")
            );
            assert_eq!(serve.overrides.environment.as_deref(), Some("production"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_seed_arguments() {
    let args = CliArgs::parse_from(["folio", "seed", "--users", "3", "--posts-per-user", "4"]);

    match args.command.expect("seed command") {
        Command::Seed(seed) => {
            let mut raw = RawSettings::default();
            raw.apply_seed_overrides(&seed);
            let settings = Settings::from_raw(raw).expect("valid settings");
            assert_eq!(settings.seed.users.get(), 3);
            assert_eq!(settings.seed.posts_per_user.get(), 4);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_browse_arguments() {
    let args = CliArgs::parse_from([
        "folio",
        "browse",
        "--api-url",
        "http://10.0.0.2:3001/api",
        "--simulate-latency=true",
    ]);

    match args.command.expect("browse command") {
        Command::Browse(browse) => {
            let mut raw = RawSettings::default();
            raw.apply_browse_overrides(&browse);
            let settings = Settings::from_raw(raw).expect("valid settings");
            assert_eq!(
                settings.client.api_url.as_str(),
                "http://10.0.0.2:3001/api/"
            );
            assert!(settings.client.simulate_latency);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
#[serial_test::serial]
fn environment_variables_feed_the_seed_command() {
    // SAFETY: serialized with every other test that touches the environment.
    unsafe {
        std::env::set_var("FOLIO__DATABASE__URL", "sqlite://from-env.db?mode=rwc");
    }

    let args = CliArgs::parse_from(["folio", "seed", "--users", "3"]);
    let settings = load(&args);

    unsafe {
        std::env::remove_var("FOLIO__DATABASE__URL");
    }

    let settings = settings.expect("settings load");
    assert_eq!(settings.database.url, "sqlite://from-env.db?mode=rwc");
    assert_eq!(settings.seed.users.get(), 3);
    assert_eq!(settings.seed.posts_per_user.get(), 2);
}
