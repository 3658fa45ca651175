use std::{env, fs};

use octofhir_booking::{ConfigOverrides, load_config, load_config_with_overrides};

#[test]
fn config_parsing_env_and_cli_overrides() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("octofhir-book.toml");

    let toml_content = r#"
[server]
base_url = "http://localhost:8080/fhir"

[appointment]
identifier_system = "urn:oid:1.2.3"
identifier_value = "booking-1"

[search]
page_size = 25

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");
    let path = path.to_str().unwrap();

    // 1) File values parse
    let cfg = load_config(Some(path)).expect("should parse config");
    assert_eq!(cfg.server.base_url, "http://localhost:8080/fhir");
    assert_eq!(cfg.appointment.identifier_system, "urn:oid:1.2.3");
    assert_eq!(cfg.appointment.identifier_value, "booking-1");
    assert_eq!(cfg.search.page_size, Some(25));
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override wins over file
    unsafe {
        env::set_var("OCTOFHIR_BOOKING__SEARCH__PAGE_SIZE", "40");
    }
    let cfg_env = load_config(Some(path)).expect("should parse config with env overrides");
    assert_eq!(cfg_env.search.page_size, Some(40));

    // 3) CLI override wins over env
    let overrides = ConfigOverrides {
        page_size: Some(7),
        base_url: Some("https://fhir.example.org/r4".into()),
        ..Default::default()
    };
    let cfg_cli = load_config_with_overrides(Some(path), &overrides).expect("cli overrides");
    assert_eq!(cfg_cli.search.page_size, Some(7));
    assert_eq!(cfg_cli.server.base_url, "https://fhir.example.org/r4");
    assert_eq!(cfg_cli.appointment.identifier_value, "booking-1");

    unsafe {
        env::remove_var("OCTOFHIR_BOOKING__SEARCH__PAGE_SIZE");
    }

    // 4) Invalid values are rejected
    let bad_path = dir.path().join("bad.toml");
    fs::write(&bad_path, "[search]\npage_size = 0\n").expect("write bad toml");
    let err = load_config(bad_path.to_str()).unwrap_err();
    assert!(err.contains("page_size"), "unexpected error: {err}");

    // 5) An explicit path must exist
    let missing = dir.path().join("missing.toml");
    let err = load_config(missing.to_str()).unwrap_err();
    assert!(err.contains("not found"), "unexpected error: {err}");
}
