use super::{apply_overrides, load_settings, parse_flag, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = env::temp_dir().join("menu_demo_settings_that_do_not_exist.toml");
    let settings = load_settings(&path).expect("settings");
    assert_eq!(settings.service.playlists.len(), 2);
    assert!(settings.menu.optimistic_subscribe_notice);
}

#[test]
fn file_values_override_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("menu_demo_settings_{suffix}.toml"));
    fs::write(
        &path,
        r#"
        [menu]
        notify_on_fetch_failure = true

        [menu.labels]
        share = "Send to"

        [service]
        latency_ms = 5
        signed_in = false

        [[service.playlists]]
        id = "P1"
        title = "Road trip"
        videos = ["v1"]
        "#,
    )
    .expect("write settings");

    let settings = load_settings(&path).expect("settings");
    fs::remove_file(&path).expect("cleanup");

    assert!(settings.menu.notify_on_fetch_failure);
    assert_eq!(settings.menu.labels.share, "Send to");
    assert_eq!(settings.service.latency_ms, 5);
    assert!(!settings.service.signed_in);
    assert_eq!(settings.service.playlists.len(), 1);
    assert_eq!(settings.service.playlists[0].videos, vec!["v1".to_string()]);
}

#[test]
fn malformed_file_is_reported() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("menu_demo_bad_settings_{suffix}.toml"));
    fs::write(&path, "[service]\nlatency_ms = \"slow\"\n").expect("write settings");

    let err = load_settings(&path).expect_err("must fail");
    fs::remove_file(&path).expect("cleanup");

    assert!(err.to_string().contains("failed to parse settings file"));
}

#[test]
fn unreadable_path_is_reported_instead_of_defaulted() {
    let err = load_settings(&env::temp_dir()).expect_err("directory is not a settings file");
    assert!(err.to_string().contains("failed to read settings file"));
}

#[test]
fn env_overrides_win_over_file_values() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__LATENCY_MS", "0"),
        ("APP__SIGNED_IN", "off"),
        ("APP__OPTIMISTIC_SUBSCRIBE_NOTICE", "false"),
        ("APP__FAIL_FETCH", "maybe"),
    ]);
    let mut settings = Settings::default();

    apply_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.service.latency_ms, 0);
    assert!(!settings.service.signed_in);
    assert!(!settings.menu.optimistic_subscribe_notice);
    assert!(!settings.service.fail_fetch);
}

#[test]
fn flag_parsing_accepts_common_spellings() {
    assert_eq!(parse_flag(" YES "), Some(true));
    assert_eq!(parse_flag("0"), Some(false));
    assert_eq!(parse_flag("sometimes"), None);
}
