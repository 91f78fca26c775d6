use cncwarmup_settings::{
    ConfigError, MachineProfile, RampSettings, SettingsError, WarmupSettings,
};
use tempfile::TempDir;

fn custom_settings() -> WarmupSettings {
    let mut settings = WarmupSettings::default();
    settings.ramp = RampSettings {
        start_rpm: 800.0,
        finish_rpm: 6000.0,
        start_feedrate: 300.0,
        finish_feedrate: 1500.0,
        coolant: false,
        tool_call_num: 12,
        increment_steps: 20,
    };
    settings
        .machines
        .insert(MachineProfile::new("4", 1524.0, 762.0).with_name("Gantry"));
    settings
}

#[test]
fn test_toml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let settings = custom_settings();
    settings.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = WarmupSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.machines.get("4").unwrap().name, "Gantry");
}

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let settings = custom_settings();
    settings.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"increment_steps\": 20"));

    let loaded = WarmupSettings::load_from_file(&path).unwrap();
    assert_eq!(loaded.configuration_for("4").unwrap().tool_number, 12);
}

#[test]
fn test_hand_written_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.toml");
    std::fs::write(
        &path,
        r#"
[ramp]
finish_rpm = 4500.0
coolant = false

[[machines]]
id = "mill"
travel_x = 600.0
travel_y = 400.0
"#,
    )
    .unwrap();

    let settings = WarmupSettings::load_from_file(&path).unwrap();
    assert_eq!(settings.machines.ids().collect::<Vec<_>>(), vec!["mill"]);

    let config = settings.configuration_for("mill").unwrap();
    assert_eq!(config.travel_x, 600.0);
    assert_eq!(config.spindle_finish, 4500.0);
    assert_eq!(config.spindle_start, 500.0);
    assert!(!config.coolant_enabled);
}

#[test]
fn test_load_rejects_invalid_machine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "[[machines]]\nid = \"1\"\ntravel_x = -5.0\ntravel_y = 400.0\n",
    )
    .unwrap();

    let err = WarmupSettings::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::InvalidMachine { .. })
    ));
}

#[test]
fn test_load_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.ini");
    std::fs::write(&path, "").unwrap();

    let err = WarmupSettings::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = WarmupSettings::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_save_rejects_invalid_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");

    let mut settings = WarmupSettings::default();
    settings.ramp.increment_steps = 0;
    assert!(settings.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_load_or_default_with_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    custom_settings().save_to_file(&path).unwrap();

    let loaded = WarmupSettings::load_or_default(Some(&path)).unwrap();
    assert_eq!(loaded.ramp.finish_rpm, 6000.0);
}

#[test]
fn test_load_rejects_colliding_output_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[[machines]]
id = "cell 1"
travel_x = 600.0
travel_y = 400.0

[[machines]]
id = "cell_1"
travel_x = 800.0
travel_y = 400.0
"#,
    )
    .unwrap();

    let err = WarmupSettings::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::OutputNameCollision { .. })
    ));
}

#[test]
fn test_load_rejects_steps_finer_than_closing_guard() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[ramp]\nincrement_steps = 600\n",
    )
    .unwrap();

    // 508 mm over 600 steps leaves less than 1 mm before the origin on machine 1
    let err = WarmupSettings::load_from_file(&path).unwrap_err();
    match err {
        SettingsError::Configuration(inner) => assert_eq!(inner.field(), "step_density"),
        other => panic!("unexpected error: {:?}", other),
    }
}
