use std::time::Duration;

use cadence_clicker::settings::{
    ClickButton, ClickKind, RepeatMode, Settings, SpeedUnit, TargetMode,
};
use cadence_clicker::theme::Theme;
use tempfile::tempdir;

#[test]
fn test_full_settings_file_parses() {
    let json = r#"
    {
        "speed_value": 120.0,
        "speed_unit": "cpm",
        "randomize_interval": true,
        "random_min_secs": 0.2,
        "random_max_secs": 0.9,
        "pre_start_delay_secs": 3.0,
        "click_kind": "double",
        "click_button": "right",
        "target": "fixed",
        "fixed_position": [800, 450],
        "repeat": "count",
        "repeat_count": 500,
        "start_stop_key": "F9",
        "pick_position_key": "F10",
        "pause_resume_key": "Space",
        "theme": "light"
    }
    "#;

    let settings: Settings = serde_json::from_str(json).unwrap();

    assert_eq!(settings.speed_value, 120.0);
    assert_eq!(settings.speed_unit, SpeedUnit::Cpm);
    assert!(settings.randomize_interval);
    assert_eq!(settings.click_kind, ClickKind::Double);
    assert_eq!(settings.click_button, ClickButton::Right);
    assert_eq!(settings.target, TargetMode::Fixed);
    assert_eq!(settings.fixed_position, Some((800, 450)));
    assert_eq!(settings.repeat, RepeatMode::Count);
    assert_eq!(settings.repeat_count, 500);
    assert_eq!(settings.start_stop_key, "F9");
    assert_eq!(settings.pause_resume_key, "Space");
    assert_eq!(settings.theme, Theme::Light);

    let plan = settings.click_plan().unwrap();
    // 120 clicks per minute comes out as one click every half second.
    assert_eq!(plan.interval, Duration::from_millis(500));
    assert_eq!(plan.pre_start_delay, Duration::from_secs(3));
    assert_eq!(plan.position, Some((800, 450)));
    assert_eq!(plan.repeat_limit, Some(500));
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    // Nested path: save() must create the parent directories.
    let path = dir.path().join("cadence-clicker").join("settings.json");

    let settings = Settings {
        speed_value: 50.0,
        speed_unit: SpeedUnit::Millis,
        target: TargetMode::Fixed,
        fixed_position: Some((10, 20)),
        repeat: RepeatMode::Count,
        repeat_count: 7,
        theme: Theme::Light,
        ..Settings::default()
    };

    settings.save(&path).unwrap();
    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let loaded = Settings::load(&dir.path().join("nope.json")).unwrap();
    assert_eq!(loaded, Settings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(&path).is_err());
}
