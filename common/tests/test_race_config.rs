// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    geometry::Point,
    race_config::{ConfigError, DirectionCheck, RaceConfig, RaceRules, VehicleConfig},
    test_helper::track::{get_race_config, get_race_config_as_json},
};
use std::time::Duration;

#[test]
pub fn deserialize_race_config_from_json() {
    let config = RaceConfig::from_json(get_race_config_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(config, get_race_config());
}

#[test]
pub fn missing_sections_fall_back_to_defaults() {
    let json = r#"
    {
        "track": { "name": "Line", "centerline": [{ "x": 0, "y": 0 }, { "x": 100, "y": 0 }], "width": 5 },
        "finish_zone": { "center": { "x": 10, "y": 0 }, "width": 10, "height": 10 },
        "checkpoint_zone": { "center": { "x": 60, "y": 0 }, "width": 10, "height": 10 }
    }
    "#;
    let config = RaceConfig::from_json(json)
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));

    assert_eq!(config.rules, RaceRules::default());
    assert_eq!(config.direction_check, DirectionCheck::XIncreasing);
    assert_eq!(config.track.start_point(), Point::new(0.0, 0.0));
    assert!(config.vehicles.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
pub fn negative_durations_are_rejected() {
    let json = get_race_config_as_json().replace("\"cooldown_time\": 2.0", "\"cooldown_time\": -1.0");
    assert!(matches!(
        RaceConfig::from_json(&json),
        Err(ConfigError::Json(_))
    ));
}

#[test]
pub fn validation_rejects_setup_mistakes() {
    let mut config = get_race_config();
    config.rules.total_laps = 0;
    assert!(matches!(config.validate(), Err(ConfigError::NoLaps)));

    let mut config = get_race_config();
    config.checkpoint_zone.width = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyZone("checkpoint"))
    ));

    let mut config = get_race_config();
    config.marker.focal_length = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidMarkerModel("focal_length"))
    ));

    let mut config = get_race_config();
    config.vehicles.push(VehicleConfig {
        marker_id: 1,
        name: "Copy".to_string(),
        color: Default::default(),
    });
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicateMarker(1))
    ));
}

#[test]
pub fn bundled_oval_config_is_valid() {
    let config = RaceConfig::from_json(include_str!("../../assets/race.json"))
        .unwrap_or_else(|e| panic!("Failed to deserialize the bundled config. Reason: {e}"));
    assert!(config.validate().is_ok());
    assert_eq!(config.rules.cooldown_time, Duration::from_secs(2));
    assert_eq!(config.track.centerline.len(), 16);
}
