//! Loading `TourConfig` from TOML and JSON.

use std::io::Write;

use tourguide_core::{ConfigError, Placement, TourConfig};

#[test]
fn toml_overrides_and_defaults() {
    let config = TourConfig::from_toml_str(
        r#"
placement = "bottom"
animation = false
scroll_speed_ms = 250
"#,
    )
    .expect("valid toml");

    assert_eq!(config.placement, Placement::Bottom);
    assert!(!config.animation);
    assert_eq!(config.scroll_speed_ms, 250);
    assert_eq!(config.offset, 28.0);
    assert_eq!(config.next_label, "Next");
    assert!(config.backdrop);
}

#[test]
fn json_overrides() {
    let config =
        TourConfig::from_json_str(r#"{"placement":"left","finish_label":"Done","backdrop":false}"#)
            .expect("valid json");
    assert_eq!(config.placement, Placement::Left);
    assert_eq!(config.finish_label, "Done");
    assert!(!config.backdrop);
}

#[test]
fn empty_documents_are_defaults() {
    assert_eq!(TourConfig::from_toml_str("").expect("toml"), TourConfig::default());
    assert_eq!(TourConfig::from_json_str("{}").expect("json"), TourConfig::default());
}

#[test]
fn unknown_placement_is_a_parse_error() {
    let err = TourConfig::from_toml_str(r#"placement = "diagonal""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn validation_runs_after_parse() {
    let err = TourConfig::from_json_str(r#"{"offset": -4.0}"#).unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("offset"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn files_on_disk() {
    let mut toml_file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(toml_file, "placement = \"right\"").expect("write");
    let config = TourConfig::from_toml_file(toml_file.path()).expect("toml file");
    assert_eq!(config.placement, Placement::Right);

    let mut json_file = tempfile::NamedTempFile::new().expect("temp file");
    write!(json_file, r#"{{"offset": 12.5}}"#).expect("write");
    let config = TourConfig::from_json_file(json_file.path()).expect("json file");
    assert_eq!(config.offset, 12.5);
}

#[test]
fn missing_file_is_io_error() {
    let err = TourConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
