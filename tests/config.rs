//! Configuration tests
//!
//! Config paths, YAML/JSON loading and saving, and how a loaded config
//! shapes a session.

mod common;

use common::users;
use mention::config::{MentionConfig, ValueFormat};
use mention::config_paths;
use mention::model::{MentionValue, Segment, TokenType};
use mention::parser::ParseStrategy;
use mention::session::{MentionSession, SessionValue};
use mention::trigger::{TriggerConfig, TriggersInput};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("mention"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Load / Save Tests
// ========================================================================

fn sample_config() -> MentionConfig {
    MentionConfig {
        triggers: Some(TriggersInput::One("@,#".into())),
        trigger_configs: vec![TriggerConfig::new('#').with_token_type(TokenType::Info)],
        options: users(),
        parse_strategy: ParseStrategy::Options,
        multiline: true,
        max_rows: Some(4),
        placeholder: Some("Say hi".into()),
        value: Some("hi @bob".into()),
        value_format: ValueFormat::Segments,
        ..Default::default()
    }
}

fn assert_same(a: &MentionConfig, b: &MentionConfig) {
    assert_eq!(a.effective_triggers(), b.effective_triggers());
    assert_eq!(a.trigger_configs, b.trigger_configs);
    assert_eq!(a.options, b.options);
    assert_eq!(a.parse_strategy, b.parse_strategy);
    assert_eq!(a.multiline, b.multiline);
    assert_eq!(a.max_rows, b.max_rows);
    assert_eq!(a.placeholder, b.placeholder);
    assert_eq!(a.value, b.value);
    assert_eq!(a.value_format, b.value_format);
}

#[test]
fn test_yaml_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = sample_config();
    config.save_to(&path).unwrap();

    let loaded = MentionConfig::load_from(&path).unwrap();
    assert_same(&config, &loaded);
}

#[test]
fn test_json_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = sample_config();
    config.save_to(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.trim_start().starts_with('{'));
    let loaded = MentionConfig::load_from(&path).unwrap();
    assert_same(&config, &loaded);
}

#[test]
fn test_load_missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = MentionConfig::load_from(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config"));
}

#[test]
fn test_load_malformed_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "rows: [not a number").unwrap();
    let err = MentionConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn test_partial_yaml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "parseStrategy: options\noptions:\n  - value: 7\n    label: dana\n",
    )
    .unwrap();
    let config = MentionConfig::load_from(&path).unwrap();
    assert_eq!(config.parse_strategy, ParseStrategy::Options);
    assert_eq!(config.options[0].value, MentionValue::Int(7));
    assert_eq!(config.rows, 3);
    assert!(!config.multiline);
}

#[test]
fn test_malformed_model_keeps_rest_of_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "multiline: true\nplaceholder: Say hi\nmodel:\n  - type: bogus\n",
    )
    .unwrap();
    let config = MentionConfig::load_from(&path).unwrap();
    assert!(config.multiline);
    assert_eq!(config.placeholder.as_deref(), Some("Say hi"));
    assert_eq!(config.model, None);
}

// ========================================================================
// Config → Session
// ========================================================================

#[test]
fn test_loaded_config_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    sample_config().save_to(&path).unwrap();

    let session = MentionSession::new(MentionConfig::load_from(&path).unwrap());
    assert_eq!(session.text(), "hi @bob");
    assert_eq!(session.mentions()[0].value, MentionValue::Int(2));
    assert_eq!(session.placeholder(), None);
    match session.value() {
        SessionValue::Segments(segments) => {
            assert_eq!(segments[0], Segment::text("hi "));
            assert_eq!(segments.len(), 2);
        }
        other => panic!("expected segments, got {:?}", other),
    }
}

#[test]
fn test_placeholder_only_when_empty() {
    let session = MentionSession::new(MentionConfig {
        placeholder: Some("Say hi".into()),
        ..Default::default()
    });
    assert_eq!(session.placeholder(), Some("Say hi"));
}
