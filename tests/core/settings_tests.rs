//! Tests for user settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Deserialization of partial files
//! - Save/load roundtrip
//! - Backend address resolution

use crate::common::scratch_dir;
use lapview::api::client::DEFAULT_API_BASE;
use lapview::settings::Settings;

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.version, 1);
    assert_eq!(settings.api_base_url, None);
    assert!(settings.exclude_outliers);
    assert_eq!(settings.viewport_width, 800);
}

#[test]
fn test_settings_deserialize_missing_fields() {
    let settings: Settings = serde_json::from_str(r#"{"exclude_outliers":false}"#).unwrap();
    assert_eq!(settings.version, 1);
    assert!(!settings.exclude_outliers);
    assert_eq!(settings.viewport_width, 800);
}

// ============================================
// Persistence Tests
// ============================================

#[test]
fn test_settings_save_and_load_roundtrip() {
    let dir = scratch_dir("settings-roundtrip");
    let path = dir.join("nested").join("settings.json");

    let settings = Settings {
        api_base_url: Some("http://f1.local:9000".to_string()),
        exclude_outliers: false,
        viewport_width: 1440,
        ..Default::default()
    };
    settings.save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path), settings);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_settings_missing_file_gives_defaults() {
    let dir = scratch_dir("settings-missing");
    assert_eq!(Settings::load_from(&dir.join("settings.json")), Settings::default());
}

#[test]
fn test_settings_malformed_file_gives_defaults() {
    let dir = scratch_dir("settings-malformed");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(Settings::load_from(&path), Settings::default());
    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================
// Backend Address Tests
// ============================================

#[test]
fn test_api_url_precedence() {
    let mut settings = Settings::default();
    assert_eq!(settings.api_base_url_with(None), DEFAULT_API_BASE);

    settings.api_base_url = Some("http://saved:8000".to_string());
    assert_eq!(settings.api_base_url_with(None), "http://saved:8000");
    assert_eq!(
        settings.api_base_url_with(Some("http://env:8000".to_string())),
        "http://env:8000"
    );
    assert_eq!(settings.api_base_url_with(Some("  ".to_string())), "http://saved:8000");
}
