use linekit_settings::{Config, SettingsError};
use tempfile::TempDir;

fn customized() -> Config {
    let mut config = Config::default();
    config.defaults.grid_color = "#333333".to_string();
    config.defaults.show_grid = true;
    config.editor.hit_tolerance = 12.5;
    config.logging.level = "linekit=debug".to_string();
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = customized();
    config.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = customized();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\ngrid_size = -2.0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.defaults.line_color = "red".to_string();
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_load_if_exists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    assert_eq!(Config::load_if_exists(&path).unwrap(), None);

    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_if_exists(&path).unwrap(), Some(config));
}
