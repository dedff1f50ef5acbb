//! Script configuration persistence
//!
//! Configs are stored as pretty-printed JSON. Writes go through a temp file
//! and a rename so a crash never leaves a half-written config behind.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::ScriptConfig;

/// Write data atomically to a file
///
/// Creates a temporary file, writes the data, syncs, then renames
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    file.write_all(data).context("Failed to write data")?;

    file.sync_all().context("Failed to sync file")?;

    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    // Sync parent directory
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir = OpenOptions::new()
            .read(true)
            .open(parent)
            .with_context(|| format!("Failed to open directory: {:?}", parent))?;

        dir.sync_all().context("Failed to sync directory")?;
    }

    Ok(())
}

/// Persist a config file
pub fn write_config(path: &Path, config: &ScriptConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    write_atomic(path, json.as_bytes())
}

/// Load a config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<ScriptConfig> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    Ok(config)
}

/// Load a config file, falling back to defaults when it does not exist
pub fn load_or_default(path: &Path) -> Result<ScriptConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(ScriptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::version::HostVersion;
    use tempfile::TempDir;

    #[test]
    fn test_config_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskline.json");

        let config = ScriptConfig {
            resource_load_timeout_ms: 250,
            host_version: Some(HostVersion::V1_0_877_1),
            debug: true,
        };

        write_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.json");
        fs::write(&path, r#"{ "host_version": "1.0.335.2" }"#).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.host_version, Some(HostVersion::V1_0_335_2));
        assert_eq!(loaded.resource_load_timeout_ms, 1000);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, r#"{ "host_version": "0.0.1" }"#).unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = load_or_default(&temp.path().join("absent.json")).unwrap();
        assert_eq!(loaded, ScriptConfig::default());
    }
}
