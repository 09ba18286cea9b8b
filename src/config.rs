// to be loaded on startup and saved on quit; remembers mixer tweaks
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const PULSEBOX_DIR: &str = ".pulsebox";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub master_volume: f32,
    pub resonance: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            resonance: 0.5,
        }
    }
}

// <dir>/.pulsebox/config.json
fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(PULSEBOX_DIR).join(CONFIG_FILE)
}

pub fn load_config(dir: &Path) -> Option<Config> {
    let data = std::fs::read_to_string(config_file_path(dir)).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_config(dir: &Path, config: &Config) -> anyhow::Result<()> {
    let path = config_file_path(dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("pulsebox-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        assert!(load_config(&dir).is_none());

        let config = Config {
            master_volume: 0.7,
            resonance: 1.2,
        };
        save_config(&dir, &config).unwrap();
        assert_eq!(load_config(&dir), Some(config));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
