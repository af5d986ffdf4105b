use courtship::{AssetRef, Assets, Settings, SettingsError, Tuning};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Corner of the window holding the reset button.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "top-left")]
    NorthWest,
    #[default]
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "top-right")]
    NorthEast,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "bottom-left")]
    SouthWest,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "bottom-right")]
    SouthEast,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub question: String,
    pub decline_caption: String,
    pub accept_caption: String,
    pub reset_corner: Corner,
    /// Relative asset references are resolved against this directory.
    pub asset_dir: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            question: "Will you be my Valentine?".to_string(),
            decline_caption: "Stop messing around with me".to_string(),
            accept_caption: "You're my favorite \"yes.\"".to_string(),
            reset_corner: Corner::default(),
            asset_dir: default_asset_dir(),
        }
    }
}

impl ViewConfig {
    pub fn resolve(&self, asset: &AssetRef) -> PathBuf {
        let path = Path::new(asset.as_str());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_dir.join(path)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub assets: Assets,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            tuning: self.tuning.clone(),
            assets: self.assets.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "valentine", "valentine")
}

fn default_asset_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("assets"))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = project_dirs().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("VALENTINE").separator("__"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.settings().validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Using built-in configuration: {}", e);
            Config::default()
        }
    }
}

/// Creates the config file from the embedded defaults on first run.
pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if write_default_config_at(&path)? {
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

/// Returns `true` if the file was created. An existing file is left alone.
pub fn write_default_config_at(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touched = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if touched
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_deserialization() {
        let cases = vec![
            ("\"ne\"", Corner::NorthEast),
            ("\"NorthEast\"", Corner::NorthEast),
            ("\"top-right\"", Corner::NorthEast),
            ("\"SW\"", Corner::SouthWest),
            ("\"bottom-right\"", Corner::SouthEast),
            ("\"northwest\"", Corner::NorthWest),
        ];

        for (json, expected) in cases {
            let deserialized: Corner = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let view = ViewConfig {
            asset_dir: PathBuf::from("/srv/valentine"),
            ..ViewConfig::default()
        };

        assert_eq!(
            view.resolve(&AssetRef::new("bg.mp3")),
            PathBuf::from("/srv/valentine/bg.mp3")
        );
        assert_eq!(
            view.resolve(&AssetRef::new("/tmp/yes.png")),
            PathBuf::from("/tmp/yes.png")
        );
    }

    #[test]
    fn test_default_config_file_parses() {
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap();

        assert_eq!(parsed.view.reset_corner, Corner::NorthEast);
        assert_eq!(parsed.tuning, Tuning::default());
        assert_eq!(parsed.assets, Assets::default());
        assert_eq!(parsed.settings().validate(), Ok(()));
    }

    #[test]
    fn test_default_config_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valentine").join("config.toml");

        assert!(write_default_config_at(&path).unwrap());
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from(path.clone()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(parsed.tuning, Tuning::default());

        fs_err::write(&path, "[tuning]\nmiss_threshold = 3\n").unwrap();
        assert!(!write_default_config_at(&path).unwrap());
        let kept = fs_err::read_to_string(&path).unwrap();
        assert!(kept.contains("miss_threshold = 3"));
    }
}
