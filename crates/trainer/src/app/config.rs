use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use simcore::sim::SessionSettings;
use thiserror::Error;

pub(crate) const CONFIG_FILE_NAME: &str = "trainer.json";
pub(crate) const CONFIG_ENV_VAR: &str = "SURGISIM_CONFIG";

/// Raw bounding-box dimensions of the bundled kidney model before
/// normalization.
const DEFAULT_ORGAN_EXTENTS: [f32; 3] = [1.1, 2.0, 0.9];

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}{}: {source}", display_json_path(.json_path))]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn display_json_path(json_path: &str) -> String {
    if json_path.is_empty() || json_path == "." {
        String::new()
    } else {
        format!(" at {json_path}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) max_fps: Option<u32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_fps: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TrainerConfig {
    pub(crate) window: WindowConfig,
    pub(crate) settings: SessionSettings,
    pub(crate) organ_extents: [f32; 3],
    pub(crate) scenario: Option<String>,
    pub(crate) export_dir: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            settings: SessionSettings::default(),
            organ_extents: DEFAULT_ORGAN_EXTENTS,
            scenario: None,
            export_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Relative export directories are taken relative to the app root.
    pub(crate) fn export_dir_under(&self, root: &Path) -> Option<PathBuf> {
        self.export_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                root.join(dir)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Reads `$SURGISIM_CONFIG` when set (the file must exist), otherwise
/// `trainer.json` under `root` when present, otherwise defaults.
pub(crate) fn load_config(root: &Path) -> Result<(TrainerConfig, ConfigSource), ConfigError> {
    match env::var(CONFIG_ENV_VAR) {
        Ok(value) => {
            let path = PathBuf::from(value);
            let config = read_config(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Err(env::VarError::NotPresent) => load_optional_config(&root.join(CONFIG_FILE_NAME)),
        Err(source) => Err(ConfigError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

fn load_optional_config(path: &Path) -> Result<(TrainerConfig, ConfigSource), ConfigError> {
    match read_config(path) {
        Ok(config) => Ok((config, ConfigSource::File(path.to_path_buf()))),
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok((TrainerConfig::default(), ConfigSource::Defaults))
        }
        Err(error) => Err(error),
    }
}

fn read_config(path: &Path) -> Result<TrainerConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &raw)
}

pub(crate) fn parse_config(path: &Path, raw: &str) -> Result<TrainerConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, TrainerConfig>(&mut deserializer) {
        Ok(config) => Ok(TrainerConfig {
            settings: config.settings.sanitized(),
            ..config
        }),
        Err(error) => {
            let json_path = error.path().to_string();
            Err(ConfigError::Parse {
                path: path.to_path_buf(),
                json_path,
                source: error.into_inner(),
            })
        }
    }
}
