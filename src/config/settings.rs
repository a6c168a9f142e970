//! Tool settings
//!
//! Settings come from an optional user file in the platform config
//! directory and an optional `.runfile.yml` next to the definition file.
//! Project values override user values field by field.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local settings file name
pub const PROJECT_SETTINGS_FILE: &str = ".runfile.yml";

/// User settings file name inside the config directory
pub const USER_SETTINGS_FILE: &str = "config.yml";

/// Settings as written in a YAML file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SettingsFile {
    /// Shell used to run command lines (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<Vec<String>>,

    /// Load `.env` next to the definition file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<bool>,

    /// Warn when a placeholder has no binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_undefined: Option<bool>,
}

impl SettingsFile {
    /// Overlay `other` on top of `self`
    pub fn merge(self, other: SettingsFile) -> SettingsFile {
        SettingsFile {
            shell: other.shell.or(self.shell),
            dotenv: other.dotenv.or(self.dotenv),
            warn_undefined: other.warn_undefined.or(self.warn_undefined),
        }
    }
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub shell: Vec<String>,
    pub dotenv: bool,
    pub warn_undefined: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shell: vec!["sh".to_string(), "-c".to_string()],
            dotenv: true,
            warn_undefined: true,
        }
    }
}

impl Settings {
    /// Load user settings, then the project settings in `project_dir`
    pub fn load(project_dir: &Path) -> ConfigResult<Settings> {
        let mut file = SettingsFile::default();
        if let Some(path) = user_settings_path() {
            file = file.merge(read_settings_file(&path)?.unwrap_or_default());
        }
        let project = read_settings_file(&project_dir.join(PROJECT_SETTINGS_FILE))?;
        file = file.merge(project.unwrap_or_default());
        Settings::resolve(file, project_dir)
    }

    /// Apply defaults to a settings file
    pub fn resolve(file: SettingsFile, origin: &Path) -> ConfigResult<Settings> {
        let defaults = Settings::default();
        let shell = file.shell.unwrap_or(defaults.shell);
        if shell.is_empty() || shell[0].trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: origin.to_path_buf(),
                message: "shell must name a program".to_string(),
            });
        }

        Ok(Settings {
            shell,
            dotenv: file.dotenv.unwrap_or(defaults.dotenv),
            warn_undefined: file.warn_undefined.unwrap_or(defaults.warn_undefined),
        })
    }
}

/// Location of the user settings file, if the platform has a config dir
pub fn user_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "runfile").map(|dirs| dirs.config_dir().join(USER_SETTINGS_FILE))
}

/// Read one settings file; a missing file is not an error
pub fn read_settings_file(path: &Path) -> ConfigResult<Option<SettingsFile>> {
    if !path.is_file() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_settings(&contents, path).map(Some)
}

/// Parse settings from a YAML string
pub fn parse_settings(yaml: &str, path: &Path) -> ConfigResult<SettingsFile> {
    if yaml.trim().is_empty() {
        return Ok(SettingsFile::default());
    }

    serde_yaml::from_str(yaml).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
