use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(alias = "api_base_url")]
    pub api_url: Option<String>,
    pub username: Option<String>,
    pub timeout: Option<u64>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub quiet: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config path '{}'", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("failed to write config '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".bookstore-admin").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn default_config_yaml() -> String {
    r#"# bookstore-admin config
#
# Location (default):
#   ~/.bookstore-admin/config.yml
#
# Credentials are never read from or written to this file except the
# username. Pass the password with --password or BOOKSTORE_PASSWORD.

# API
api_url: http://localhost:8080/api
# username: admin
timeout: 10

# Listing
page_size: 10
sort_by: title
sort_dir: desc
output_format: text

# Output styling
no_color: false
quiet: false
"#
    .to_string()
}

/// Write the default config to `path` unless a file already exists there.
///
/// Returns `true` when a new file was created.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path.parent().ok_or_else(|| ConfigError::InvalidPath {
        path: path.to_path_buf(),
    })?;
    std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
        path: parent.to_path_buf(),
        source,
    })?;
    std::fs::write(path, default_config_yaml()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}
