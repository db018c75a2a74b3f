use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::file::run_file_name;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by the sorter and the join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Directory that receives temporary run files
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// File name prefix of temporary runs
    #[serde(default = "default_run_prefix")]
    pub run_prefix: String,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_run_prefix() -> String {
    "tmp".to_string()
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            run_prefix: default_run_prefix(),
        }
    }
}

impl ExecConfig {
    /// Config with defaults and the given work directory
    pub fn with_work_dir<P: Into<PathBuf>>(work_dir: P) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Path of the run `{tag, pass, index}` inside the work directory
    pub fn run_path(&self, tag: &str, pass: usize, index: usize) -> PathBuf {
        self.work_dir
            .join(run_file_name(&self.run_prefix, tag, pass, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ExecConfig::default();
        assert_eq!(config.work_dir, PathBuf::from("."));
        assert_eq!(config.run_prefix, "tmp");
        assert_eq!(config.run_path("A", 0, 3), PathBuf::from("./tmp_A_p0_r3.csv"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "work_dir": "/var/tmp/runs" }"#).unwrap();

        let config = ExecConfig::from_file(&path).unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/var/tmp/runs"));
        assert_eq!(config.run_prefix, "tmp");
    }

    #[test]
    fn test_from_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ExecConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
