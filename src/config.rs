use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::grid::DEFAULT_TOLERANCE;
use crate::model::{GridSpec, RemovalConfig};
use crate::pipeline::SplitOptions;
use crate::pipeline::export::ExportOptions;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rows: u32,
    pub cols: u32,
    pub remove_background: bool,
    pub tolerance: u8,
    /// 0 uses one worker per core.
    pub thread_count: usize,
    pub output_dir: PathBuf,
    pub write_png: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            remove_background: false,
            tolerance: DEFAULT_TOLERANCE,
            thread_count: 0,
            output_dir: PathBuf::from("./out"),
            write_png: true,
        }
    }
}

impl Config {
    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.rows, self.cols)
    }

    pub fn removal(&self) -> RemovalConfig {
        RemovalConfig {
            enabled: self.remove_background,
            tolerance: self.tolerance,
        }
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions::new(self.grid())
            .with_removal(self.removal())
            .with_thread_count(self.thread_count)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            write_png: self.write_png,
            ..ExportOptions::default()
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str("rows = 2\nremove_background = true\n").unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.cols, 4);
        assert_eq!(config.removal(), RemovalConfig::enabled(30));
        assert_eq!(config.output_dir, PathBuf::from("./out"));
    }

    #[test]
    fn test_tolerance_out_of_range_rejected() {
        assert!(Config::from_toml_str("tolerance = 256").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sprite2cur.toml");

        let config = Config {
            rows: 3,
            cols: 5,
            tolerance: 12,
            thread_count: 2,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_split_options_from_config() {
        let config = Config {
            remove_background: true,
            thread_count: 3,
            ..Config::default()
        };
        let options = config.split_options();
        assert_eq!(options.grid, GridSpec::new(4, 4));
        assert!(options.removal.enabled);
        assert_eq!(options.thread_count, 3);
    }
}
