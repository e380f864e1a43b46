//! Run-time tunables for a `scripty` invocation: the initial named-stack and
//! global-table capacities, and whether the VM's dispatch loop should log at
//! `trace` level. Loaded from TOML, with a standard-location search mirroring
//! the shape (not the `dirs`-crate machinery) of other config loaders in the
//! broader seq/scripty family.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_stack_capacity() -> usize {
    4
}

fn default_table_capacity() -> usize {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_stack_capacity")]
    pub stack_capacity: usize,
    #[serde(default = "default_table_capacity")]
    pub table_capacity: usize,
    #[serde(default)]
    pub trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stack_capacity: default_stack_capacity(),
            table_capacity: default_table_capacity(),
            trace: false,
        }
    }
}

impl RunConfig {
    /// Loads `path` if given, otherwise searches the current directory and
    /// then the user's config directory for `scripty.toml`. Falls back to
    /// `RunConfig::default()` if nothing is found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit_path {
            return Self::load_from_path(path);
        }
        if let Some(path) = find_config_file() {
            return Self::load_from_path(&path);
        }
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        let text = toml::to_string_pretty(self).map_err(|e| format!("serializing config: {e}"))?;
        fs::write(path, text).map_err(|e| format!("writing {}: {e}", path.display()))
    }
}

fn find_config_file() -> Option<PathBuf> {
    check_current_dir_config().or_else(check_home_config)
}

fn check_current_dir_config() -> Option<PathBuf> {
    let path = PathBuf::from("scripty.toml");
    path.is_file().then_some(path)
}

/// `$XDG_CONFIG_HOME/scripty/config.toml`, falling back to
/// `$HOME/.config/scripty/config.toml` — hand-rolled since scripty-cli
/// doesn't depend on the `dirs` crate.
fn check_home_config() -> Option<PathBuf> {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok()?;
    let path = base.join("scripty").join("config.toml");
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_matches_library_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.stack_capacity, 4);
        assert_eq!(config.table_capacity, 4);
        assert!(!config.trace);
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scripty.toml");
        let config = RunConfig {
            stack_capacity: 64,
            table_capacity: 32,
            trace: true,
        };
        config.save_to_path(&path).unwrap();
        let loaded = RunConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "trace = true\n").unwrap();
        let loaded = RunConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.stack_capacity, 4);
        assert_eq!(loaded.table_capacity, 4);
        assert!(loaded.trace);
    }

    #[test]
    fn load_from_nonexistent_path_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(RunConfig::load_from_path(&path).is_err());
    }
}
