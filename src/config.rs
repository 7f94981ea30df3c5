// Global configuration for the transport engine invocation
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Name of the environment variable the engine reads to locate its
/// cross-section index file.
pub const CROSS_SECTIONS_ENV: &str = "OPENMC_CROSS_SECTIONS";

pub static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::new()));

/// Process-wide configuration for the external engine.
///
/// The engine owns all nuclear data; the only thing this side needs to know
/// is where the cross-section index (`cross_sections.xml`) lives and which
/// executable to launch. The path is handed to the engine through the
/// `OPENMC_CROSS_SECTIONS` environment variable when a run starts.
///
/// A single global instance is exposed via the `CONFIG` static (a
/// `Lazy<Mutex<Config>>`). Most code should obtain a guard with
/// [`Config::global`] rather than locking the mutex directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the engine's cross-section index file.
    pub cross_sections: Option<String>,
    /// Executable used to launch the engine.
    pub executable: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Config {
            cross_sections: None,
            executable: String::from("openmc"),
        }
    }

    /// Set the path to the cross-section index file
    pub fn set_cross_sections(&mut self, path: impl Into<String>) {
        self.cross_sections = Some(path.into());
    }

    /// Get the cross-section index path, if configured
    pub fn get_cross_sections(&self) -> Option<&str> {
        self.cross_sections.as_deref()
    }

    /// Set the engine executable name or path
    pub fn set_executable(&mut self, executable: impl Into<String>) {
        self.executable = executable.into();
    }

    /// Clear the configuration back to defaults
    pub fn clear(&mut self) {
        self.cross_sections = None;
        self.executable = String::from("openmc");
    }

    /// Get the global configuration instance
    pub fn global() -> std::sync::MutexGuard<'static, Self> {
        CONFIG
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.get_cross_sections(), None);
        assert_eq!(config.executable, "openmc");
    }

    #[test]
    fn test_set_cross_sections_path() {
        let mut config = Config::new();
        config.set_cross_sections("/data/lib80x_hdf5/cross_sections.xml");
        assert_eq!(
            config.get_cross_sections(),
            Some("/data/lib80x_hdf5/cross_sections.xml")
        );
    }

    #[test]
    fn test_set_executable() {
        let mut config = Config::new();
        config.set_executable("/opt/openmc/bin/openmc");
        assert_eq!(config.executable, "/opt/openmc/bin/openmc");
    }

    #[test]
    fn test_clear_resets_defaults() {
        let mut config = Config::new();
        config.set_cross_sections("/tmp/cross_sections.xml");
        config.set_executable("custom-engine");
        config.clear();
        assert_eq!(config.get_cross_sections(), None);
        assert_eq!(config.executable, "openmc");
    }
}
