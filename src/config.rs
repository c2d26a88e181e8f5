//! # Configuration Management
//!
//! Centralized configuration for the native acceleration bridge.
//!
//! This module provides structured configuration for the bridge, including
//! the native module's file name and install location, the serialization
//! buffer capacity, and diagnostic toggles.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Notes
//! - The default buffer capacity (16384 bytes) matches the native
//!   serializer's contract; changing it changes the truncation threshold,
//!   not the native module's behavior.
//! - `native_enabled = false` skips loading entirely and runs the reference
//!   paths with timing instrumentation, which is useful when validating the
//!   native module against the reference implementations.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Fixed capacity of the reusable serialization buffer, in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// Subdirectory of the install dir the native payload is extracted into
pub const PLUGINS_SUBDIR: &str = "Plugins";

/// Default file name of the native module payload
pub const DEFAULT_MODULE_FILE: &str = "libaccel.so";

/// Main bridge configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// File name the native payload is extracted under
    #[serde(default = "default_module_file")]
    pub module_file: String,

    /// Host install directory; the payload lands in `<install_dir>/Plugins/`
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    /// Capacity of the reusable serialization buffer in bytes
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Whether the native module is loaded at all; when false the bridge
    /// stays on the reference paths and instruments them with timing logs
    #[serde(default = "default_true")]
    pub native_enabled: bool,

    /// Whether the first serialize invocation runs the reference serializer
    /// alongside the native one and logs a timing/output comparison
    #[serde(default = "default_true")]
    pub first_call_diagnostics: bool,
}

fn default_module_file() -> String {
    DEFAULT_MODULE_FILE.to_string()
}

fn default_install_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_true() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module_file: default_module_file(),
            install_dir: default_install_dir(),
            buffer_capacity: default_buffer_capacity(),
            native_enabled: true,
            first_call_diagnostics: true,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(file) = std::env::var("NATIVE_BRIDGE_MODULE_FILE") {
            config.module_file = file;
        }

        if let Ok(dir) = std::env::var("NATIVE_BRIDGE_INSTALL_DIR") {
            config.install_dir = PathBuf::from(dir);
        }

        if let Ok(capacity) = std::env::var("NATIVE_BRIDGE_BUFFER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.buffer_capacity = val;
            }
        }

        if let Ok(enabled) = std::env::var("NATIVE_BRIDGE_ENABLED") {
            if let Ok(val) = enabled.parse::<bool>() {
                config.native_enabled = val;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.module_file.is_empty() {
            return Err(BridgeError::ConfigError(
                "module_file must not be empty".to_string(),
            ));
        }

        if self.buffer_capacity == 0 {
            return Err(BridgeError::ConfigError(
                "buffer_capacity must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path the native payload is extracted to
    pub fn payload_path(&self) -> PathBuf {
        self.install_dir.join(PLUGINS_SUBDIR).join(&self.module_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(config.native_enabled);
        assert!(config.first_call_diagnostics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = BridgeConfig::from_toml(
            r#"
            module_file = "libaccel.so"
            install_dir = "/opt/host"
            buffer_capacity = 8192
            native_enabled = false
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.buffer_capacity, 8192);
        assert!(!config.native_enabled);
        assert_eq!(
            config.payload_path(),
            PathBuf::from("/opt/host/Plugins/libaccel.so")
        );
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = BridgeConfig::from_toml("buffer_capacity = 0");
        assert!(matches!(result, Err(BridgeError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_empty_module_file() {
        let result = BridgeConfig::from_toml(r#"module_file = """#);
        assert!(matches!(result, Err(BridgeError::ConfigError(_))));
    }

    #[test]
    fn test_default_with_overrides() {
        let config = BridgeConfig::default_with_overrides(|c| {
            c.buffer_capacity = 4096;
        });
        assert_eq!(config.buffer_capacity, 4096);
        assert_eq!(config.module_file, DEFAULT_MODULE_FILE);
    }
}
