use crate::errors::DraError;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fs;
use validator::Validate;

pub const DRIVER_NAME: &str = "dractrlplugin";
pub const PLUGIN_SOCKET_PATH: &str = "/var/lib/kubelet/plugins/dractrlplugin/dractrlplugin.sock";
pub const REGISTRAR_SOCKET_PATH: &str = "/var/lib/kubelet/plugins_registry/dractrlplugin-reg.sock";
pub const DEFAULT_WORKERS: usize = 2;

/// Settings shared by the controller and the node plugin. Every key is
/// optional in the file.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct DriverConfig {
    #[validate(length(min = 1))]
    pub driver_name: String,
    #[validate(range(min = 1))]
    pub workers: usize,
    #[validate(length(min = 1))]
    pub plugin_socket_path: String,
    #[validate(length(min = 1))]
    pub registrar_socket_path: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            driver_name: DRIVER_NAME.to_string(),
            workers: DEFAULT_WORKERS,
            plugin_socket_path: PLUGIN_SOCKET_PATH.to_string(),
            registrar_socket_path: REGISTRAR_SOCKET_PATH.to_string(),
        }
    }
}

impl DriverConfig {
    pub fn load(path: Option<&str>) -> Result<Self, DraError> {
        let path = match path {
            None => return Ok(Self::default()),
            Some(p) => shellexpand::tilde(p).into_owned(),
        };
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow!("failed to read config file {}", path).context(e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DraError> {
        // an empty document is null to serde_yaml
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn validated(self) -> Result<Self, DraError> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn should_fill_missing_keys_with_defaults() {
        let config = DriverConfig::parse("workers: 4\n").unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.driver_name, DRIVER_NAME);
        assert_eq!(config.plugin_socket_path, PLUGIN_SOCKET_PATH);
        assert_eq!(config.registrar_socket_path, REGISTRAR_SOCKET_PATH);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(DriverConfig::parse("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn should_reject_zero_workers() {
        let config = DriverConfig::parse("workers: 0").unwrap();
        assert!(matches!(config.validated(), Err(DraError::ValidationErrors(_))));
    }

    #[test]
    fn should_reject_empty_driver_name() {
        let config = DriverConfig::parse("driver-name: \"\"").unwrap();
        assert!(config.validated().is_err());
    }

    #[test]
    fn should_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "driver-name: gpu.example.com").unwrap();
        writeln!(file, "plugin-socket-path: /tmp/gpu.sock").unwrap();

        let config = DriverConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.driver_name, "gpu.example.com");
        assert_eq!(config.plugin_socket_path, "/tmp/gpu.sock");
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(DriverConfig::load(Some("/nonexistent/dractrlplugin.yaml")).is_err());
    }
}
