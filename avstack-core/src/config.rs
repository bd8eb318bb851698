// SPDX-License-Identifier: Apache-2.0

//! YAML configuration parser with strict schema validation.
//!
//! The stack ships with built-in defaults for the two-container deployment
//! (API backend on 8000, Streamlit UI on 8501); an optional `avstack.yaml`
//! overrides them. Any invalid field results in a ValidationError that
//! prevents the CLI from running.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{StackError, StackResult, ValidationError};
use crate::types::{Port, ServiceName, UrlPath};

/// Raw stack options as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawStackOptions {
    #[serde(default = "default_compose_file")]
    compose_file: String,
    #[serde(default = "default_project_dir")]
    project_dir: String,
    #[serde(default = "default_env_file")]
    env_file: String,
    #[serde(default = "default_env_file_fallback")]
    env_file_fallback: String,
    #[serde(default = "default_env_template")]
    env_template: String,
    #[serde(default = "default_dictionary_dir")]
    dictionary_dir: String,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_startup_delay_secs")]
    startup_delay_secs: u64,
    #[serde(default = "default_restart_pause_secs")]
    restart_pause_secs: u64,
}

fn default_compose_file() -> String {
    "docker-compose.yml".to_string()
}

fn default_project_dir() -> String {
    ".".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_env_file_fallback() -> String {
    ".env.local".to_string()
}

fn default_env_template() -> String {
    ".env.example".to_string()
}

fn default_dictionary_dir() -> String {
    "dictionaries".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_startup_delay_secs() -> u64 {
    10 // containers need a moment before the first health probe
}

fn default_restart_pause_secs() -> u64 {
    2
}

impl Default for RawStackOptions {
    fn default() -> Self {
        Self {
            compose_file: default_compose_file(),
            project_dir: default_project_dir(),
            env_file: default_env_file(),
            env_file_fallback: default_env_file_fallback(),
            env_template: default_env_template(),
            dictionary_dir: default_dictionary_dir(),
            host: default_host(),
            startup_delay_secs: default_startup_delay_secs(),
            restart_pause_secs: default_restart_pause_secs(),
        }
    }
}

/// Raw service entry.
#[derive(Debug, Deserialize)]
struct RawServiceConfig {
    name: String,
    port: u16,
    health_path: String,
    #[serde(default)]
    inspect_body: bool,
    #[serde(default)]
    docs_path: Option<String>,
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    stack: RawStackOptions,
    #[serde(default)]
    services: Vec<RawServiceConfig>,
}

/// Validated stack options.
#[derive(Debug, Clone)]
pub struct StackOptions {
    pub compose_file: PathBuf,
    pub project_dir: PathBuf,
    pub env_file: PathBuf,
    pub env_file_fallback: PathBuf,
    pub env_template: PathBuf,
    pub dictionary_dir: PathBuf,
    pub host: String,
    pub startup_delay: Duration,
    pub restart_pause: Duration,
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: ServiceName,
    pub port: Port,
    pub health_path: UrlPath,
    /// Whether the health response body carries a capability snapshot
    /// worth parsing (the API reports its dictionary engine this way).
    pub inspect_body: bool,
    /// Interactive documentation path, when the service has one.
    pub docs_path: Option<UrlPath>,
}

impl ServiceConfig {
    /// Base URL the service is reachable at.
    pub fn base_url(&self, host: &str) -> String {
        format!("http://{}:{}", host, self.port)
    }

    /// Full health-probe URL.
    pub fn health_url(&self, host: &str) -> String {
        format!("http://{}:{}{}", host, self.port, self.health_path)
    }

    /// Documentation URL, when the service publishes one.
    pub fn docs_url(&self, host: &str) -> Option<String> {
        self.docs_path
            .as_ref()
            .map(|path| format!("http://{}:{}{}", host, self.port, path))
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub options: StackOptions,
    pub services: Vec<ServiceConfig>,
}

impl Default for StackConfig {
    /// The built-in two-container stack the shell deployment used.
    fn default() -> Self {
        ConfigLoader::load_str("{}").expect("built-in defaults are valid")
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> StackResult<StackConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(StackError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| StackError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_str(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_str(content: &str) -> StackResult<StackConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| StackError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> StackResult<StackConfig> {
        let options = Self::validate_options(raw.stack)?;

        let raw_services = if raw.services.is_empty() {
            Self::default_services()
        } else {
            raw.services
        };

        let mut services = Vec::with_capacity(raw_services.len());
        let mut seen_names = std::collections::HashSet::new();
        let mut seen_ports = std::collections::HashSet::new();

        for raw_service in raw_services {
            let service = Self::validate_service(raw_service)?;

            if !seen_names.insert(service.name.as_str().to_string()) {
                return Err(ValidationError::DuplicateService {
                    name: service.name.to_string(),
                }
                .into());
            }

            if !seen_ports.insert(service.port.value()) {
                return Err(ValidationError::DuplicatePort {
                    port: service.port.value(),
                }
                .into());
            }

            services.push(service);
        }

        Ok(StackConfig { options, services })
    }

    /// The two containers the deployment has always consisted of.
    fn default_services() -> Vec<RawServiceConfig> {
        vec![
            RawServiceConfig {
                name: "api".to_string(),
                port: 8000,
                health_path: "/health".to_string(),
                inspect_body: true,
                docs_path: Some("/docs".to_string()),
            },
            RawServiceConfig {
                name: "ui".to_string(),
                port: 8501,
                health_path: "/_stcore/health".to_string(),
                inspect_body: false,
                docs_path: None,
            },
        ]
    }

    /// Validate stack options.
    fn validate_options(raw: RawStackOptions) -> StackResult<StackOptions> {
        if raw.compose_file.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "compose_file",
                value: raw.compose_file,
                reason: "Compose file path cannot be empty".to_string(),
            }
            .into());
        }

        if raw.env_file.is_empty() || raw.env_file_fallback.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "env_file",
                value: raw.env_file,
                reason: "Environment file paths cannot be empty".to_string(),
            }
            .into());
        }

        if raw.host.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "host",
                value: raw.host,
                reason: "Host cannot be empty".to_string(),
            }
            .into());
        }

        // The settle delay is a crude wait, not readiness polling. Cap it so a
        // typo cannot hang the CLI for minutes.
        if raw.startup_delay_secs > 300 {
            return Err(ValidationError::InvalidFieldValue {
                field: "startup_delay_secs",
                value: raw.startup_delay_secs.to_string(),
                reason: "Startup delay must not exceed 300 seconds".to_string(),
            }
            .into());
        }

        if raw.restart_pause_secs > 60 {
            return Err(ValidationError::InvalidFieldValue {
                field: "restart_pause_secs",
                value: raw.restart_pause_secs.to_string(),
                reason: "Restart pause must not exceed 60 seconds".to_string(),
            }
            .into());
        }

        Ok(StackOptions {
            compose_file: PathBuf::from(raw.compose_file),
            project_dir: PathBuf::from(raw.project_dir),
            env_file: PathBuf::from(raw.env_file),
            env_file_fallback: PathBuf::from(raw.env_file_fallback),
            env_template: PathBuf::from(raw.env_template),
            dictionary_dir: PathBuf::from(raw.dictionary_dir),
            host: raw.host,
            startup_delay: Duration::from_secs(raw.startup_delay_secs),
            restart_pause: Duration::from_secs(raw.restart_pause_secs),
        })
    }

    /// Validate a single service entry.
    fn validate_service(raw: RawServiceConfig) -> StackResult<ServiceConfig> {
        let name = ServiceName::new(&raw.name).map_err(|mut e| {
            if let ValidationError::InvalidFieldValue { ref mut field, .. } = e {
                *field = "name";
            }
            e
        })?;

        let port = Port::new(raw.port)?;
        let health_path = UrlPath::new(&raw.health_path)?;
        let docs_path = raw.docs_path.map(UrlPath::new).transpose()?;

        Ok(ServiceConfig {
            name,
            port,
            health_path,
            inspect_body: raw.inspect_body,
            docs_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_CONFIG: &str = r#"
stack:
  env_file: .env.docker
  startup_delay_secs: 5

services:
  - name: backend
    port: 9000
    health_path: /healthz
    inspect_body: true
  - name: frontend
    port: 3000
    health_path: /
"#;

    #[test]
    fn test_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].name.as_str(), "api");
        assert_eq!(config.services[0].port.value(), 8000);
        assert!(config.services[0].inspect_body);
        assert_eq!(config.services[1].name.as_str(), "ui");
        assert_eq!(config.services[1].port.value(), 8501);
        assert_eq!(config.services[1].health_path.as_str(), "/_stcore/health");
        assert!(!config.services[1].inspect_body);
        assert_eq!(config.options.env_file, PathBuf::from(".env"));
        assert_eq!(config.options.env_file_fallback, PathBuf::from(".env.local"));
        assert_eq!(config.options.startup_delay, Duration::from_secs(10));
        assert_eq!(config.options.restart_pause, Duration::from_secs(2));
    }

    #[test]
    fn test_custom_config() {
        let config = ConfigLoader::load_str(CUSTOM_CONFIG).unwrap();
        assert_eq!(config.options.env_file, PathBuf::from(".env.docker"));
        assert_eq!(config.options.startup_delay, Duration::from_secs(5));
        // Fallback keeps its default when only the primary is overridden
        assert_eq!(config.options.env_file_fallback, PathBuf::from(".env.local"));
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].name.as_str(), "backend");
    }

    #[test]
    fn test_health_url() {
        let config = StackConfig::default();
        assert_eq!(
            config.services[0].health_url(&config.options.host),
            "http://localhost:8000/health"
        );
        assert_eq!(
            config.services[1].health_url(&config.options.host),
            "http://localhost:8501/_stcore/health"
        );
        assert_eq!(
            config.services[0].base_url(&config.options.host),
            "http://localhost:8000"
        );
    }

    #[test]
    fn test_docs_url() {
        let config = StackConfig::default();
        assert_eq!(
            config.services[0].docs_url("localhost").as_deref(),
            Some("http://localhost:8000/docs")
        );
        assert!(config.services[1].docs_url("localhost").is_none());
    }

    #[test]
    fn test_invalid_port_zero() {
        let yaml = r#"
services:
  - name: backend
    port: 0
    health_path: /healthz
"#;
        assert!(ConfigLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_health_path_must_be_absolute() {
        let yaml = r#"
services:
  - name: backend
    port: 9000
    health_path: healthz
"#;
        assert!(ConfigLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_duplicate_names() {
        let yaml = r#"
services:
  - name: backend
    port: 9000
    health_path: /healthz
  - name: backend
    port: 9001
    health_path: /healthz
"#;
        assert!(ConfigLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_duplicate_ports() {
        let yaml = r#"
services:
  - name: backend
    port: 9000
    health_path: /healthz
  - name: frontend
    port: 9000
    health_path: /
"#;
        assert!(ConfigLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_startup_delay_too_high() {
        let yaml = r#"
stack:
  startup_delay_secs: 301
"#;
        assert!(ConfigLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let result = ConfigLoader::load_file("/nonexistent/avstack.yaml");
        assert!(matches!(result, Err(StackError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avstack.yaml");
        std::fs::write(&path, CUSTOM_CONFIG).unwrap();
        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.services[1].name.as_str(), "frontend");
    }
}
