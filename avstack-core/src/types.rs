// SPDX-License-Identifier: Apache-2.0

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Validated service identifier.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a new ServiceName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "service_name",
                value: name,
                reason: "Service name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(ValidationError::InvalidFieldValue {
                field: "service_name",
                value: name.clone(),
                reason: format!("Service name too long: {} chars (max 64)", name.len()),
            });
        }

        // Validate characters: alphanumeric, hyphens, underscores
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFieldValue {
                field: "service_name",
                value: name,
                reason: "Service name must contain only alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ServiceName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.0
    }
}

/// Validated network port.
/// Must be in range 1-65535 (0 is reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Create a new Port with validation.
    pub fn new(port: u16) -> Result<Self, ValidationError> {
        if port == 0 {
            return Err(ValidationError::InvalidPort {
                port,
                reason: "Port 0 is reserved and cannot be used".to_string(),
            });
        }
        Ok(Self(port))
    }

    /// Get the inner port value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Validated URL path (health endpoint, docs page).
/// Must begin with '/' so it can be appended to a service base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlPath(String);

impl UrlPath {
    /// Create a new UrlPath with validation.
    pub fn new(path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();

        if !path.starts_with('/') {
            return Err(ValidationError::InvalidUrlPath { path });
        }

        Ok(Self(path))
    }

    /// Get the inner path value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UrlPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrlPath> for String {
    fn from(path: UrlPath) -> Self {
        path.0
    }
}
