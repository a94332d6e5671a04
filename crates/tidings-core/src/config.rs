// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Queue configuration and its loaders.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Capacity used when no configuration is supplied.
pub const DEFAULT_QUEUE_CAPACITY: usize = 512;

/// Errors raised while loading or validating a [`QueueConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The RON document could not be parsed.
    #[error("invalid RON queue config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The JSON document could not be parsed.
    #[error("invalid JSON queue config: {0}")]
    Json(#[from] serde_json::Error),
    /// The config file could not be read.
    #[error("failed to read queue config: {0}")]
    Io(#[from] std::io::Error),
    /// The file extension is neither `.ron` nor `.json`.
    #[error("unsupported queue config format '{0}'")]
    UnsupportedFormat(String),
    /// A queue must be able to hold at least one event.
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,
}

/// Configuration for an event queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of events buffered at once.
    /// If the buffer is full, newly pushed events are dropped.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl QueueConfig {
    /// Creates a config with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Checks that the config describes a usable queue.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Parses and validates a config from a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a config from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        let config = match extension.as_str() {
            "ron" => Self::from_ron_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::debug!("Loaded queue config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
