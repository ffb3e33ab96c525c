/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! TOML settings file provider

use crate::domain::{ConfigError, Settings};
use crate::ports::ConfigurationProvider;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use tokio::fs;

/// Loads [`Settings`] from an optional TOML file
///
/// Without a path every setting is left unset.
pub struct TomlConfigurationProvider {
    path: Option<PathBuf>,
}

impl TomlConfigurationProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ConfigurationProvider for TomlConfigurationProvider {
    async fn load_settings(&self) -> Result<Settings, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(Settings::default());
        };

        let text = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let settings: Settings = toml::from_str(&text).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded settings from {}: {settings:?}", path.display());

        Ok(settings)
    }
}
