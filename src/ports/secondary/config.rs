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

use crate::domain::{ConfigError, Settings};
use async_trait::async_trait;

/// Secondary port - Configuration provider abstraction
///
/// This interface abstracts where persistent settings come from, allowing
/// for different sources (files, environment, in-memory for tests).
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Load settings
    ///
    /// # Returns
    /// * `Ok(Settings)` - Settings, every key optional
    /// * `Err(ConfigError)` - Source unreadable or malformed
    async fn load_settings(&self) -> Result<Settings, ConfigError>;
}
