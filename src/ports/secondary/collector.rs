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

use crate::domain::{CollectorError, ReportError};
use async_trait::async_trait;
use std::time::Duration;

/// Secondary port - External collector execution
///
/// The collector is a script that writes its report and a completion marker
/// next to itself.
#[async_trait]
pub trait CollectorRunner: Send + Sync {
    /// Run the collector once and wait for it to exit
    ///
    /// # Returns
    /// * `Ok(())` - Collector exited successfully
    /// * `Err(CollectorError)` - Collector missing, failed or timed out
    async fn run(&self) -> Result<(), CollectorError>;
}

/// Secondary port - Access to the collector's report output
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Wait for the completion marker, then read the whole report
    ///
    /// # Arguments
    /// * `wait` - Longest time to wait for the marker
    ///
    /// # Returns
    /// * `Ok(String)` - Report text (invalid UTF-8 replaced)
    /// * `Err(ReportError::MissingInput)` - Marker never appeared
    /// * `Err(ReportError::Unreadable)` - Marker present but report unreadable
    async fn read_report(&self, wait: Duration) -> Result<String, ReportError>;
}
