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

use crate::domain::{
    ExportConfig, ExportOutcome, PublishConfig, Report, ReportError, SectionFilter, Summary,
};
use async_trait::async_trait;
use std::time::Duration;

/// Primary port - Main interface offered by the report domain
///
/// This is what external systems (CLI, library consumers) use to turn
/// collector output into summaries and exports.
#[async_trait]
pub trait ReportingService: Send + Sync {
    /// Run the external collector once
    ///
    /// # Returns
    /// * `Ok(())` - Collector finished successfully
    /// * `Err(ReportError)` - Collector missing, failed or timed out
    async fn run_collector(&self) -> Result<(), ReportError>;

    /// Wait for the collector's completion marker and parse its report
    ///
    /// # Arguments
    /// * `wait` - Longest time to wait for the completion marker
    ///
    /// # Returns
    /// * `Ok(Report)` - Parsed report
    /// * `Err(ReportError::MissingInput)` - Marker never appeared
    /// * `Err(ReportError::Unreadable)` - Report file could not be read
    async fn acquire_report(&self, wait: Duration) -> Result<Report, ReportError>;

    /// Derive the numeric summary for a report
    async fn summarize(&self, report: &Report) -> Summary;

    /// Write every configured file export
    ///
    /// Each export is attempted regardless of earlier failures; one outcome
    /// is returned per configured export.
    async fn export(
        &self,
        report: &Report,
        summary: &Summary,
        config: &ExportConfig,
    ) -> Vec<ExportOutcome>;

    /// Upload the filtered report as JSON
    async fn publish(
        &self,
        report: &Report,
        summary: &Summary,
        filter: &SectionFilter,
        config: &PublishConfig,
    ) -> ExportOutcome;
}
