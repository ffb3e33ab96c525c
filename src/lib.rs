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

//! Host Report Library
//!
//! Turns the sectioned text report written by an external collector script
//! into an ordered section map, derives disk, ping and memory summaries, and
//! exports the result as JSON, CSV, XML or an authenticated HTTP upload.
//! Built on a Ports and Adapters (Hexagonal) architecture.
//!
//! # Architecture
//!
//! - **Domain**: Section splitting, size parsing, aggregation, filtering and encoding
//! - **Ports**: Interfaces for the collector, report source, host introspection and exports
//! - **Adapters**: Process, file system, `sysinfo`, HTTP and console implementations
//!
//! # Usage
//!
//! ```rust,no_run
//! use host_report::{ExportConfig, ReportingService, SectionFilter};
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = host_report::create_service()?;
//!
//!     let report = service.acquire_report(Duration::from_secs(30)).await?;
//!     let summary = service.summarize(&report).await;
//!
//!     let config = ExportConfig {
//!         json_path: Some("info.json".into()),
//!         filter: SectionFilter::parse("OS & System,CPU"),
//!         ..Default::default()
//!     };
//!     for outcome in service.export(&report, &summary, &config).await {
//!         println!("{}: {}", outcome.target, outcome.is_success());
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod container;
pub mod domain;
pub mod ports;

pub use adapters::primary::{prompt_upload_auth, prompt_upload_auth_on_terminal, HostSnapshot};
pub use adapters::secondary::{
    FileReportSource, FileSystemRepository, HttpDataPublisher, ProcessCollectorRunner,
    SysinfoHostInfoProvider, TomlConfigurationProvider,
};
pub use container::{ContainerConfig, ContainerConfigBuilder, ServiceContainer};
pub use domain::{
    parse_report_sections, parse_size_to_bytes, DiskTotals, ExportConfig, ExportError,
    ExportOutcome, ExportTarget, PublishConfig, PublishError, Report, ReportDocument,
    ReportError, SectionFilter, Settings, Summary, UploadAuth,
};
pub use ports::{
    CollectorRunner, ConfigurationProvider, DataPublisher, FileRepository, HostInfoProvider,
    ReportSource, ReportingService,
};

use std::error::Error;
use std::sync::Arc;

/// Create a reporting service reading `info.txt`/`done.txt` from the current directory
///
/// # Returns
/// * Configured reporting service
pub fn create_service() -> Result<Arc<dyn ReportingService>, Box<dyn Error>> {
    ServiceContainer::default().create_reporting_service()
}

/// Create a reporting service with custom container configuration
///
/// # Arguments
/// * `container_config` - Paths, timeouts and settings file
pub fn create_service_with_config(
    container_config: ContainerConfig,
) -> Result<Arc<dyn ReportingService>, Box<dyn Error>> {
    ServiceContainer::new(container_config).create_reporting_service()
}
