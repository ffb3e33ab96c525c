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

//! Dependency injection container for host reporting services

use crate::adapters::secondary::{
    FileReportSource, FileSystemRepository, HttpDataPublisher, ProcessCollectorRunner,
    SysinfoHostInfoProvider, TomlConfigurationProvider,
};
use crate::domain::ReportService;
use crate::ports::{
    CollectorRunner, ConfigurationProvider, DataPublisher, FileRepository, HostInfoProvider,
    ReportSource, ReportingService,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the dependency injection container
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Directory holding `info.ps1` / `info.bat`
    pub collector_dir: PathBuf,
    /// Collector report file
    pub report_path: PathBuf,
    /// Collector completion marker
    pub marker_path: PathBuf,
    /// Timeout for each collector launch attempt
    pub collector_timeout: Duration,
    /// Interval between completion marker checks
    pub poll_interval: Duration,
    /// Optional TOML settings file
    pub settings_path: Option<PathBuf>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            collector_dir: PathBuf::from("."),
            report_path: PathBuf::from("info.txt"),
            marker_path: PathBuf::from("done.txt"),
            collector_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_millis(500),
            settings_path: None,
        }
    }
}

/// Dependency injection container
pub struct ServiceContainer {
    config: ContainerConfig,
}

impl ServiceContainer {
    /// Create a new service container with configuration
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Create the host info provider
    pub fn create_host_info_provider(&self) -> Arc<dyn HostInfoProvider> {
        Arc::new(SysinfoHostInfoProvider::new())
    }

    /// Create the collector runner
    pub fn create_collector_runner(&self) -> Arc<dyn CollectorRunner> {
        Arc::new(ProcessCollectorRunner::new(
            self.config.collector_dir.clone(),
            self.config.collector_timeout,
        ))
    }

    /// Create the report source
    pub fn create_report_source(&self) -> Arc<dyn ReportSource> {
        Arc::new(
            FileReportSource::new(
                self.config.report_path.clone(),
                self.config.marker_path.clone(),
            )
            .with_poll_interval(self.config.poll_interval),
        )
    }

    /// Create the file repository
    pub fn create_file_repository(&self) -> Arc<dyn FileRepository> {
        Arc::new(FileSystemRepository::new())
    }

    /// Create the data publisher
    pub fn create_data_publisher(&self) -> Result<Arc<dyn DataPublisher>, Box<dyn Error>> {
        let http_publisher = HttpDataPublisher::with_defaults()?;

        Ok(Arc::new(http_publisher))
    }

    /// Create the configuration provider
    pub fn create_configuration_provider(&self) -> Arc<dyn ConfigurationProvider> {
        Arc::new(TomlConfigurationProvider::new(
            self.config.settings_path.clone(),
        ))
    }

    /// Create the complete reporting service
    pub fn create_reporting_service(&self) -> Result<Arc<dyn ReportingService>, Box<dyn Error>> {
        let service = ReportService::new(
            self.create_host_info_provider(),
            self.create_collector_runner(),
            self.create_report_source(),
            self.create_file_repository(),
            self.create_data_publisher()?,
        );

        Ok(Arc::new(service))
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

/// Builder pattern for container configuration
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set the collector script directory
    pub fn collector_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.collector_dir = dir.into();
        self
    }

    /// Set the report file path
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.report_path = path.into();
        self
    }

    /// Set the completion marker path
    pub fn marker_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.marker_path = path.into();
        self
    }

    /// Set the collector timeout
    pub fn collector_timeout(mut self, timeout: Duration) -> Self {
        self.config.collector_timeout = timeout;
        self
    }

    /// Set the marker polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the settings file
    pub fn settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.settings_path = path;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
