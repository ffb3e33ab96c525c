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

use crate::domain::{CpuInfo, DiskUsage, MemoryInfo, OsInfo, SystemError};
use async_trait::async_trait;
use std::path::Path;

/// Secondary port - Live host introspection
///
/// Supplies values independent of the collector report. Memory values also
/// override whatever the report claims.
#[async_trait]
pub trait HostInfoProvider: Send + Sync {
    /// Collect operating system information
    ///
    /// # Returns
    /// * `Ok(OsInfo)` - OS name, host name, release, version, machine
    /// * `Err(SystemError)` - Error collecting OS info
    async fn get_os_info(&self) -> Result<OsInfo, SystemError>;

    /// Collect CPU information
    ///
    /// # Returns
    /// * `Ok(CpuInfo)` - Brand, architecture, core counts, frequency
    /// * `Err(SystemError)` - Error collecting CPU info
    async fn get_cpu_info(&self) -> Result<CpuInfo, SystemError>;

    /// Collect memory totals
    ///
    /// # Returns
    /// * `Ok(MemoryInfo)` - Total and available bytes
    /// * `Err(SystemError)` - Error collecting memory info
    async fn get_memory_info(&self) -> Result<MemoryInfo, SystemError>;

    /// Disk usage of the filesystem holding `path`
    ///
    /// # Arguments
    /// * `path` - Any path on the filesystem of interest
    ///
    /// # Returns
    /// * `Ok(DiskUsage)` - Total, used and free bytes
    /// * `Err(SystemError)` - No matching disk or error collecting usage
    async fn get_disk_usage(&self, path: &Path) -> Result<DiskUsage, SystemError>;
}
