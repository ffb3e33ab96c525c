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

//! Cross-platform host information provider backed by `sysinfo`

use crate::domain::{CpuInfo, DiskUsage, MemoryInfo, OsInfo, SystemError};
use crate::ports::HostInfoProvider;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

const UNKNOWN: &str = "Unknown";

/// Host information provider using the `sysinfo` crate
///
/// Every call takes a fresh snapshot; nothing is cached between calls.
pub struct SysinfoHostInfoProvider;

impl SysinfoHostInfoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SysinfoHostInfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostInfoProvider for SysinfoHostInfoProvider {
    async fn get_os_info(&self) -> Result<OsInfo, SystemError> {
        Ok(OsInfo {
            system: System::name().unwrap_or_else(|| UNKNOWN.into()),
            node_name: System::host_name().unwrap_or_else(|| UNKNOWN.into()),
            release: System::kernel_version().unwrap_or_else(|| UNKNOWN.into()),
            version: System::os_version().unwrap_or_else(|| UNKNOWN.into()),
            machine: std::env::consts::ARCH.to_string(),
        })
    }

    async fn get_cpu_info(&self) -> Result<CpuInfo, SystemError> {
        let mut sys = System::new();
        sys.refresh_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::everything()));

        let cpus = sys.cpus();
        if cpus.is_empty() {
            return Err(SystemError::Unavailable("no CPUs reported".to_string()));
        }

        Ok(CpuInfo {
            brand: cpus
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNKNOWN.into()),
            architecture: std::env::consts::ARCH.to_string(),
            physical_cores: sys.physical_core_count(),
            logical_cores: cpus.len(),
            frequency_mhz: cpus.iter().map(|c| c.frequency()).max().unwrap_or(0),
        })
    }

    async fn get_memory_info(&self) -> Result<MemoryInfo, SystemError> {
        let mut sys = System::new();
        sys.refresh_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::new().with_ram()));

        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return Err(SystemError::Unavailable("memory totals not reported".to_string()));
        }

        Ok(MemoryInfo {
            total_bytes,
            available_bytes: sys.available_memory(),
        })
    }

    async fn get_disk_usage(&self, path: &Path) -> Result<DiskUsage, SystemError> {
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let disks = Disks::new_with_refreshed_list();

        let mounts = disks
            .list()
            .iter()
            .map(|d| (d.mount_point().to_path_buf(), d.total_space(), d.available_space()));

        let (_, total_bytes, free_bytes) = best_mount(mounts, &target)
            .ok_or_else(|| SystemError::DiskNotFound(path.display().to_string()))?;

        Ok(DiskUsage {
            total_bytes,
            used_bytes: total_bytes.saturating_sub(free_bytes),
            free_bytes,
        })
    }
}

/// Pick the mount with the longest mount point containing `target`
fn best_mount(
    mounts: impl Iterator<Item = (PathBuf, u64, u64)>,
    target: &Path,
) -> Option<(PathBuf, u64, u64)> {
    mounts
        .filter(|(mount, _, _)| target.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
}
