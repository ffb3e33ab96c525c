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

//! Plain-text console rendering of reports, summaries and host details

use crate::domain::{
    format_gib, percentage, CpuInfo, DiskUsage, ExportOutcome, ExportTarget, MemoryInfo, OsInfo,
    Report, SectionFilter, Summary, SystemError,
};
use crate::ports::HostInfoProvider;
use std::io::{self, Write};
use std::path::Path;

/// Display cap for long sections: (name fragment, limit, noun)
const DISPLAY_LIMITS: [(&str, usize, &str); 2] = [
    ("Installed Programs", 50, "installed programs"),
    ("Services", 100, "services"),
];

/// Entry cap for a section, if its name is one of the long ones
fn display_limit(section: &str) -> Option<(usize, &'static str)> {
    DISPLAY_LIMITS
        .iter()
        .find(|(fragment, _, _)| section.contains(fragment))
        .map(|(_, limit, noun)| (*limit, *noun))
}

/// Print every section passing `filter` as `Name:` followed by indented entries
pub fn render_sections<W: Write>(
    out: &mut W,
    report: &Report,
    filter: &SectionFilter,
) -> io::Result<()> {
    writeln!(out, "\n=== Batch Script Information ===")?;
    for (name, entries) in report.sections() {
        if !filter.matches(name) {
            continue;
        }
        writeln!(out, "\n{name}:")?;

        match display_limit(name) {
            Some((limit, noun)) if entries.len() > limit => {
                writeln!(out, "  [Showing first {limit} of {} {noun}]", entries.len())?;
                for entry in &entries[..limit] {
                    writeln!(out, "  {entry}")?;
                }
                writeln!(
                    out,
                    "  ... ({} more) - See exports for full list",
                    entries.len() - limit
                )?;
            }
            _ => {
                for entry in entries {
                    writeln!(out, "  {entry}")?;
                }
            }
        }
    }
    Ok(())
}

/// Print the disk, memory and ping summary, skipping absent groups
pub fn render_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "\n=== Summary ===")?;

    if let (Some(total), Some(used), Some(free)) = (
        summary.disk_total_bytes,
        summary.disk_used_bytes,
        summary.disk_free_bytes,
    ) {
        if total > 0 {
            write_usage_block(out, "Disk", total, used, free)?;
        }
    }

    if let (Some(total), Some(used), Some(available)) = (
        summary.mem_total_bytes,
        summary.mem_used_bytes,
        summary.mem_available_bytes,
    ) {
        if total > 0 {
            write_usage_block(out, "Memory", total, used, available)?;
        }
    }

    if let Some(ping) = summary.ping_avg_ms {
        writeln!(out, "  Network:")?;
        writeln!(out, "    Ping Avg: {ping:.1} ms")?;
    }
    Ok(())
}

fn write_usage_block<W: Write>(
    out: &mut W,
    label: &str,
    total: u64,
    used: u64,
    free: u64,
) -> io::Result<()> {
    writeln!(out, "  {label}:")?;
    writeln!(out, "    Total: {}", format_gib(total))?;
    writeln!(
        out,
        "    Used:  {} ({:.1}%)",
        format_gib(used),
        percentage(used, total)
    )?;
    writeln!(out, "    Free:  {}", format_gib(free))
}

/// One line per export attempt, success or failure
pub fn render_outcomes<W: Write>(out: &mut W, outcomes: &[ExportOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        match &outcome.result {
            Ok(receipt) => match receipt.http_status {
                Some(status) => writeln!(out, "Upload succeeded, HTTP {status}")?,
                None => writeln!(out, "Wrote {} export to {}", outcome.target, receipt.location)?,
            },
            Err(e) => match outcome.target {
                ExportTarget::Upload => writeln!(out, "{e}")?,
                target => writeln!(out, "Failed to write {target}: {e}")?,
            },
        }
    }
    Ok(())
}

/// Live host details, each gathered independently
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub os: Result<OsInfo, SystemError>,
    pub cpu: Result<CpuInfo, SystemError>,
    pub memory: Result<MemoryInfo, SystemError>,
    pub disk: Result<DiskUsage, SystemError>,
}

impl HostSnapshot {
    /// Query every provider call; the disk is the one holding `disk_path`
    pub async fn collect(provider: &dyn HostInfoProvider, disk_path: &Path) -> Self {
        Self {
            os: provider.get_os_info().await,
            cpu: provider.get_cpu_info().await,
            memory: provider.get_memory_info().await,
            disk: provider.get_disk_usage(disk_path).await,
        }
    }
}

/// Print the system, CPU, memory and disk blocks
pub fn render_host_info<W: Write>(out: &mut W, host: &HostSnapshot) -> io::Result<()> {
    writeln!(out, "\n=== System Information ===")?;
    match &host.os {
        Ok(os) => {
            writeln!(out, "System: {}", os.system)?;
            writeln!(out, "Node Name: {}", os.node_name)?;
            writeln!(out, "Release: {}", os.release)?;
            writeln!(out, "Version: {}", os.version)?;
            writeln!(out, "Machine: {}", os.machine)?;
        }
        Err(e) => writeln!(out, "Error retrieving system info: {e}")?,
    }

    writeln!(out, "\n=== CPU Information ===")?;
    match &host.cpu {
        Ok(cpu) => {
            writeln!(out, "CPU Brand: {}", cpu.brand)?;
            writeln!(out, "Architecture: {}", cpu.architecture)?;
            match cpu.physical_cores {
                Some(cores) => writeln!(out, "Cores (Physical): {cores}")?,
                None => writeln!(out, "Cores (Physical): Unknown")?,
            }
            writeln!(out, "Cores (Logical): {}", cpu.logical_cores)?;
            writeln!(out, "Max Frequency: {:.2} MHz", cpu.frequency_mhz as f64)?;
        }
        Err(e) => writeln!(out, "Error retrieving CPU info: {e}")?,
    }

    writeln!(out, "\n=== Memory Information ===")?;
    match &host.memory {
        Ok(memory) => {
            writeln!(out, "Total: {}", format_gib(memory.total_bytes))?;
            writeln!(out, "Available: {}", format_gib(memory.available_bytes))?;
        }
        Err(e) => writeln!(out, "Error retrieving memory info: {e}")?,
    }

    writeln!(out, "\n=== Disk Information ===")?;
    match &host.disk {
        Ok(disk) => {
            writeln!(out, "Total: {}", format_gib(disk.total_bytes))?;
            writeln!(out, "Used: {}", format_gib(disk.used_bytes))?;
            writeln!(out, "Free: {}", format_gib(disk.free_bytes))?;
        }
        Err(e) => writeln!(out, "Error retrieving disk info: {e}")?,
    }
    Ok(())
}
