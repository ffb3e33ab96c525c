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

//! Domain entities for collector reports, summaries and export settings

use super::errors::ExportError;
use super::filter::SectionFilter;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Section holding everything that precedes the first header
pub const GENERAL_SECTION: &str = "General";
/// Section the collector writes logical disk records to
pub const DISK_SECTION: &str = "Disks (Logical)";
/// Section the collector writes ping output to
pub const PING_SECTION: &str = "Ping Test";

/// Parsed collector report: section name to entry lines, in source order
///
/// Sections are kept in the order they first appear. Re-declaring a section
/// later in the text starts a fresh entry list under the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    sections: IndexMap<String, Vec<String>>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a section with an empty entry list
    pub(crate) fn start_section(&mut self, name: &str) {
        self.sections.insert(name.to_string(), Vec::new());
    }

    /// Append an entry to a section, creating the section if needed
    pub(crate) fn push_entry(&mut self, section: &str, entry: String) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(entry);
    }

    /// Entries of a section, if present
    pub fn section(&self, name: &str) -> Option<&[String]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Iterate sections in order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Section names in order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of entries across all sections
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Copy of the report holding only the sections accepted by `filter`
    pub fn filtered(&self, filter: &SectionFilter) -> Report {
        self.sections
            .iter()
            .filter(|(name, _)| filter.matches(name))
            .map(|(name, entries)| (name.clone(), entries.clone()))
            .collect()
    }
}

impl FromIterator<(String, Vec<String>)> for Report {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

/// Disk totals summed over the logical disk section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskTotals {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl DiskTotals {
    /// Used space, clamped at zero when free exceeds total
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

/// Numeric aggregates derived from a report and live host introspection
///
/// Every field is optional; absent values serialize as explicit `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub disk_total_bytes: Option<u64>,
    pub disk_free_bytes: Option<u64>,
    pub disk_used_bytes: Option<u64>,
    pub ping_avg_ms: Option<f64>,
    pub mem_total_bytes: Option<u64>,
    pub mem_available_bytes: Option<u64>,
    pub mem_used_bytes: Option<u64>,
}

impl Summary {
    /// Assemble a summary from its three independent sources
    pub fn new(disk: Option<DiskTotals>, ping_avg_ms: Option<f64>, memory: Option<&MemoryInfo>) -> Self {
        Self {
            disk_total_bytes: disk.map(|d| d.total_bytes),
            disk_free_bytes: disk.map(|d| d.free_bytes),
            disk_used_bytes: disk.map(|d| d.used_bytes()),
            ping_avg_ms,
            mem_total_bytes: memory.map(|m| m.total_bytes),
            mem_available_bytes: memory.map(|m| m.available_bytes),
            mem_used_bytes: memory.map(|m| m.used_bytes()),
        }
    }

    /// Metric name/value pairs in their fixed order
    pub fn metrics(&self) -> [(&'static str, Option<MetricValue>); 7] {
        [
            ("disk_total_bytes", self.disk_total_bytes.map(MetricValue::Bytes)),
            ("disk_free_bytes", self.disk_free_bytes.map(MetricValue::Bytes)),
            ("disk_used_bytes", self.disk_used_bytes.map(MetricValue::Bytes)),
            ("ping_avg_ms", self.ping_avg_ms.map(MetricValue::Millis)),
            ("mem_total_bytes", self.mem_total_bytes.map(MetricValue::Bytes)),
            (
                "mem_available_bytes",
                self.mem_available_bytes.map(MetricValue::Bytes),
            ),
            ("mem_used_bytes", self.mem_used_bytes.map(MetricValue::Bytes)),
        ]
    }
}

/// A single summary value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Bytes(u64),
    Millis(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bytes(bytes) => write!(f, "{bytes}"),
            MetricValue::Millis(ms) if ms.is_finite() && ms.fract() == 0.0 => write!(f, "{ms:.1}"),
            MetricValue::Millis(ms) => write!(f, "{ms}"),
        }
    }
}

/// The exported/uploaded document: filtered sections plus the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub sections: Report,
    pub summary: Summary,
}

impl ReportDocument {
    /// Build the document for `report`, keeping only sections accepted by `filter`
    pub fn new(report: &Report, summary: &Summary, filter: &SectionFilter) -> Self {
        Self {
            sections: report.filtered(filter),
            summary: *summary,
        }
    }
}

/// Operating system details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsInfo {
    /// OS name (e.g. "Windows", "Ubuntu")
    pub system: String,
    /// Host name
    pub node_name: String,
    /// Kernel release
    pub release: String,
    /// OS version string
    pub version: String,
    /// Machine architecture
    pub machine: String,
}

/// CPU details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub brand: String,
    pub architecture: String,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    /// Highest reported core frequency in MHz
    pub frequency_mhz: u64,
}

/// Memory totals in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryInfo {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

/// Disk usage for the filesystem holding a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

/// Authentication attached to an upload, resolved once before the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadAuth {
    #[default]
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl UploadAuth {
    /// Pick the authentication from optional credentials
    ///
    /// A non-empty bearer token wins. Basic auth needs both a non-empty
    /// username and password. Anything else means no authentication.
    pub fn resolve(
        bearer: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        match (bearer, username, password) {
            (Some(token), _, _) if !token.is_empty() => UploadAuth::Bearer(token),
            (_, Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                UploadAuth::Basic { username, password }
            }
            _ => UploadAuth::None,
        }
    }

    /// Value for the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            UploadAuth::None => None,
            UploadAuth::Bearer(token) => Some(format!("Bearer {token}")),
            UploadAuth::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(format!("Basic {encoded}"))
            }
        }
    }
}

/// Configuration for publishing reports
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Endpoint URL
    pub endpoint: String,
    /// Authentication
    pub auth: UploadAuth,
    /// Request timeout
    pub timeout: Duration,
}

impl PublishConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth: UploadAuth::None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for file exports
#[derive(Debug, Clone, Default)]
pub struct ExportConfig {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub xml_path: Option<PathBuf>,
    /// Filter applied to every export
    pub filter: SectionFilter,
}

/// Export destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Json,
    Csv,
    Xml,
    Upload,
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Json => write!(f, "JSON"),
            ExportTarget::Csv => write!(f, "CSV"),
            ExportTarget::Xml => write!(f, "XML"),
            ExportTarget::Upload => write!(f, "Upload"),
        }
    }
}

/// Successful export details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    /// File path or URL written to
    pub location: String,
    /// HTTP status for uploads
    pub http_status: Option<u16>,
}

/// Result of one export attempt
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub target: ExportTarget,
    pub result: Result<ExportReceipt, ExportError>,
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Settings loaded from the optional TOML file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub wait_seconds: Option<u64>,
    pub report_path: Option<PathBuf>,
    pub marker_path: Option<PathBuf>,
    pub collector_dir: Option<PathBuf>,
    pub sections: Option<String>,
    pub json_out: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub xml_out: Option<PathBuf>,
    pub upload_url: Option<String>,
    pub upload_timeout_seconds: Option<u64>,
}
