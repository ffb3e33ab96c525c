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

use thiserror::Error;

/// Errors raised while acquiring the collector report
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// The completion marker never appeared
    #[error("Collector report unavailable: {0}")]
    MissingInput(String),
    /// The marker is present but the report file could not be read
    #[error("Cannot read collector report {path}: {message}")]
    Unreadable { path: String, message: String },
    /// The collector itself failed to run
    #[error(transparent)]
    Collector(#[from] CollectorError),
}

/// Errors raised while publishing a report over HTTP
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The server answered with a 4xx/5xx status
    #[error("Upload failed: HTTP {status}")]
    HttpStatus { status: u16 },
    /// The request never produced a response (connection, TLS, timeout)
    #[error("Upload error: {0}")]
    Transport(String),
    /// Endpoint missing or unusable
    #[error("Invalid upload endpoint: {0}")]
    InvalidEndpoint(String),
    /// Payload could not be serialized
    #[error("Upload payload serialization failed: {0}")]
    Serialization(String),
}

/// Errors raised by a single exporter
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Writing the output file failed
    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },
    /// The document could not be encoded in the target format
    #[error("{format} serialization failed: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },
    /// The upload failed
    #[error(transparent)]
    Upload(#[from] PublishError),
}

/// Errors from host introspection adapters
#[derive(Debug, Clone, Error)]
pub enum SystemError {
    /// Requested information is not available on this host
    #[error("System information unavailable: {0}")]
    Unavailable(String),
    /// No mounted disk covers the requested path
    #[error("No disk found for path: {0}")]
    DiskNotFound(String),
}

/// Errors from running the external collector
#[derive(Debug, Clone, Error)]
pub enum CollectorError {
    /// Neither the PowerShell script nor the batch fallback could be found
    #[error("No collector script found in {0}")]
    NotFound(String),
    /// The collector process could not be started
    #[error("Failed to launch '{program}': {message}")]
    LaunchFailed { program: String, message: String },
    /// The collector exited unsuccessfully
    #[error("Collector '{program}' failed with exit code {exit_code:?}")]
    Failed {
        program: String,
        exit_code: Option<i32>,
    },
    /// The collector did not finish in time
    #[error("Collector '{program}' timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },
}

/// Errors from loading the settings file
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("Failed to read settings file {path}: {message}")]
    Read { path: String, message: String },
    /// The settings file is not valid TOML for the expected shape
    #[error("Invalid settings file {path}: {message}")]
    Invalid { path: String, message: String },
}
