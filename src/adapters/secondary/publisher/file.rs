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

//! File-based repository for writing report exports to local files

use crate::domain::{render_csv, render_json, render_xml, ExportError, ReportDocument};
use crate::ports::FileRepository;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// File system repository for JSON, CSV and XML exports
pub struct FileSystemRepository;

impl FileSystemRepository {
    /// Create a new file system repository
    pub fn new() -> Self {
        Self
    }

    /// Write `contents` to `path`, creating parent directories first
    async fn write(&self, path: &Path, contents: String) -> Result<(), ExportError> {
        let io_err = |e: std::io::Error| ExportError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        fs::write(path, contents).await.map_err(io_err)
    }
}

impl Default for FileSystemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileRepository for FileSystemRepository {
    async fn save_json(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
        let json_string = render_json(document)?;
        self.write(path, json_string).await
    }

    async fn save_csv(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
        let csv_string = render_csv(&document.sections)?;
        self.write(path, csv_string).await
    }

    async fn save_xml(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
        let xml_string = render_xml(document)?;
        self.write(path, xml_string).await
    }

    async fn load_json(&self, path: &Path) -> Result<ReportDocument, ExportError> {
        let json_string = fs::read_to_string(path)
            .await
            .map_err(|e| ExportError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        serde_json::from_str(&json_string).map_err(|e| ExportError::Serialization {
            format: "JSON",
            message: e.to_string(),
        })
    }
}
