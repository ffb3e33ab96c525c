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

use crate::domain::{ExportError, PublishConfig, PublishError, ReportDocument};
use async_trait::async_trait;
use std::path::Path;

/// Secondary port - Data publishing abstraction
///
/// This interface abstracts how report documents are sent to remote
/// endpoints, allowing for different transports.
#[async_trait]
pub trait DataPublisher: Send + Sync {
    /// Publish a report document to a remote endpoint
    ///
    /// # Arguments
    /// * `document` - The filtered report document to publish
    /// * `config` - Publishing configuration
    ///
    /// # Returns
    /// * `Ok(u16)` - HTTP status of the accepted request
    /// * `Err(PublishError)` - HTTP error status or transport failure
    async fn publish(
        &self,
        document: &ReportDocument,
        config: &PublishConfig,
    ) -> Result<u16, PublishError>;
}

/// Secondary port - File repository abstraction
///
/// This interface abstracts file-based storage of report documents
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Save the document as pretty-printed JSON
    async fn save_json(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError>;

    /// Save the document's sections as `section,entry` CSV rows
    async fn save_csv(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError>;

    /// Save the document as XML
    async fn save_xml(&self, document: &ReportDocument, path: &Path) -> Result<(), ExportError>;

    /// Load a document previously saved as JSON
    async fn load_json(&self, path: &Path) -> Result<ReportDocument, ExportError>;
}
