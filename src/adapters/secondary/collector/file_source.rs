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

//! Report file reader gated on the collector's completion marker

use crate::domain::ReportError;
use crate::ports::ReportSource;
use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::time::{sleep, Instant};

/// Reads the report once the completion marker exists
pub struct FileReportSource {
    report_path: PathBuf,
    marker_path: PathBuf,
    poll_interval: Duration,
}

impl FileReportSource {
    pub fn new(report_path: impl Into<PathBuf>, marker_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
            marker_path: marker_path.into(),
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Override the marker polling interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll for the marker; the first check happens immediately
    async fn wait_for_marker(&self, wait: Duration) -> bool {
        let deadline = Instant::now() + wait;
        loop {
            if fs::try_exists(&self.marker_path).await.unwrap_or(false) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[async_trait]
impl ReportSource for FileReportSource {
    async fn read_report(&self, wait: Duration) -> Result<String, ReportError> {
        if !self.wait_for_marker(wait).await {
            warn!(
                "Completion marker {} not found within {} seconds",
                self.marker_path.display(),
                wait.as_secs()
            );
            return Err(ReportError::MissingInput(format!(
                "collector not completed within {} seconds",
                wait.as_secs()
            )));
        }

        let bytes = fs::read(&self.report_path)
            .await
            .map_err(|e| ReportError::Unreadable {
                path: self.report_path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(
            "Read {} bytes from {}",
            bytes.len(),
            self.report_path.display()
        );

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_report_when_marker_present() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("info.txt"), "=== CPU ===\nx\n").unwrap();
        std::fs::write(dir.path().join("done.txt"), "").unwrap();

        let source = FileReportSource::new(dir.path().join("info.txt"), dir.path().join("done.txt"));
        let text = source.read_report(Duration::from_secs(1)).await.unwrap();
        assert_eq!(text, "=== CPU ===\nx\n");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("info.txt"), b"ok\xff\xfeend").unwrap();
        std::fs::write(dir.path().join("done.txt"), "").unwrap();

        let source = FileReportSource::new(dir.path().join("info.txt"), dir.path().join("done.txt"));
        let text = source.read_report(Duration::ZERO).await.unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with("end"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_missing_marker_times_out() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("info.txt"), "data").unwrap();

        let source = FileReportSource::new(dir.path().join("info.txt"), dir.path().join("done.txt"))
            .with_poll_interval(Duration::from_millis(10));
        let result = source.read_report(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(ReportError::MissingInput(_))));
    }

    #[tokio::test]
    async fn test_marker_without_report_is_unreadable() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("done.txt"), "").unwrap();

        let source = FileReportSource::new(dir.path().join("info.txt"), dir.path().join("done.txt"));
        let result = source.read_report(Duration::from_secs(1)).await;
        match result {
            Err(ReportError::Unreadable { path, .. }) => assert!(path.ends_with("info.txt")),
            other => panic!("expected unreadable report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_marker_appearing_later_is_seen() {
        let dir = tempdir().unwrap();
        let report = dir.path().join("info.txt");
        let marker = dir.path().join("done.txt");
        std::fs::write(&report, "late").unwrap();

        let writer_marker = marker.clone();
        let writer = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            std::fs::write(writer_marker, "").unwrap();
        });

        let source = FileReportSource::new(&report, &marker).with_poll_interval(Duration::from_millis(10));
        let text = source.read_report(Duration::from_secs(5)).await.unwrap();
        writer.await.unwrap();
        assert_eq!(text, "late");
    }
}
