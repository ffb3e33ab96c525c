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

use crate::domain::{
    aggregate_disk, aggregate_ping, parse_report_sections, ExportConfig, ExportError,
    ExportOutcome, ExportReceipt, ExportTarget, PublishConfig, Report, ReportDocument,
    ReportError, SectionFilter, Summary, DISK_SECTION, PING_SECTION,
};
use crate::ports::{
    CollectorRunner, DataPublisher, FileRepository, HostInfoProvider, ReportSource,
    ReportingService,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Domain service that turns collector output into summaries and exports
///
/// Every step is sequential. Export failures are collected per target and
/// never stop the remaining exports.
pub struct ReportService {
    /// Live host introspection
    host_provider: Arc<dyn HostInfoProvider>,
    /// External collector
    collector: Arc<dyn CollectorRunner>,
    /// Collector report access
    report_source: Arc<dyn ReportSource>,
    /// File exports
    file_repository: Arc<dyn FileRepository>,
    /// Remote upload
    data_publisher: Arc<dyn DataPublisher>,
}

impl ReportService {
    /// Create a new report service
    ///
    /// # Arguments
    /// * `host_provider` - Live host introspection
    /// * `collector` - Runner for the external collector script
    /// * `report_source` - Reader for the collector's report
    /// * `file_repository` - Writer for JSON/CSV/XML exports
    /// * `data_publisher` - Publisher for uploads
    pub fn new(
        host_provider: Arc<dyn HostInfoProvider>,
        collector: Arc<dyn CollectorRunner>,
        report_source: Arc<dyn ReportSource>,
        file_repository: Arc<dyn FileRepository>,
        data_publisher: Arc<dyn DataPublisher>,
    ) -> Self {
        Self {
            host_provider,
            collector,
            report_source,
            file_repository,
            data_publisher,
        }
    }
}

/// Log a file export result and wrap it as an outcome
fn file_outcome(
    target: ExportTarget,
    path: &Path,
    result: Result<(), ExportError>,
) -> ExportOutcome {
    let location = path.display().to_string();
    match &result {
        Ok(()) => log::info!("Wrote {target} export to {location}"),
        Err(e) => log::error!("Failed to write {target} export: {e}"),
    }

    ExportOutcome {
        target,
        result: result.map(|()| ExportReceipt {
            location,
            http_status: None,
        }),
    }
}

#[async_trait]
impl ReportingService for ReportService {
    async fn run_collector(&self) -> Result<(), ReportError> {
        self.collector.run().await.map_err(|e| {
            log::warn!("Collector run failed: {e}");
            ReportError::from(e)
        })
    }

    async fn acquire_report(&self, wait: Duration) -> Result<Report, ReportError> {
        let text = self.report_source.read_report(wait).await.map_err(|e| {
            log::warn!("{e}");
            e
        })?;
        Ok(parse_report_sections(&text))
    }

    async fn summarize(&self, report: &Report) -> Summary {
        let disk = aggregate_disk(report.section(DISK_SECTION).unwrap_or_default());
        let ping = aggregate_ping(report.section(PING_SECTION).unwrap_or_default());

        let memory = match self.host_provider.get_memory_info().await {
            Ok(memory) => Some(memory),
            Err(e) => {
                log::warn!("Memory introspection failed: {e}");
                None
            }
        };

        Summary::new(Some(disk), ping, memory.as_ref())
    }

    async fn export(
        &self,
        report: &Report,
        summary: &Summary,
        config: &ExportConfig,
    ) -> Vec<ExportOutcome> {
        let document = ReportDocument::new(report, summary, &config.filter);
        let mut outcomes = Vec::new();

        if let Some(path) = config.json_path.as_deref() {
            let result = self.file_repository.save_json(&document, path).await;
            outcomes.push(file_outcome(ExportTarget::Json, path, result));
        }
        if let Some(path) = config.csv_path.as_deref() {
            let result = self.file_repository.save_csv(&document, path).await;
            outcomes.push(file_outcome(ExportTarget::Csv, path, result));
        }
        if let Some(path) = config.xml_path.as_deref() {
            let result = self.file_repository.save_xml(&document, path).await;
            outcomes.push(file_outcome(ExportTarget::Xml, path, result));
        }

        outcomes
    }

    async fn publish(
        &self,
        report: &Report,
        summary: &Summary,
        filter: &SectionFilter,
        config: &PublishConfig,
    ) -> ExportOutcome {
        let document = ReportDocument::new(report, summary, filter);
        let result = self.data_publisher.publish(&document, config).await;

        match &result {
            Ok(status) => log::info!("Upload to {} succeeded, HTTP {status}", config.endpoint),
            Err(e) => log::error!("Upload to {} failed: {e}", config.endpoint),
        }

        ExportOutcome {
            target: ExportTarget::Upload,
            result: result
                .map(|status| ExportReceipt {
                    location: config.endpoint.clone(),
                    http_status: Some(status),
                })
                .map_err(ExportError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CollectorError, CpuInfo, DiskUsage, MemoryInfo, OsInfo, PublishError, SystemError,
    };
    use std::sync::Mutex;

    struct FakeHost {
        memory: Option<MemoryInfo>,
    }

    #[async_trait]
    impl HostInfoProvider for FakeHost {
        async fn get_os_info(&self) -> Result<OsInfo, SystemError> {
            Ok(OsInfo::default())
        }
        async fn get_cpu_info(&self) -> Result<CpuInfo, SystemError> {
            Ok(CpuInfo::default())
        }
        async fn get_memory_info(&self) -> Result<MemoryInfo, SystemError> {
            self.memory
                .ok_or_else(|| SystemError::Unavailable("memory".to_string()))
        }
        async fn get_disk_usage(&self, path: &Path) -> Result<DiskUsage, SystemError> {
            Err(SystemError::DiskNotFound(path.display().to_string()))
        }
    }

    struct FakeCollector;

    #[async_trait]
    impl CollectorRunner for FakeCollector {
        async fn run(&self) -> Result<(), CollectorError> {
            Err(CollectorError::NotFound(".".to_string()))
        }
    }

    struct FakeSource {
        text: Option<String>,
    }

    #[async_trait]
    impl ReportSource for FakeSource {
        async fn read_report(&self, _wait: Duration) -> Result<String, ReportError> {
            self.text
                .clone()
                .ok_or_else(|| ReportError::MissingInput("no marker".to_string()))
        }
    }

    /// Records every save; JSON writes always fail
    #[derive(Default)]
    struct FlakyRepository {
        saved: Mutex<Vec<(ExportTarget, usize)>>,
    }

    #[async_trait]
    impl FileRepository for FlakyRepository {
        async fn save_json(&self, _document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
            Err(ExportError::Io {
                path: path.display().to_string(),
                message: "disk full".to_string(),
            })
        }
        async fn save_csv(&self, document: &ReportDocument, _path: &Path) -> Result<(), ExportError> {
            self.saved
                .lock()
                .unwrap()
                .push((ExportTarget::Csv, document.sections.len()));
            Ok(())
        }
        async fn save_xml(&self, document: &ReportDocument, _path: &Path) -> Result<(), ExportError> {
            self.saved
                .lock()
                .unwrap()
                .push((ExportTarget::Xml, document.sections.len()));
            Ok(())
        }
        async fn load_json(&self, path: &Path) -> Result<ReportDocument, ExportError> {
            Err(ExportError::Io {
                path: path.display().to_string(),
                message: "not stored".to_string(),
            })
        }
    }

    struct FakePublisher {
        response: Result<u16, PublishError>,
        sections_seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DataPublisher for FakePublisher {
        async fn publish(
            &self,
            document: &ReportDocument,
            _config: &PublishConfig,
        ) -> Result<u16, PublishError> {
            let mut seen = self.sections_seen.lock().unwrap();
            seen.extend(document.sections.section_names().into_iter().map(String::from));
            self.response.clone()
        }
    }

    const REPORT: &str = "\
Collected by info.ps1
=== Disks (Logical) ===
C:
Size: 100 GB Free: 40 GB
=== Ping Test ===
Reply from 1.1.1.1: bytes=32 time=10ms TTL=57
Reply from 1.1.1.1: bytes=32 time=20ms TTL=57
Average: 15ms
=== Services ===
Spooler Running
";

    fn service(
        memory: Option<MemoryInfo>,
        text: Option<&str>,
        repository: Arc<FlakyRepository>,
        publisher: Arc<FakePublisher>,
    ) -> ReportService {
        ReportService::new(
            Arc::new(FakeHost { memory }),
            Arc::new(FakeCollector),
            Arc::new(FakeSource {
                text: text.map(String::from),
            }),
            repository,
            publisher,
        )
    }

    fn publisher(response: Result<u16, PublishError>) -> Arc<FakePublisher> {
        Arc::new(FakePublisher {
            response,
            sections_seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_summarize_combines_sources() {
        let memory = MemoryInfo {
            total_bytes: 16 * 1024,
            available_bytes: 4 * 1024,
        };
        let svc = service(
            Some(memory),
            Some(REPORT),
            Arc::new(FlakyRepository::default()),
            publisher(Ok(200)),
        );

        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;

        assert_eq!(summary.disk_total_bytes, Some(107374182400));
        assert_eq!(summary.disk_free_bytes, Some(42949672960));
        assert_eq!(summary.disk_used_bytes, Some(107374182400 - 42949672960));
        assert_eq!(summary.ping_avg_ms, Some(15.0));
        assert_eq!(summary.mem_used_bytes, Some(12 * 1024));
    }

    #[tokio::test]
    async fn test_summarize_without_memory_or_sections() {
        let svc = service(
            None,
            Some("just text"),
            Arc::new(FlakyRepository::default()),
            publisher(Ok(200)),
        );
        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;

        assert_eq!(summary.disk_total_bytes, Some(0));
        assert_eq!(summary.disk_used_bytes, Some(0));
        assert_eq!(summary.ping_avg_ms, None);
        assert_eq!(summary.mem_total_bytes, None);
        assert_eq!(summary.mem_available_bytes, None);
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let svc = service(
            None,
            None,
            Arc::new(FlakyRepository::default()),
            publisher(Ok(200)),
        );
        let err = svc.acquire_report(Duration::from_millis(10)).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingInput(_)));
    }

    #[tokio::test]
    async fn test_collector_failure_is_surfaced() {
        let svc = service(
            None,
            None,
            Arc::new(FlakyRepository::default()),
            publisher(Ok(200)),
        );
        assert!(matches!(
            svc.run_collector().await,
            Err(ReportError::Collector(CollectorError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_failed_export_does_not_stop_others() {
        let repository = Arc::new(FlakyRepository::default());
        let svc = service(None, Some(REPORT), repository.clone(), publisher(Ok(200)));
        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;

        let config = ExportConfig {
            json_path: Some("info.json".into()),
            csv_path: Some("info.csv".into()),
            xml_path: Some("info.xml".into()),
            filter: SectionFilter::parse("disk,ping"),
        };
        let outcomes = svc.export(&report, &summary, &config).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].target, ExportTarget::Json);
        assert!(!outcomes[0].is_success());
        assert!(outcomes[1].is_success());
        assert!(outcomes[2].is_success());
        assert_eq!(
            *repository.saved.lock().unwrap(),
            vec![(ExportTarget::Csv, 2), (ExportTarget::Xml, 2)]
        );
    }

    #[tokio::test]
    async fn test_only_configured_exports_run() {
        let svc = service(
            None,
            Some(REPORT),
            Arc::new(FlakyRepository::default()),
            publisher(Ok(200)),
        );
        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;
        let config = ExportConfig {
            xml_path: Some("info.xml".into()),
            ..Default::default()
        };
        let outcomes = svc.export(&report, &summary, &config).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].target, ExportTarget::Xml);
    }

    #[tokio::test]
    async fn test_publish_applies_filter_and_reports_status() {
        let fake = publisher(Ok(201));
        let svc = service(
            None,
            Some(REPORT),
            Arc::new(FlakyRepository::default()),
            fake.clone(),
        );
        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;

        let outcome = svc
            .publish(
                &report,
                &summary,
                &SectionFilter::parse("services"),
                &PublishConfig::new("http://example.invalid/upload"),
            )
            .await;

        assert_eq!(outcome.result.unwrap().http_status, Some(201));
        assert_eq!(*fake.sections_seen.lock().unwrap(), vec!["Services".to_string()]);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_http_status_distinct() {
        let svc = service(
            None,
            Some(REPORT),
            Arc::new(FlakyRepository::default()),
            publisher(Err(PublishError::HttpStatus { status: 500 })),
        );
        let report = svc.acquire_report(Duration::from_secs(1)).await.unwrap();
        let summary = svc.summarize(&report).await;
        let outcome = svc
            .publish(
                &report,
                &summary,
                &SectionFilter::all(),
                &PublishConfig::new("http://example.invalid/upload"),
            )
            .await;

        assert!(matches!(
            outcome.result,
            Err(ExportError::Upload(PublishError::HttpStatus { status: 500 }))
        ));
    }
}
