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

use assert_fs::prelude::*;
use assert_fs::TempDir;
use host_report::{
    create_service_with_config, ContainerConfigBuilder, ExportConfig, ExportTarget,
    ReportingService, SectionFilter,
};
use predicates::prelude::*;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

const REPORT: &str = "\
Collected at 2024-05-01 10:00
=== OS & System ===
OS Name: Microsoft Windows 11 Pro
System Type: x64-based PC

=== Disks (Logical) ===
C:
Size: 476.3 GB Free: 120.5 GB
D: Size: 1.5 TB Free: 1,024 GB
=== Ping Test ===
Reply from 8.8.8.8: bytes=32 time=12ms TTL=117
Reply from 8.8.8.8: bytes=32 time=14ms TTL=117
    Minimum = 12ms, Maximum = 14ms, Average: 13ms
=== Services ===
Spooler Running
";

fn write_collector_output(temp: &TempDir) {
    temp.child("info.txt").write_str(REPORT).unwrap();
    temp.child("done.txt").touch().unwrap();
}

fn service_for(temp: &TempDir) -> Arc<dyn ReportingService> {
    create_service_with_config(
        ContainerConfigBuilder::new()
            .collector_dir(temp.path())
            .report_path(temp.child("info.txt").path())
            .marker_path(temp.child("done.txt").path())
            .poll_interval(Duration::from_millis(10))
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn exports_filtered_sections_to_every_format() {
    let temp = TempDir::new().unwrap();
    write_collector_output(&temp);
    let service = service_for(&temp);

    let report = service.acquire_report(Duration::from_secs(1)).await.unwrap();
    assert_eq!(
        report.section_names(),
        vec!["General", "OS & System", "Disks (Logical)", "Ping Test", "Services"]
    );

    let summary = service.summarize(&report).await;
    let gib = 1024u64 * 1024 * 1024;
    assert_eq!(
        summary.disk_total_bytes,
        Some((476.3 * gib as f64) as u64 + (1.5 * 1024.0 * gib as f64) as u64)
    );
    assert_eq!(summary.ping_avg_ms, Some(13.0));

    let config = ExportConfig {
        json_path: Some(temp.child("out/info.json").path().to_path_buf()),
        csv_path: Some(temp.child("info.csv").path().to_path_buf()),
        xml_path: Some(temp.child("info.xml").path().to_path_buf()),
        filter: SectionFilter::parse("os & system, ping"),
    };
    let outcomes = service.export(&report, &summary, &config).await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.is_success()));

    temp.child("out/info.json")
        .assert(predicate::str::contains("\"OS & System\": ["))
        .assert(predicate::str::contains("\"ping_avg_ms\": 13.0"))
        .assert(predicate::str::contains("Services").not());
    temp.child("info.csv")
        .assert(predicate::str::starts_with("section,entry\n"))
        .assert(predicate::str::contains("Ping Test,Reply from 8.8.8.8: bytes=32 time=12ms TTL=117"))
        .assert(predicate::str::contains("Disks (Logical)").not());
    temp.child("info.xml")
        .assert(predicate::str::contains("<section name=\"OS &amp; System\">"))
        .assert(predicate::str::contains("<metric name=\"ping_avg_ms\">13.0</metric>"));
}

#[tokio::test]
async fn failed_export_does_not_block_the_others() {
    let temp = TempDir::new().unwrap();
    write_collector_output(&temp);
    temp.child("blocker").write_str("plain file").unwrap();
    let service = service_for(&temp);

    let report = service.acquire_report(Duration::from_secs(1)).await.unwrap();
    let summary = service.summarize(&report).await;
    let config = ExportConfig {
        json_path: Some(temp.child("blocker/info.json").path().to_path_buf()),
        csv_path: Some(temp.child("info.csv").path().to_path_buf()),
        xml_path: Some(temp.child("info.xml").path().to_path_buf()),
        filter: SectionFilter::all(),
    };

    let outcomes = service.export(&report, &summary, &config).await;
    let failed: Vec<ExportTarget> = outcomes
        .iter()
        .filter(|o| !o.is_success())
        .map(|o| o.target)
        .collect();
    assert_eq!(failed, vec![ExportTarget::Json]);
    temp.child("info.csv").assert(predicate::path::exists());
    temp.child("info.xml").assert(predicate::path::exists());
}

#[tokio::test]
async fn missing_marker_is_missing_input() {
    let temp = TempDir::new().unwrap();
    temp.child("info.txt").write_str(REPORT).unwrap();
    let service = service_for(&temp);

    let result = service.acquire_report(Duration::from_millis(50)).await;
    assert!(result.is_err());
}

fn host_report(temp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_host_report"));
    cmd.current_dir(temp.path()).env_remove("HOST_REPORT_TOKEN");
    cmd
}

#[test]
fn cli_prints_sections_summary_and_writes_json() {
    let temp = TempDir::new().unwrap();
    write_collector_output(&temp);

    let output = host_report(&temp)
        .args(["--wait", "1", "--json-out", "--sections", "Disks"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Disks (Logical):\n  C:\n"));
    assert!(!stdout.contains("Spooler Running"));
    assert!(stdout.contains("  Disk:\n    Total: "));
    assert!(stdout.contains("    Ping Avg: 13.0 ms"));
    assert!(stdout.contains("Wrote JSON export to info.json"));
    assert!(stdout.contains("=== System Information ==="));

    temp.child("info.json")
        .assert(predicate::str::contains("Disks (Logical)"))
        .assert(predicate::str::contains("OS & System").not());
}

#[test]
fn cli_without_marker_reports_no_batch_info() {
    let temp = TempDir::new().unwrap();

    let output = host_report(&temp).args(["--wait", "0", "--csv-out"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No batch info available."));
    temp.child("info.csv").assert(predicate::path::missing());
}

#[test]
fn cli_reports_unreadable_report_without_timeout_message() {
    let temp = TempDir::new().unwrap();
    temp.child("done.txt").touch().unwrap();

    let output = host_report(&temp).args(["--wait", "5", "--json-out"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cannot read collector report info.txt"));
    assert!(!stdout.contains("not completed within"));
    assert!(stdout.contains("No batch info available."));
    temp.child("info.json").assert(predicate::path::missing());
}

#[test]
fn cli_reports_upload_transport_error() {
    let temp = TempDir::new().unwrap();
    write_collector_output(&temp);
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let output = host_report(&temp)
        .args(["--wait", "1", "--upload-timeout", "5", "--upload"])
        .arg(format!("http://{addr}/ingest"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Upload error: "));
}

#[test]
fn cli_rejects_invalid_settings_file() {
    let temp = TempDir::new().unwrap();
    temp.child("host_report.toml").write_str("wait_seconds = \"soon\"\n").unwrap();

    let output = host_report(&temp)
        .args(["--config", "host_report.toml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid"));
}

#[test]
fn cli_settings_file_supplies_export_path() {
    let temp = TempDir::new().unwrap();
    write_collector_output(&temp);
    temp.child("host_report.toml")
        .write_str("wait_seconds = 1\nxml_out = \"exports/report.xml\"\n")
        .unwrap();

    let output = host_report(&temp)
        .args(["--config", "host_report.toml"])
        .output()
        .unwrap();
    assert!(output.status.success());
    temp.child("exports/report.xml")
        .assert(predicate::str::starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
}
