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

use clap::Parser;
use host_report::adapters::primary::{
    render_host_info, render_outcomes, render_sections, render_summary,
};
use host_report::{
    prompt_upload_auth_on_terminal, ConfigurationProvider, ContainerConfigBuilder, ExportConfig,
    HostSnapshot, PublishConfig, ReportError, ReportingService, SectionFilter, ServiceContainer,
    Settings, UploadAuth,
};
use log::{debug, warn};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_WAIT_SECONDS: u64 = 30;
const DEFAULT_UPLOAD_TIMEOUT_SECONDS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "host_report", version, about = "Parse, summarize and export collector host reports")]
struct Opt {
    /// Run the collector script before parsing
    #[arg(long)]
    run_collector: bool,

    /// Seconds to wait for the collector to finish [default: 30]
    #[arg(long = "wait", value_name = "SECS")]
    wait_seconds: Option<u64>,

    /// Write parsed sections and summary to JSON
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "info.json")]
    json_out: Option<PathBuf>,

    /// Write parsed sections to CSV
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "info.csv")]
    csv_out: Option<PathBuf>,

    /// Write parsed sections and summary to XML
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "info.xml")]
    xml_out: Option<PathBuf>,

    /// POST the JSON report to this URL
    #[arg(long = "upload", value_name = "URL")]
    upload_url: Option<String>,

    /// Username for basic auth upload
    #[arg(long)]
    upload_user: Option<String>,

    /// Password for basic auth upload
    #[arg(long)]
    upload_pass: Option<String>,

    /// Bearer token for upload
    #[arg(long, env = "HOST_REPORT_TOKEN", hide_env_values = true)]
    upload_bearer: Option<String>,

    /// Prompt for upload credentials interactively
    #[arg(long)]
    prompt_creds: bool,

    /// Comma-separated section names to include (e.g. "OS & System,CPU,Network")
    #[arg(long)]
    sections: Option<String>,

    /// Collector report file [default: info.txt]
    #[arg(long = "report", value_name = "PATH")]
    report_path: Option<PathBuf>,

    /// Collector completion marker [default: done.txt]
    #[arg(long = "marker", value_name = "PATH")]
    marker_path: Option<PathBuf>,

    /// Directory holding info.ps1 / info.bat [default: current directory]
    #[arg(long, value_name = "DIR")]
    collector_dir: Option<PathBuf>,

    /// TOML settings file
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Upload timeout in seconds [default: 30]
    #[arg(long = "upload-timeout", value_name = "SECS")]
    upload_timeout_seconds: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,
}

/// Command line values merged over the settings file, then defaults
struct RunOptions {
    wait: Duration,
    report_path: PathBuf,
    marker_path: PathBuf,
    collector_dir: PathBuf,
    filter: SectionFilter,
    exports: ExportConfig,
    upload: Option<PublishConfig>,
}

impl RunOptions {
    fn resolve(opt: &Opt, settings: Settings) -> Self {
        let filter = opt
            .sections
            .as_deref()
            .or(settings.sections.as_deref())
            .map(SectionFilter::parse)
            .unwrap_or_default();

        let upload = opt
            .upload_url
            .clone()
            .or(settings.upload_url)
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let mut config = PublishConfig::new(url);
                config.auth = UploadAuth::resolve(
                    opt.upload_bearer.clone(),
                    opt.upload_user.clone(),
                    opt.upload_pass.clone(),
                );
                config.timeout = Duration::from_secs(
                    opt.upload_timeout_seconds
                        .or(settings.upload_timeout_seconds)
                        .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECONDS),
                );
                config
            });

        Self {
            wait: Duration::from_secs(
                opt.wait_seconds
                    .or(settings.wait_seconds)
                    .unwrap_or(DEFAULT_WAIT_SECONDS),
            ),
            report_path: opt
                .report_path
                .clone()
                .or(settings.report_path)
                .unwrap_or_else(|| PathBuf::from("info.txt")),
            marker_path: opt
                .marker_path
                .clone()
                .or(settings.marker_path)
                .unwrap_or_else(|| PathBuf::from("done.txt")),
            collector_dir: opt
                .collector_dir
                .clone()
                .or(settings.collector_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            exports: ExportConfig {
                json_path: opt.json_out.clone().or(settings.json_out),
                csv_path: opt.csv_out.clone().or(settings.csv_out),
                xml_path: opt.xml_out.clone().or(settings.xml_out),
                filter: filter.clone(),
            },
            filter,
            upload,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Root of the filesystem holding the working directory
fn root_path() -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.ancestors().last().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("/"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    let settings = ServiceContainer::new(
        ContainerConfigBuilder::new()
            .settings_path(opt.config_path.clone())
            .build(),
    )
    .create_configuration_provider()
    .load_settings()
    .await?;
    let mut run = RunOptions::resolve(&opt, settings);

    if opt.prompt_creds {
        if let Some(upload) = run.upload.as_mut() {
            upload.auth = prompt_upload_auth_on_terminal()?;
        }
    }

    let container = ServiceContainer::new(
        ContainerConfigBuilder::new()
            .settings_path(opt.config_path.clone())
            .collector_dir(run.collector_dir.clone())
            .report_path(run.report_path.clone())
            .marker_path(run.marker_path.clone())
            .build(),
    );
    let service = container.create_reporting_service()?;

    if opt.run_collector {
        println!("Running collector...");
        if service.run_collector().await.is_err() {
            println!(
                "Collector run failed; will continue to parse any existing {}",
                run.report_path.display()
            );
        }
    }

    match service.acquire_report(run.wait).await {
        Ok(report) if !report.is_empty() => {
            debug!("Parsed {} sections", report.len());
            render_sections(&mut io::stdout(), &report, &run.filter)?;

            let summary = service.summarize(&report).await;
            render_summary(&mut io::stdout(), &summary)?;

            let mut outcomes = service.export(&report, &summary, &run.exports).await;
            if let Some(upload) = &run.upload {
                outcomes.push(service.publish(&report, &summary, &run.filter, upload).await);
            }
            render_outcomes(&mut io::stdout(), &outcomes)?;
        }
        Ok(_) => {
            println!("\nNo batch info available.");
        }
        Err(ReportError::MissingInput(e)) => {
            warn!("{e}");
            println!(
                "\nBatch script not completed within {} seconds; continuing.",
                run.wait.as_secs()
            );
            println!("\nNo batch info available.");
        }
        Err(e) => {
            warn!("{e}");
            println!("\n{e}; continuing.");
            println!("\nNo batch info available.");
        }
    }

    let host = HostSnapshot::collect(container.create_host_info_provider().as_ref(), &root_path()).await;
    render_host_info(&mut io::stdout(), &host)?;
    println!("\n\u{2713} Information retrieval complete!\n");

    if opt.pause {
        print!("Press Enter to exit...");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    Ok(())
}
