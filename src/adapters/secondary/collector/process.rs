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

//! Collector script execution adapter

use crate::domain::CollectorError;
use crate::ports::CollectorRunner;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// PowerShell collector script name
pub const POWERSHELL_SCRIPT: &str = "info.ps1";
/// Batch collector script name
pub const BATCH_SCRIPT: &str = "info.bat";

/// A single way of launching the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CollectorInvocation {
    fn display_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Runs `info.ps1` through PowerShell, falling back to `info.bat`
pub struct ProcessCollectorRunner {
    /// Directory holding the collector scripts; also the working directory
    collector_dir: PathBuf,
    /// Timeout applied to each attempt
    attempt_timeout: Duration,
}

impl ProcessCollectorRunner {
    /// Create a new collector runner
    ///
    /// # Arguments
    /// * `collector_dir` - Directory containing `info.ps1` and/or `info.bat`
    /// * `attempt_timeout` - Timeout for each launch attempt
    pub fn new(collector_dir: impl Into<PathBuf>, attempt_timeout: Duration) -> Self {
        Self {
            collector_dir: collector_dir.into(),
            attempt_timeout,
        }
    }

    /// Create a runner for `collector_dir` with the default 300 second timeout
    pub fn with_defaults(collector_dir: impl Into<PathBuf>) -> Self {
        Self::new(collector_dir, Duration::from_secs(300))
    }

    /// Launch attempts in the order they will be tried
    pub fn invocations(&self) -> Vec<CollectorInvocation> {
        let mut plan = Vec::new();

        let ps1 = self.collector_dir.join(POWERSHELL_SCRIPT);
        if ps1.is_file() {
            let shell = which::which("powershell")
                .or_else(|_| which::which("pwsh"))
                .ok();
            match shell {
                Some(shell) => plan.push(CollectorInvocation {
                    program: shell,
                    args: vec![
                        "-NoProfile".into(),
                        "-ExecutionPolicy".into(),
                        "Bypass".into(),
                        "-File".into(),
                        ps1.into_os_string(),
                    ],
                }),
                None => debug!("{POWERSHELL_SCRIPT} present but no PowerShell found in PATH"),
            }
        }

        let bat = self.collector_dir.join(BATCH_SCRIPT);
        if bat.is_file() {
            plan.push(batch_invocation(bat));
        }

        plan
    }

    /// Execute a single attempt
    async fn execute_once(&self, invocation: &CollectorInvocation) -> Result<(), CollectorError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&self.collector_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(
            "Executing: {} {:?}",
            invocation.display_name(),
            invocation.args
        );

        let mut child = cmd.spawn().map_err(|e| CollectorError::LaunchFailed {
            program: invocation.display_name(),
            message: e.to_string(),
        })?;

        match timeout(self.attempt_timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(CollectorError::Failed {
                program: invocation.display_name(),
                exit_code: status.code(),
            }),
            Ok(Err(e)) => Err(CollectorError::LaunchFailed {
                program: invocation.display_name(),
                message: e.to_string(),
            }),
            Err(_) => {
                // kill_on_drop reaps the child once it goes out of scope
                Err(CollectorError::Timeout {
                    program: invocation.display_name(),
                    seconds: self.attempt_timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl CollectorRunner for ProcessCollectorRunner {
    async fn run(&self) -> Result<(), CollectorError> {
        let plan = self.invocations();
        if plan.is_empty() {
            return Err(CollectorError::NotFound(
                self.collector_dir.display().to_string(),
            ));
        }

        let mut last_error = None;
        for invocation in &plan {
            match self.execute_once(invocation).await {
                Ok(()) => {
                    info!("Collector finished: {}", invocation.display_name());
                    return Ok(());
                }
                Err(e) => {
                    warn!("Collector attempt failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CollectorError::NotFound(self.collector_dir.display().to_string())
        }))
    }
}

#[cfg(windows)]
fn batch_invocation(bat: PathBuf) -> CollectorInvocation {
    CollectorInvocation {
        program: PathBuf::from("cmd"),
        args: vec!["/C".into(), bat.into_os_string()],
    }
}

#[cfg(not(windows))]
fn batch_invocation(bat: PathBuf) -> CollectorInvocation {
    CollectorInvocation {
        program: PathBuf::from("sh"),
        args: vec![bat.into_os_string()],
    }
}
