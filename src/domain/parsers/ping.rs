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

//! Ping latency aggregation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PING_TIME_RE: Regex = Regex::new(r"time=([0-9]+)ms").unwrap();
    static ref PING_AVERAGE_RE: Regex = Regex::new(r"(?i)Average:\s*([0-9.,]+)ms").unwrap();
}

/// Latency samples found in a single ping output line
///
/// A `time=<n>ms` token and an `Average: <n>ms` token each add one sample.
/// Numbers that do not parse are dropped.
pub fn parse_ping_samples(line: &str) -> Vec<u64> {
    let mut samples = Vec::new();

    if let Some(captures) = PING_TIME_RE.captures(line) {
        if let Ok(ms) = captures[1].parse::<u64>() {
            samples.push(ms);
        }
    }

    if let Some(captures) = PING_AVERAGE_RE.captures(line) {
        match captures[1].parse::<f64>() {
            Ok(ms) => samples.push(ms as u64),
            Err(_) => log::debug!("Ignoring malformed ping average: {}", &captures[1]),
        }
    }

    samples
}

/// Mean latency over the ping test section, or `None` without samples
///
/// Per-reply times and the reported average are pooled into one mean.
///
/// # Arguments
/// * `entries` - Entries of the `Ping Test` section
pub fn aggregate_ping<S: AsRef<str>>(entries: &[S]) -> Option<f64> {
    let samples: Vec<u64> = entries
        .iter()
        .flat_map(|line| parse_ping_samples(line.as_ref()))
        .collect();

    if samples.is_empty() {
        return None;
    }

    Some(samples.iter().map(|&ms| ms as f64).sum::<f64>() / samples.len() as f64)
}
