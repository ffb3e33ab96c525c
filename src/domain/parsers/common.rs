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

//! Common parsing utilities and helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref SIZE_RE: Regex =
        Regex::new(r"(?i)([0-9.,]*[0-9][0-9.,]*)\s*(KB|MB|GB|TB|B)").unwrap();
}

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Parse a human-readable size (e.g. "1.77 TB", "512mb") to bytes
///
/// The first `<number> <unit>` token anywhere in the string is used.
/// Units are binary multiples. Returns 0 for empty input, when no token is
/// found, or when the number does not parse.
///
/// # Arguments
/// * `size_str` - Text containing a size token
pub fn parse_size_to_bytes(size_str: &str) -> u64 {
    if size_str.trim().is_empty() {
        return 0;
    }

    let Some(captures) = SIZE_RE.captures(size_str) else {
        return 0;
    };

    let number: f64 = match captures[1].replace(',', "").parse() {
        Ok(number) => number,
        Err(_) => {
            log::debug!("Ignoring malformed size number: {}", &captures[1]);
            return 0;
        }
    };

    let multiplier: u64 = match captures[2].to_uppercase().as_str() {
        "B" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        "TB" => 1024_u64.pow(4),
        _ => return 0,
    };

    (number * multiplier as f64) as u64
}

/// Format bytes as binary gigabytes with two decimals (e.g. "15.87 GB")
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
