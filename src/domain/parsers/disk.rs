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

//! Logical disk record aggregation

use super::common::parse_size_to_bytes;
use crate::domain::DiskTotals;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISK_SIZE_RE: Regex =
        Regex::new(r"(?i)Size:\s*([0-9.,]*[0-9][0-9.,]*\s*(?:KB|MB|GB|TB|B))").unwrap();
    static ref DISK_FREE_RE: Regex =
        Regex::new(r"(?i)Free:\s*([0-9.,]*[0-9][0-9.,]*\s*(?:KB|MB|GB|TB|B))").unwrap();
}

fn is_data_line(line: &str) -> bool {
    line.contains("Size:") && line.contains("Free:")
}

/// Size and free bytes carried by a single data line
fn extract_size_free(line: &str) -> (u64, u64) {
    let size = DISK_SIZE_RE
        .captures(line)
        .map_or(0, |c| parse_size_to_bytes(&c[1]));
    let free = DISK_FREE_RE
        .captures(line)
        .map_or(0, |c| parse_size_to_bytes(&c[1]));
    (size, free)
}

/// Sum total and free bytes over the logical disk section
///
/// A record is either one line carrying both `Size:` and `Free:`, or a
/// device line followed by such a data line. Lines matching neither shape
/// are skipped.
///
/// # Arguments
/// * `entries` - Entries of the `Disks (Logical)` section
pub fn aggregate_disk<S: AsRef<str>>(entries: &[S]) -> DiskTotals {
    let mut totals = DiskTotals::default();
    let mut i = 0;

    while i < entries.len() {
        let line = entries[i].as_ref();
        let data_line = if is_data_line(line) {
            i += 1;
            Some(line)
        } else if entries
            .get(i + 1)
            .is_some_and(|next| is_data_line(next.as_ref()))
        {
            let next = entries[i + 1].as_ref();
            i += 2;
            Some(next)
        } else {
            i += 1;
            None
        };

        if let Some(data_line) = data_line {
            let (size, free) = extract_size_free(data_line);
            totals.total_bytes = totals.total_bytes.saturating_add(size);
            totals.free_bytes = totals.free_bytes.saturating_add(free);
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_one_line_record() {
        let totals = aggregate_disk(&["C: Size: 100 GB Free: 40 GB"]);
        assert_eq!(totals.total_bytes, 107374182400);
        assert_eq!(totals.free_bytes, 42949672960);
    }

    #[test]
    fn test_two_line_record_equals_one_line() {
        let one = aggregate_disk(&["C: Size: 100 GB Free: 40 GB"]);
        let two = aggregate_disk(&["C:", "Size: 100 GB Free: 40 GB"]);
        assert_eq!(one, two);
    }

    #[test]
    fn test_mixed_records_and_noise() {
        let entries = [
            "DeviceID: C:",
            "Size: 1.5 TB Free: 512 GB",
            "D: Size: 200 GB Free: 50 GB",
            "garbage line",
            "E:",
            "not a data line",
        ];
        let totals = aggregate_disk(&entries);
        assert_eq!(totals.total_bytes, (1.5 * 1024.0 * 1024.0 * 1024.0 * 1024.0) as u64 + 200 * GIB);
        assert_eq!(totals.free_bytes, 562 * GIB);
    }

    #[test]
    fn test_empty_entries() {
        let entries: [&str; 0] = [];
        assert_eq!(aggregate_disk(&entries), DiskTotals::default());
    }

    #[test]
    fn test_missing_size_value_counts_zero() {
        let totals = aggregate_disk(&["C: Size: unknown Free: 10 GB"]);
        assert_eq!(totals.total_bytes, 0);
        assert_eq!(totals.free_bytes, 10 * GIB);
        assert_eq!(totals.used_bytes(), 0);
    }

    #[test]
    fn test_lowercase_units() {
        let totals = aggregate_disk(&["C: Size: 2 tb Free: 1,024 gb"]);
        assert_eq!(totals.total_bytes, 2 * 1024 * GIB);
        assert_eq!(totals.free_bytes, 1024 * GIB);
    }

    #[test]
    fn test_works_with_owned_strings() {
        let entries = vec!["C:".to_string(), "Size: 10 GB Free: 5 GB".to_string()];
        assert_eq!(aggregate_disk(&entries).total_bytes, 10 * GIB);
    }

    #[test]
    fn test_leading_decimal_point_sizes() {
        let totals = aggregate_disk(&["C: Size: .5 GB Free: .25 GB"]);
        assert_eq!(totals.total_bytes, GIB / 2);
        assert_eq!(totals.free_bytes, GIB / 4);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let record = "C: Size: 99999999999999999999 TB Free: 1 GB";
        let totals = aggregate_disk(&[record, record]);
        assert_eq!(totals.total_bytes, u64::MAX);
        assert_eq!(totals.free_bytes, 2 * GIB);
    }
}
