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

//! Splitting collector output into named sections

use crate::domain::{Report, GENERAL_SECTION};

/// Literal backslash-n left behind by collectors that escape newlines badly
const ESCAPED_NEWLINE: &str = "\\n";

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Title of a `=== Title ===` header line, if `line` is one
///
/// `line` must already be trimmed.
pub fn parse_section_header(line: &str) -> Option<&str> {
    if line.starts_with('=') && line.ends_with('=') {
        Some(line.trim_matches(|c: char| c == '=' || c.is_whitespace()))
    } else {
        None
    }
}

/// Split raw collector output into an ordered report
///
/// Content before the first header lands in the `General` section, which is
/// always present for non-empty input. Header and blank lines are never
/// stored; every other line is stored trimmed. A recurring header starts a
/// fresh entry list for that section. Empty input yields an empty report.
///
/// # Arguments
/// * `text` - Whole collector output
pub fn parse_report_sections(text: &str) -> Report {
    let mut report = Report::new();
    if text.is_empty() {
        return report;
    }

    let mut current = GENERAL_SECTION.to_string();
    report.start_section(&current);

    for raw_line in text.split(is_line_break) {
        let mut line = raw_line.trim();
        if let Some(rest) = line.strip_prefix(ESCAPED_NEWLINE) {
            line = rest.trim();
        }

        if let Some(title) = parse_section_header(line) {
            current = title.to_string();
            report.start_section(&current);
            continue;
        }

        if line.is_empty() {
            continue;
        }

        report.push_entry(&current, line.to_string());
    }

    log::debug!(
        "Parsed {} sections with {} entries",
        report.len(),
        report.entry_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_headers_yields_general_only() {
        let report = parse_report_sections("  first line \n\n second line\r\nthird\n");
        assert_eq!(report.section_names(), vec!["General"]);
        assert_eq!(
            report.section("General").unwrap(),
            ["first line", "second line", "third"]
        );
    }

    #[test]
    fn test_header_collects_following_entries() {
        let text = "Host: WS01\n=== Foo ===\n  alpha  \n\nbeta\n=== Bar ===\ngamma\n";
        let report = parse_report_sections(text);
        assert_eq!(report.section_names(), vec!["General", "Foo", "Bar"]);
        assert_eq!(report.section("General").unwrap(), ["Host: WS01"]);
        assert_eq!(report.section("Foo").unwrap(), ["alpha", "beta"]);
        assert_eq!(report.section("Bar").unwrap(), ["gamma"]);
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        assert!(parse_report_sections("").is_empty());
    }

    #[test]
    fn test_general_present_even_when_empty() {
        let report = parse_report_sections("=== CPU ===\nIntel\n");
        assert_eq!(report.section_names(), vec!["General", "CPU"]);
        assert!(report.section("General").unwrap().is_empty());
    }

    #[test]
    fn test_escaped_newline_prefix_is_stripped() {
        let report = parse_report_sections("\\n=== Network ===\n\\n  Adapter: eth0\n");
        assert_eq!(report.section("Network").unwrap(), ["Adapter: eth0"]);
    }

    #[test]
    fn test_recurring_header_starts_fresh_list() {
        let text = "=== Ping Test ===\nold\n=== CPU ===\nx\n=== Ping Test ===\nnew\n";
        let report = parse_report_sections(text);
        assert_eq!(report.section_names(), vec!["General", "Ping Test", "CPU"]);
        assert_eq!(report.section("Ping Test").unwrap(), ["new"]);
    }

    #[test]
    fn test_header_variants() {
        assert_eq!(parse_section_header("=== OS & System ==="), Some("OS & System"));
        assert_eq!(parse_section_header("=Single="), Some("Single"));
        assert_eq!(parse_section_header("== Disks (Logical) ====="), Some("Disks (Logical)"));
        assert_eq!(parse_section_header("=== Unterminated"), None);
        assert_eq!(parse_section_header("a = b"), None);
    }

    #[test]
    fn test_carriage_return_only_line_endings() {
        let report = parse_report_sections("one\r=== Two ===\rtwo\r");
        assert_eq!(report.section("General").unwrap(), ["one"]);
        assert_eq!(report.section("Two").unwrap(), ["two"]);
    }
}
