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

//! Serialization of report documents to JSON, CSV and XML
//!
//! These functions only encode; writing files and sending requests is left
//! to the publisher adapters.

use super::entities::{Report, ReportDocument};
use super::errors::ExportError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Pretty-printed JSON with non-ASCII characters kept literal
pub fn render_json(document: &ReportDocument) -> Result<String, ExportError> {
    serde_json::to_string_pretty(document).map_err(|e| ExportError::Serialization {
        format: "JSON",
        message: e.to_string(),
    })
}

/// Compact JSON used as the upload body
pub fn render_json_compact(document: &ReportDocument) -> Result<String, ExportError> {
    serde_json::to_string(document).map_err(|e| ExportError::Serialization {
        format: "JSON",
        message: e.to_string(),
    })
}

/// `section,entry` rows, one per entry, after a header row
pub fn render_csv(sections: &Report) -> Result<String, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Serialization {
        format: "CSV",
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["section", "entry"]).map_err(csv_err)?;
    for (section, entries) in sections.sections() {
        for entry in entries {
            writer
                .write_record([section, entry.as_str()])
                .map_err(csv_err)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Serialization {
        format: "CSV",
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ExportError::Serialization {
        format: "CSV",
        message: e.to_string(),
    })
}

/// Drop control characters other than tab, newline and carriage return
pub fn sanitize_xml_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Serialization {
        format: "XML",
        message: e.to_string(),
    }
}

/// `<report>` document with `<sections>` and `<summary>` children
///
/// All names and values are sanitized before being escaped and written.
pub fn render_xml(document: &ReportDocument) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("report")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::Start(BytesStart::new("sections")))
        .map_err(xml_err)?;
    for (section, entries) in document.sections.sections() {
        let name = sanitize_xml_text(section);
        let start = BytesStart::new("section").with_attributes([("name", name.as_str())]);
        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        for entry in entries {
            write_text_element(&mut writer, BytesStart::new("entry"), &sanitize_xml_text(entry))?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("section")))
            .map_err(xml_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("sections")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::Start(BytesStart::new("summary")))
        .map_err(xml_err)?;
    for (name, value) in document.summary.metrics() {
        let value = value.map_or_else(|| "null".to_string(), |v| v.to_string());
        let start = BytesStart::new("metric").with_attributes([("name", name)]);
        write_text_element(&mut writer, start, &sanitize_xml_text(&value))?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("summary")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("report")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_err)
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), ExportError> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer.write_event(Event::End(end)).map_err(xml_err)?;
    Ok(())
}
