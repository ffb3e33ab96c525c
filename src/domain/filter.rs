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

//! Section name filtering shared by the console output and every exporter

/// Case-insensitive substring filter over section names
///
/// An empty filter accepts every section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFilter {
    terms: Vec<String>,
}

impl SectionFilter {
    /// Filter that accepts everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from individual terms
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|term| term.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Build a filter from a comma-separated list (e.g. `"OS & System,CPU"`)
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Whether the filter has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `section_name` passes the filter
    pub fn matches(&self, section_name: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let name = section_name.to_lowercase();
        self.terms.iter().any(|term| name.contains(term.as_str()))
    }
}

/// Check a section name against optional filter terms
pub fn matches(section_name: &str, filter_terms: Option<&[String]>) -> bool {
    match filter_terms {
        Some(terms) => SectionFilter::new(terms).matches(section_name),
        None => true,
    }
}
