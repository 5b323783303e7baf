//! Narrative Insights
//!
//! Free text shown under the scatter plot for the selected outcome dataset.
//! The source is one flat file with segments separated by a line reading
//! `NEWTOPIC` surrounded by blank lines.
//!
//! Segments are keyed by dataset display name. A segment may name its
//! dataset explicitly on its first line:
//!
//! ```text
//! TOPIC: Diabetes Percentage, 2019
//! Counties that spend more per student...
//! ```
//!
//! Files without any `TOPIC:` headers are paired with the comparison
//! datasets in configuration order, and only when the counts match exactly.

use std::collections::HashMap;
use std::path::Path;

use super::error::{DataError, DataResult};

/// Separator between segments
pub const SEGMENT_DELIMITER: &str = "\n\nNEWTOPIC\n\n";

/// Header line naming a segment's dataset
pub const TOPIC_PREFIX: &str = "TOPIC:";

/// Name-keyed narrative segments
#[derive(Debug, Clone, Default)]
pub struct InsightBook {
    segments: HashMap<String, String>,
}

impl InsightBook {
    /// Read and parse an insight file
    pub fn from_path(path: &Path, ordered_names: &[String]) -> DataResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::parse(&text, ordered_names)
    }

    /// Parse insight text, pairing unlabeled segments with `ordered_names`
    pub fn parse(text: &str, ordered_names: &[String]) -> DataResult<Self> {
        let normalized = text.replace("\r\n", "\n");
        let raw: Vec<&str> = normalized
            .split(SEGMENT_DELIMITER)
            .filter(|segment| !segment.trim().is_empty())
            .collect();

        let labeled: Vec<Option<(String, String)>> = raw.iter().map(|s| split_topic(s)).collect();
        let labeled_count = labeled.iter().filter(|l| l.is_some()).count();

        let mut segments = HashMap::with_capacity(raw.len());

        if labeled_count == 0 {
            if raw.len() != ordered_names.len() {
                return Err(DataError::InsightCount {
                    expected: ordered_names.len(),
                    found: raw.len(),
                });
            }
            for (name, body) in ordered_names.iter().zip(&raw) {
                segments.insert(name.clone(), body.trim_end().to_string());
            }
        } else if labeled_count == raw.len() {
            for (name, body) in labeled.into_iter().flatten() {
                if segments.insert(name.clone(), body).is_some() {
                    return Err(DataError::DuplicateInsight(name));
                }
            }
        } else {
            return Err(DataError::InsightFormat(format!(
                "{} of {} segments have a {} header; label all of them or none",
                labeled_count,
                raw.len(),
                TOPIC_PREFIX
            )));
        }

        Ok(Self { segments })
    }

    /// Fail unless every name in `names` has a segment
    pub fn ensure_covers(&self, names: &[String]) -> DataResult<()> {
        match names.iter().find(|name| !self.segments.contains_key(*name)) {
            Some(missing) => Err(DataError::MissingInsight(missing.clone())),
            None => Ok(()),
        }
    }

    /// Segment for a dataset, by exact display name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.segments.get(name).map(String::as_str)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn split_topic(segment: &str) -> Option<(String, String)> {
    let segment = segment.trim_start_matches('\n');
    let (first, rest) = segment.split_once('\n').unwrap_or((segment, ""));
    let name = first.trim().strip_prefix(TOPIC_PREFIX)?.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), rest.trim_end().to_string()))
}
