//! County FIPS codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a county FIPS code (2-digit state + 3-digit county)
pub const FIPS_WIDTH: usize = 5;

/// A county FIPS code, the join key shared by every table and the boundary
/// document.
///
/// Codes are kept as strings. All-digit codes shorter than five characters
/// (leading zeros lost by a spreadsheet round trip) are left-padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fips(String);

impl Fips {
    /// Normalize a raw code. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.len() < FIPS_WIDTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(format!("{:0>width$}", trimmed, width = FIPS_WIDTH)))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
