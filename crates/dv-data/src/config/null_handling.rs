//! Missing-value handling for numeric sample columns

use serde::{Deserialize, Serialize};

/// Which cells count as missing when a sample column is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Cell contents treated as missing
    pub patterns: Vec<String>,

    /// Trim whitespace before matching and parsing
    pub trim_whitespace: bool,

    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),
                "-".to_string(),
                "NA".to_string(),
                "N/A".to_string(),
                "NaN".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Only empty cells are missing
    pub fn strict() -> Self {
        Self {
            patterns: vec![String::new()],
            ..Self::default()
        }
    }

    pub fn is_null(&self, value: &str) -> bool {
        let value = self.prepare(value);
        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                value == pattern
            } else {
                value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// `None` for a missing cell, otherwise the parse result
    pub fn parse_cell(&self, value: &str) -> Option<Result<f64, String>> {
        if self.is_null(value) {
            return None;
        }
        let value = self.prepare(value);
        Some(value.parse::<f64>().map_err(|_| value.to_string()))
    }

    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    fn prepare<'a>(&self, value: &'a str) -> &'a str {
        if self.trim_whitespace {
            value.trim()
        } else {
            value
        }
    }
}
