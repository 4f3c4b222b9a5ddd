//! All supported message resource formats.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod csv;
pub mod properties;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

pub use self::csv::Table as CsvTable;
pub use self::properties::Format as PropertiesFormat;

use crate::Error;

/// Represents all supported resource formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    /// One locale per file, `key = value` lines.
    Properties,
    /// Several locales per file, one column each.
    Csv,
}

impl FormatType {
    /// Canonical file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Properties => "properties",
            FormatType::Csv => "csv",
        }
    }

    /// Infers a format from a file extension, case-insensitively.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<FormatType> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Properties => write!(f, "properties"),
            FormatType::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "properties" | "lang" => Ok(FormatType::Properties),
            "csv" => Ok(FormatType::Csv),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}
