//! Citation input data.
//!
//! Input arrives as a JSON array of records, each listing an entity's own
//! h-index values (`self`) and the h-index values of those citing it
//! (`citedBy`). Records are flattened into one [`CitationPair`] per element
//! of the cross product `self × citedBy`.

use crate::error::Result;
use crate::scale::AxisRange;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One input record as it appears in the JSON data file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CitationRecord {
    /// The entity's own h-index values.
    #[serde(rename = "self", default)]
    pub self_values: Vec<f32>,
    /// h-index values of the entities citing it.
    #[serde(rename = "citedBy", default)]
    pub cited_by: Vec<f32>,
}

impl CitationRecord {
    /// Create a record.
    #[must_use]
    pub fn new(self_values: &[f32], cited_by: &[f32]) -> Self {
        Self { self_values: self_values.to_vec(), cited_by: cited_by.to_vec() }
    }

    /// Iterate every value in the record, `self` values first.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.self_values.iter().chain(self.cited_by.iter()).copied()
    }
}

/// A directed relationship between two h-index values, drawn as one arc.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CitationPair {
    /// Value the arc starts from (`self`).
    pub source: f32,
    /// Value the arc ends at (`citedBy`).
    pub target: f32,
}

impl CitationPair {
    /// Create a pair.
    #[must_use]
    pub const fn new(source: f32, target: f32) -> Self {
        Self { source, target }
    }

    /// Absolute value difference between the endpoints.
    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.source - self.target).abs()
    }

    /// Whether both endpoints are equal (a zero-width arc).
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_degenerate(&self) -> bool {
        self.source == self.target
    }

    /// The same relationship with endpoints swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.target, self.source)
    }
}

/// Flatten records into pairs: for each record, every `self` value paired
/// with every `citedBy` value, `self` in the outer loop.
#[must_use]
pub fn flatten_pairs(records: &[CitationRecord]) -> Vec<CitationPair> {
    let capacity = records.iter().map(|r| r.self_values.len() * r.cited_by.len()).sum();
    let mut pairs = Vec::with_capacity(capacity);

    for record in records {
        for &source in &record.self_values {
            for &target in &record.cited_by {
                pairs.push(CitationPair::new(source, target));
            }
        }
    }

    pairs
}

/// Range over every value appearing in any record.
///
/// Values from records with an empty partner list still widen the range.
/// Empty input yields `AxisRange { 0, 0 }`.
#[must_use]
pub fn axis_range(records: &[CitationRecord]) -> AxisRange {
    let values: Vec<f32> = records.iter().flat_map(CitationRecord::values).collect();
    AxisRange::from_values(&values).unwrap_or_default()
}

/// Parse records from a JSON string.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if the text is not an array of records.
pub fn parse_records(json: &str) -> Result<Vec<CitationRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Load records from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CitationRecord>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_records(&content)
}

/// Flattened pairs and their axis range, computed once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationData {
    /// All directed pairs.
    pub pairs: Vec<CitationPair>,
    /// Range of every input value.
    pub axis: AxisRange,
}

impl CitationData {
    /// Build from decoded records.
    #[must_use]
    pub fn from_records(records: &[CitationRecord]) -> Self {
        let pairs = flatten_pairs(records);
        let axis = axis_range(records);
        info!(
            records = records.len(),
            pairs = pairs.len(),
            lowest = axis.lowest,
            highest = axis.highest,
            "citation data loaded"
        );
        Self { pairs, axis }
    }

    /// Build directly from pairs; the range covers the pair endpoints.
    #[must_use]
    pub fn from_pairs(pairs: Vec<CitationPair>) -> Self {
        let values: Vec<f32> = pairs.iter().flat_map(|p| [p.source, p.target]).collect();
        let axis = AxisRange::from_values(&values).unwrap_or_default();
        Self { pairs, axis }
    }

    /// Load and flatten a JSON data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_records(&load_records(path)?))
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
