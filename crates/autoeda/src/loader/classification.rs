//! Column classification and identifier detection.
//!
//! Columns are split into numeric and categorical by dtype. Numeric columns
//! then pass through two identifier predicates combined by OR; a column that
//! trips either is left out of the valid numeric set so primary keys and row
//! indices do not pollute correlations and outlier counts.
//!
//! A gap-free integer run alone is not enough: a measured `value` of `1..n`
//! looks the same. The sequential rule also needs a key-like header, either
//! an identifier keyword or a positional name such as `#`, `row` or the blank
//! `Unnamed: 0` header left by exported indices.

use crate::config::AnalysisConfig;
use crate::table::Table;
use crate::utils::{is_integer_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Headers that name a row position rather than a measurement.
const POSITIONAL_HEADERS: [&str; 7] = ["", "#", "n", "no", "row", "rownum", "row_number"];

/// Broad kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Which identifier predicate excluded a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierRule {
    /// Key-like header over all-distinct integers forming a gap-free run.
    SequentialKey,
    /// Identifier-like name with near-unique values.
    NamedIdentifier,
}

/// A numeric column dropped from the valid numeric set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedColumn {
    pub name: String,
    pub rule: IdentifierRule,
}

/// Heuristic parameters for identifier detection.
#[derive(Debug, Clone)]
pub struct IdentifierRules {
    pub keywords: Vec<String>,
    pub uniqueness_ratio: f64,
}

impl From<&AnalysisConfig> for IdentifierRules {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            keywords: config
                .identifier_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            uniqueness_ratio: config.identifier_uniqueness_ratio,
        }
    }
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

/// Per-column kinds plus the derived valid numeric set.
///
/// Computed once at load time and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    /// Every column with its kind, in table order.
    pub kinds: Vec<(String, ColumnKind)>,
    /// All numeric columns, in table order.
    pub numeric: Vec<String>,
    /// Numeric columns that are not identifier-like.
    pub valid_numeric: Vec<String>,
    /// All non-numeric columns, in table order.
    pub categorical: Vec<String>,
    /// Numeric columns excluded as identifiers.
    pub excluded: Vec<ExcludedColumn>,
}

impl ColumnClassification {
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.kinds
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, kind)| *kind)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|e| e.name == name)
    }
}

/// Classify every column of a table.
pub fn classify(table: &Table, rules: &IdentifierRules) -> ColumnClassification {
    let rows = table.height();
    let mut classification = ColumnClassification {
        kinds: Vec::with_capacity(table.width()),
        numeric: Vec::new(),
        valid_numeric: Vec::new(),
        categorical: Vec::new(),
        excluded: Vec::new(),
    };

    debug!("Analyzing column types...");
    for series in table.iter_series() {
        let name = series.name().to_string();

        if !is_numeric_dtype(series.dtype()) {
            classification.kinds.push((name.clone(), ColumnKind::Categorical));
            classification.categorical.push(name);
            continue;
        }

        classification.kinds.push((name.clone(), ColumnKind::Numeric));
        classification.numeric.push(name.clone());

        match identifier_rule(series, rows, rules) {
            Some(rule) => {
                debug!("Ignoring '{}': looks like an identifier ({:?})", name, rule);
                classification.excluded.push(ExcludedColumn { name, rule });
            }
            None => classification.valid_numeric.push(name),
        }
    }

    info!(
        "Valid numeric columns: {}, categorical columns: {}, identifiers excluded: {}",
        classification.valid_numeric.len(),
        classification.categorical.len(),
        classification.excluded.len()
    );

    classification
}

/// Apply the identifier predicates in order; the first that fires wins.
pub fn identifier_rule(
    series: &Series,
    rows: usize,
    rules: &IdentifierRules,
) -> Option<IdentifierRule> {
    if has_key_header(series.name(), rules) && is_sequential_key(series) {
        return Some(IdentifierRule::SequentialKey);
    }

    let distinct = match distinct_non_null(series) {
        Ok(count) => count,
        Err(e) => {
            warn!("Could not count distinct values of '{}': {}", series.name(), e);
            return None;
        }
    };

    if is_named_identifier(series.name(), distinct, rows, rules) {
        return Some(IdentifierRule::NamedIdentifier);
    }

    None
}

/// Integer column, no missing values, every value distinct, and the values
/// cover a gap-free range (`max - min + 1 == len`).
pub fn is_sequential_key(series: &Series) -> bool {
    if series.is_empty() || series.null_count() > 0 || !is_integer_dtype(series.dtype()) {
        return false;
    }

    let Ok(casted) = series.cast(&DataType::Int64) else {
        return false;
    };
    let Ok(values) = casted.i64() else {
        return false;
    };

    let mut seen = HashSet::with_capacity(values.len());
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    for value in values.into_iter() {
        // UInt64 values beyond i64 range come back as null
        let Some(v) = value else {
            return false;
        };
        if !seen.insert(v) {
            return false;
        }
        min = min.min(v);
        max = max.max(v);
    }

    (max as i128 - min as i128 + 1) == values.len() as i128
}

/// Header names a key: it carries an identifier keyword, is a positional
/// header, or is an `Unnamed: N` header left by an exported index.
pub fn has_key_header(name: &str, rules: &IdentifierRules) -> bool {
    let lower = name.trim().to_lowercase();
    POSITIONAL_HEADERS.contains(&lower.as_str())
        || lower.starts_with("unnamed")
        || rules.keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Name contains an identifier keyword (case-insensitive) and the distinct
/// count exceeds `uniqueness_ratio * rows`.
pub fn is_named_identifier(
    name: &str,
    distinct: usize,
    rows: usize,
    rules: &IdentifierRules,
) -> bool {
    let lower = name.to_lowercase();
    let keyword_hit = rules.keywords.iter().any(|k| lower.contains(k.as_str()));
    keyword_hit && distinct as f64 > rows as f64 * rules.uniqueness_ratio
}

/// Number of distinct non-null values.
pub(crate) fn distinct_non_null(series: &Series) -> PolarsResult<usize> {
    series.drop_nulls().n_unique()
}
