//! Most frequent value of each categorical column.

use crate::loader::classification::distinct_non_null;
use crate::table::Table;
use crate::utils::text_options;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Mode of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMode {
    pub column: String,
    /// The most frequent value rendered as text.
    pub value: String,
    pub frequency: usize,
}

/// Modes in input column order. High-cardinality columns are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeReport {
    pub entries: Vec<ColumnMode>,
}

impl ModeReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.column.as_str())
    }
}

/// Categorical columns with at most `limit` distinct non-null values.
pub(crate) fn low_cardinality_columns(
    table: &Table,
    categorical: &[String],
    limit: usize,
) -> Vec<String> {
    categorical
        .iter()
        .filter(|name| match cardinality(table, name) {
            Some(distinct) => distinct <= limit,
            None => false,
        })
        .cloned()
        .collect()
}

fn cardinality(table: &Table, name: &str) -> Option<usize> {
    let series = match table.series(name) {
        Ok(series) => series,
        Err(e) => {
            warn!("Skipping categorical column: {}", e);
            return None;
        }
    };
    match distinct_non_null(series) {
        Ok(distinct) => Some(distinct),
        Err(e) => {
            warn!("Could not count distinct values of '{}': {}", name, e);
            None
        }
    }
}

pub(crate) fn categorical_modes(table: &Table, categorical: &[String], limit: usize) -> ModeReport {
    let mut entries = Vec::new();

    for name in categorical {
        let Some(distinct) = cardinality(table, name) else {
            continue;
        };
        if distinct > limit {
            debug!(
                "Skipping mode for '{}': {} distinct values (limit {})",
                name, distinct, limit
            );
            continue;
        }

        let values = match table.series(name).and_then(|s| Ok(text_options(s)?)) {
            Ok(values) => values,
            Err(e) => {
                warn!("Skipping mode for '{}': {}", name, e);
                continue;
            }
        };

        if let Some((value, frequency)) = most_frequent(values.into_iter().flatten()) {
            entries.push(ColumnMode {
                column: name.clone(),
                value,
                frequency,
            });
        }
    }

    ModeReport { entries }
}

/// Most frequent item; among equally frequent items the first seen wins.
fn most_frequent(values: impl Iterator<Item = String>) -> Option<(String, usize)> {
    // value -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .min_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        })
        .map(|(value, (count, _))| (value, count))
}
