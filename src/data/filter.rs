use std::collections::BTreeSet;

use super::model::{DataTable, Value};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Category filter: rows whose label is in the selected set
// ---------------------------------------------------------------------------

/// Return indices of rows whose `column` value is one of `selection`.
///
/// * Row order is preserved.
/// * An empty selection matches nothing.
/// * Labels that never occur in the table match nothing.
/// * Missing (`NA`) cells never match.
pub fn filter_rows(
    table: &DataTable,
    column: &str,
    selection: &BTreeSet<String>,
) -> Result<Vec<usize>, DashboardError> {
    Ok(FilteredView::full(table).refine(column, selection)?.indices)
}

fn matching(
    table: &DataTable,
    col: usize,
    candidates: impl IntoIterator<Item = usize>,
    selection: &BTreeSet<String>,
) -> Vec<usize> {
    if selection.is_empty() {
        return Vec::new();
    }
    candidates
        .into_iter()
        .filter(|&i| {
            table
                .cell(i, col)
                .as_str()
                .is_some_and(|label| selection.contains(label))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – a borrowed, ordered subset of a table
// ---------------------------------------------------------------------------

/// An ordered subsequence of a table's rows.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a DataTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view: every row in load order.
    pub fn full(table: &'a DataTable) -> Self {
        Self {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn table(&self) -> &'a DataTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Rows of the view, in order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Value]> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| table.rows[i].as_slice())
    }

    /// Filter this view again. Refining by the selection that produced the
    /// view returns the same rows.
    pub fn refine(
        &self,
        column: &str,
        selection: &BTreeSet<String>,
    ) -> Result<FilteredView<'a>, DashboardError> {
        let col = self.table.column_index(column)?;
        Ok(FilteredView {
            table: self.table,
            indices: matching(self.table, col, self.indices.iter().copied(), selection),
        })
    }

    /// Numeric values of `value` split by the `category` label, one series
    /// per entry of `labels` (in that order, possibly empty).
    pub fn grouped_values(
        &self,
        category: &str,
        value: &str,
        labels: &[String],
    ) -> Result<Vec<(String, Vec<f64>)>, DashboardError> {
        let cat = self.table.column_index(category)?;
        let val = self.table.column_index(value)?;
        let mut groups: Vec<(String, Vec<f64>)> =
            labels.iter().map(|l| (l.clone(), Vec::new())).collect();

        for row in self.rows() {
            let Some(label) = row.get(cat).and_then(Value::as_str) else {
                continue;
            };
            let Some(v) = row.get(val).and_then(Value::as_f64) else {
                continue;
            };
            if let Some((_, series)) = groups.iter_mut().find(|(l, _)| l == label) {
                series.push(v);
            }
        }
        Ok(groups)
    }

    /// `[x, y]` points split by the `category` label. Rows missing either
    /// coordinate are skipped.
    pub fn grouped_pairs(
        &self,
        category: &str,
        x: &str,
        y: &str,
        labels: &[String],
    ) -> Result<Vec<(String, Vec<[f64; 2]>)>, DashboardError> {
        let cat = self.table.column_index(category)?;
        let xc = self.table.column_index(x)?;
        let yc = self.table.column_index(y)?;
        let mut groups: Vec<(String, Vec<[f64; 2]>)> =
            labels.iter().map(|l| (l.clone(), Vec::new())).collect();

        for row in self.rows() {
            let Some(label) = row.get(cat).and_then(Value::as_str) else {
                continue;
            };
            let (Some(xv), Some(yv)) = (
                row.get(xc).and_then(Value::as_f64),
                row.get(yc).and_then(Value::as_f64),
            ) else {
                continue;
            };
            if let Some((_, points)) = groups.iter_mut().find(|(l, _)| l == label) {
                points.push([xv, yv]);
            }
        }
        Ok(groups)
    }
}

// ---------------------------------------------------------------------------
// SpeciesFilter – filter bound to a column, with a last-result cache
// ---------------------------------------------------------------------------

/// The category filter bound to one column. Remembers the last selection it
/// was asked for: an unchanged selection reuses the result, and a narrower
/// one only rescans the rows that matched before.
#[derive(Debug, Clone)]
pub struct SpeciesFilter {
    column: String,
    cache: Option<(BTreeSet<String>, Vec<usize>)>,
}

impl SpeciesFilter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            cache: None,
        }
    }

    /// Compute (or reuse) the filtered view for `selection`.
    pub fn apply<'a>(
        &mut self,
        table: &'a DataTable,
        selection: &BTreeSet<String>,
    ) -> Result<FilteredView<'a>, DashboardError> {
        let view = match &self.cache {
            Some((cached_sel, indices)) if cached_sel == selection => {
                return Ok(FilteredView {
                    table,
                    indices: indices.clone(),
                });
            }
            Some((cached_sel, indices)) if selection.is_subset(cached_sel) => FilteredView {
                table,
                indices: indices.clone(),
            }
            .refine(&self.column, selection)?,
            _ => FilteredView {
                table,
                indices: filter_rows(table, &self.column, selection)?,
            },
        };
        self.cache = Some((selection.clone(), view.indices.clone()));
        Ok(view)
    }

    /// Drop the cached result; required whenever the table is replaced.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}
