use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Penguin / tips schema
// ---------------------------------------------------------------------------

/// Categorical column the species filter works on.
pub const SPECIES_COLUMN: &str = "species";

/// Numeric measurement columns offered by the attribute picker.
pub const MEASUREMENT_ATTRIBUTES: [&str; 4] = [
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
];

/// Species labels exposed to the checkbox group, in display order.
pub const KNOWN_SPECIES: [&str; 3] = ["Adelie", "Gentoo", "Chinstrap"];

pub const TIP_COLUMN: &str = "tip";
pub const TOTAL_BILL_COLUMN: &str = "total_bill";

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common data-frame dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
                Date(_) => 4,
            }
        }
        let ra = rank(self);
        let rb = rank(other);
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns (e.g. "2" and "2.5") sort by magnitude.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "NA"),
        }
    }
}

impl Value {
    /// Numeric view of the cell; `None` for text and missing values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Label view of the cell; only string cells are categorical labels.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// DataTable – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// An immutable table of rows with pre-computed column indices.
///
/// Rows are stored positionally: `rows[r][c]` is the cell of column
/// `columns[c]`. Short rows are padded with [`Value::Null`] on construction.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Human-readable name used in error messages and the status bar.
    pub name: String,
    /// Column names in file order.
    pub columns: Vec<String>,
    /// All rows, in load order.
    pub rows: Vec<Vec<Value>>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl DataTable {
    /// Build a table and its column indices from loaded rows.
    pub fn new(name: impl Into<String>, columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = columns
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for row in &mut rows {
            row.resize(width, Value::Null);
            for (col, val) in columns.iter().zip(row.iter()) {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(val.clone());
                }
            }
        }

        DataTable {
            name: name.into(),
            columns,
            rows,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or a configuration error if the schema lacks it.
    pub fn column_index(&self, column: &str) -> Result<usize, DashboardError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| DashboardError::MissingColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Fail on the first column of `required` the table does not have.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), DashboardError> {
        for column in required {
            self.column_index(column)?;
        }
        Ok(())
    }

    /// Check that every non-null value of `column` is one of `declared`.
    pub fn validate_labels(&self, column: &str, declared: &[String]) -> Result<(), DashboardError> {
        self.column_index(column)?;
        let Some(values) = self.unique_values.get(column) else {
            return Ok(());
        };
        for value in values.iter().filter(|v| !v.is_null()) {
            let label = value.to_string();
            if !declared.iter().any(|d| *d == label) {
                return Err(DashboardError::UndeclaredLabel {
                    dataset: self.name.clone(),
                    column: column.to_string(),
                    label,
                });
            }
        }
        Ok(())
    }

    /// Cell at `(row, col)`; out-of-range positions read as missing.
    pub fn cell(&self, row: usize, col: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }

    /// All non-null numeric values of a column, in row order.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<f64>, DashboardError> {
        let col = self.column_index(column)?;
        Ok(self.rows.iter().filter_map(|r| r[col].as_f64()).collect())
    }

    /// Stable sort of a row-index sequence by one column.
    pub fn sorted_indices(
        &self,
        indices: &[usize],
        column: &str,
        order: SortOrder,
    ) -> Result<Vec<usize>, DashboardError> {
        let col = self.column_index(column)?;
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            let ord = self.cell(a, col).cmp(self.cell(b, col));
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        Ok(sorted)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn penguin(species: &str, body_mass_g: i64) -> Vec<Value> {
        vec![
            Value::String(species.to_string()),
            Value::Integer(body_mass_g),
        ]
    }

    /// The three-row table used throughout the filter tests.
    pub(crate) fn three_penguins() -> DataTable {
        DataTable::new(
            "penguins",
            vec!["species".to_string(), "body_mass_g".to_string()],
            vec![
                penguin("Adelie", 3750),
                penguin("Gentoo", 5000),
                penguin("Chinstrap", 3500),
            ],
        )
    }

    fn declared() -> Vec<String> {
        KNOWN_SPECIES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_column_is_a_configuration_error() {
        let table = three_penguins();
        let err = table.require_columns(&["species", "flipper_length_mm"]).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingColumn {
                dataset: "penguins".into(),
                column: "flipper_length_mm".into(),
            }
        );
    }

    #[test]
    fn undeclared_species_is_rejected() {
        let table = DataTable::new(
            "penguins",
            vec!["species".to_string()],
            vec![vec![Value::String("Emperor".into())]],
        );
        let err = table.validate_labels("species", &declared()).unwrap_err();
        assert!(matches!(err, DashboardError::UndeclaredLabel { label, .. } if label == "Emperor"));
    }

    #[test]
    fn null_species_passes_label_validation() {
        let table = DataTable::new(
            "penguins",
            vec!["species".to_string()],
            vec![vec![Value::String("Adelie".into())], vec![Value::Null]],
        );
        assert!(table.validate_labels("species", &declared()).is_ok());
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let table = DataTable::new(
            "t",
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Integer(1)]],
        );
        assert_eq!(table.cell(0, 1), &Value::Null);
        assert_eq!(table.cell(5, 0), &Value::Null);
    }

    #[test]
    fn numeric_column_skips_missing_cells() {
        let table = DataTable::new(
            "t",
            vec!["x".to_string()],
            vec![
                vec![Value::Integer(2)],
                vec![Value::Null],
                vec![Value::Float(2.5)],
            ],
        );
        assert_eq!(table.numeric_column("x").unwrap(), vec![2.0, 2.5]);
    }

    #[test]
    fn sorted_indices_orders_by_column_and_is_stable() {
        let table = DataTable::new(
            "t",
            vec!["k".to_string(), "v".to_string()],
            vec![
                vec![Value::Integer(2), Value::String("a".into())],
                vec![Value::Integer(1), Value::String("b".into())],
                vec![Value::Integer(2), Value::String("c".into())],
            ],
        );
        let asc = table.sorted_indices(&[0, 1, 2], "k", SortOrder::Ascending).unwrap();
        assert_eq!(asc, vec![1, 0, 2]);
        let desc = table.sorted_indices(&[0, 1, 2], "k", SortOrder::Descending).unwrap();
        assert_eq!(desc, vec![0, 2, 1]);
    }

    #[test]
    fn mixed_numeric_values_sort_by_magnitude() {
        assert!(Value::Integer(2) < Value::Float(2.5));
        assert!(Value::Float(1.5) < Value::Integer(2));
        assert!(Value::Null < Value::Integer(0));
    }
}
