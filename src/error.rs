use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Wiring problems detected when datasets, selection and config are put
/// together. All of them are fatal at startup; at runtime (File → Open…)
/// they are reported in the status bar and the previous dataset is kept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn { dataset: String, column: String },

    #[error("column '{column}' of dataset '{dataset}' contains undeclared label '{label}'")]
    UndeclaredLabel {
        dataset: String,
        column: String,
        label: String,
    },

    #[error("'{label}' is not one of the declared labels")]
    UnknownLabel { label: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
