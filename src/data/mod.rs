/// Data layer: core types, loading, selection and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → DataTable, check schema + labels
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐        ┌───────────┐
///   │  DataTable    │◄───────│ selection │  SelectionChanged events
///   └──────────────┘        └───────────┘
///        │                        │
///        ▼                        ▼
///   ┌──────────┐
///   │  filter   │  selected labels → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ViewConsumer (table rows, chart series) → stats → ui
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod selection;
pub mod stats;
