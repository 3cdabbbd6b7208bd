/// Data layer: core types, loading, filtering and chart views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → drop incomplete rows
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StudentDataset  │  Vec<Record>, filter options
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  conjunctive row predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  scatter series, box summaries, group means
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
