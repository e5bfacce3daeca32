/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<SalesRecord>, country / store-type / date indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered view (borrowed rows)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + grouped summaries → Dashboard
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
