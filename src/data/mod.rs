/// Data layer: core types, loading, aggregation, and filtering.
///
/// Architecture:
/// ```text
///  data/ds_salaries.csv (or ./ds_salaries.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV once → SalaryTable (memoized)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SalaryTable  │  Vec<SalaryRecord>, unique-value index
///   └─────────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │  stats    │      │  filter   │  range / membership predicates
///   └──────────┘      └──────────┘
///     aggregates          derived tables
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
