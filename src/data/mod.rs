/// Data layer: trip records, loading, and filtering.
///
/// Architecture:
/// ```text
///  chicago.csv / *.parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TripTable (derive month / day / hour)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  TripTable    │  TripSchema (optional columns), Vec<Trip>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep trips matching month / day, order preserved
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
