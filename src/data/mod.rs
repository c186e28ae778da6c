/// Data layer: loading, windowing and the statistics pipeline.
///
/// Architecture:
/// ```text
///  experiment .txt (Latin-1, tab separated, comma decimals)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  skip metadata → Dataset (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Window on the ordering column → FilteredView
///   └──────────┘
///        │
///        ├──────────────┬──────────────┬───────────────┐
///        ▼              ▼              ▼               ▼
///   ┌─────────┐   ┌───────────┐  ┌───────────┐   ┌────────────┐
///   │  stats   │   │ selection │  │ regression│   │ reference  │  (full dataset)
///   └─────────┘   └───────────┘  └───────────┘   └────────────┘
///        │              │              │               │
///        └──────────────┴──── pipeline ┴───────────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod reference;
pub mod regression;
pub mod selection;
pub mod stats;
