//! Data layer: core table types and loading.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (per-column type inference)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  ordered columns, rows of Value
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;

pub use loader::load_file;
pub use model::{Dataset, DatasetError, Value};
