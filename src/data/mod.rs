//! Data layer: core types and loading.
//!
//! Architecture:
//! ```text
//!  .xlsx (first sheet, header row)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse cells → keep fully numeric columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<NumericColumn>, row count
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
