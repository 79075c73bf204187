//! Data layer: typed table, CSV loading and feature construction.
//!
//! Architecture:
//! ```text
//!     avocado.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table of raw text columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ features  │  coerce types, month, indicators, intercept
//!   └──────────┘
//!        │
//!        ▼
//!   enriched Table  →  regression::Design
//! ```

pub mod features;
pub mod loader;
pub mod model;
