//! # gestock-core: Pure Business Logic for Gestock
//!
//! Domain model and business rules for the Gestock stock-management
//! dashboard. Everything here is a pure function over in-memory data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gestock Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/console (or any front-end)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    gestock-client                               │   │
//! │  │   ApiClient ─► AppStore / AuthStore ─► SessionStorage           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gestock-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌───────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │ validation │ │ stats │ │ search │  │   │
//! │  │   └─────────┘ └─────────┘ └────────────┘ └───────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities mirrored from the backend (Product, Sale, ...)
//! - [`money`] - FCFA amounts with integer arithmetic
//! - [`casing`] - snake_case → camelCase key conversion for JSON
//! - [`validation`] - Sale checks and product import validation
//! - [`stats`] - Monthly, period and stock aggregation
//! - [`search`] - Product/sale filtering and barcode lookup
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gestock_core::money::Money;
//!
//! let unit = Money::from_units(5200);
//! let total = unit.multiply_quantity(10);
//! assert_eq!(total, Money::from_units(52_000));
//! assert_eq!(total.format_price(), "52 000 FCFA");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod casing;
pub mod error;
pub mod money;
pub mod search;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Alert threshold applied when a product has none.
///
/// Matches the default the product form pre-fills.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 10;

/// Number of months shown in the sales/purchases trend.
pub const TREND_MONTHS: usize = 12;

/// Number of entries kept in the best-selling products ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Label used for products without a category.
pub const UNCATEGORIZED_LABEL: &str = "Sans catégorie";
