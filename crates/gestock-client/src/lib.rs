//! # gestock-client: REST Client and State Stores for Gestock
//!
//! Connects the pure rules of `gestock-core` to the backend REST API and
//! keeps the session and the cached lists the dashboard works from.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         gestock-client                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  AuthStore     │  │  AppStore      │  │  TenantAdmin/UserAdmin │    │
//! │  │                │  │                │  │                        │    │
//! │  │ login/logout   │  │ products,      │  │ tenant lifecycle,      │    │
//! │  │ session restore│  │ purchases,     │  │ subscriptions,         │    │
//! │  │ role checks    │  │ sales, orders  │  │ platform dashboard     │    │
//! │  └───────┬────────┘  └───────┬────────┘  └───────────┬────────────┘    │
//! │          │                   │                       │                  │
//! │          │           ┌───────▼───────────────────────▼──────┐          │
//! │          │           │              ApiClient                │          │
//! │          │           │  bearer token • JSON • error mapping  │          │
//! │          │           └───────────────────┬───────────────────┘          │
//! │          │                               │                              │
//! │  ┌───────▼───────────────────────────────▼──────┐  ┌────────────────┐  │
//! │  │              SessionStorage                  │  │  ClientConfig  │  │
//! │  │  "token" • "user" • "entreprise_info"        │  │  gestock.toml  │  │
//! │  └──────────────────────────────────────────────┘  └────────────────┘  │
//! │                                                                         │
//! │  import: CSV/Excel product files → rows → AppStore::import_products     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`api`] - HTTP client and resource endpoints
//! - [`auth`] - Session and role checks
//! - [`store`] - Cached lists, mutators and derived figures
//! - [`admin`] - Super-admin tenant management and user management
//! - [`import`] - CSV and Excel product import, CSV template
//! - [`storage`] - Persisted key-value session storage
//! - [`config`] - Client configuration
//! - [`error`] - Client error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gestock_client::{ApiClient, AppStore, AuthStore, ClientConfig, SessionStorage};
//!
//! let config = ClientConfig::load_or_default(None);
//! let storage = SessionStorage::from_config(&config)?;
//!
//! let auth = AuthStore::new(&config, storage.clone())?;
//! if !auth.restore().await {
//!     auth.login("gerant@boutique.sn", "secret").await?;
//! }
//!
//! let store = AppStore::new(ApiClient::new(&config, storage)?);
//! store.load_all().await?;
//! println!("{} produits", store.products().await.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod import;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use admin::{TenantAdmin, UserAdmin};
pub use api::ApiClient;
pub use auth::{AuthStore, Session};
pub use config::{ApiSettings, ClientConfig, StorageSettings};
pub use error::{ClientError, ClientResult};
pub use import::{import_file, parse_products_csv, parse_products_workbook, product_template_csv};
pub use storage::SessionStorage;
pub use store::{AppStore, ImportFailure, ImportOutcome, StoreState};
