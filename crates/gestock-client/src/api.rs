//! # API Client
//!
//! Typed access to the Gestock REST backend.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller                                                                 │
//! │    │  api.create_sale(&NewSale { .. })                                  │
//! │    ▼                                                                    │
//! │  request()                                                              │
//! │    ├── read `token` from SessionStorage (every call, warn if absent)    │
//! │    ├── Content-Type: application/json                                   │
//! │    ├── Authorization: Bearer <token>                                    │
//! │    ├── send, read body (empty body = null)                              │
//! │    │                                                                    │
//! │    ├── non-2xx ──► ClientError::Api { status, body.message             │
//! │    │                                   or "Une erreur est survenue" }   │
//! │    │              (401 logged with whether a token was sent)            │
//! │    │                                                                    │
//! │    └── 2xx ──► snake_case → camelCase ──► deserialize T                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no retry, backoff or timeout policy: a failed call fails once
//! and the caller decides.

use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

use gestock_core::casing::to_camel_case_keys;
use gestock_core::stats::DateRange;
use gestock_core::{
    Client, NewClient, NewOrder, NewProduct, NewPurchase, NewSale, NewSupplier, NewUser, Order,
    OrderStatus, OrderUpdate, Product, Purchase, Sale, Supplier, User, UserUpdate,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, GENERIC_ERROR_MESSAGE};
use crate::storage::{SessionStorage, TOKEN_KEY};

/// HTTP client for the backend REST resources.
///
/// Cheap to clone: clones share the connection pool and the storage.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: SessionStorage,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, storage: SessionStorage) -> ClientResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url().to_string(),
            storage,
        })
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Generic Request
    // =========================================================================

    /// Sends one request and returns the camelCased JSON body.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let mut url = self.endpoint_url(endpoint)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let token = self.storage.get_item(TOKEN_KEY);
        let has_token = token.is_some();
        if !has_token {
            warn!(endpoint, "No token found in storage for request");
        }

        let started = Instant::now();
        debug!(%method, %url, has_token, "API request");

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            %method,
            endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response"
        );

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                error!(endpoint, has_token, "401 from backend: token missing or invalid");
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(to_camel_case_keys(data))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let value = self.request(Method::GET, endpoint, &[], None).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let value = self.request(Method::GET, endpoint, query, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::POST, endpoint, body).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::PUT, endpoint, body).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::PATCH, endpoint, body).await
    }

    /// Sends a DELETE; the response body is ignored.
    pub async fn delete(&self, endpoint: &str) -> ClientResult<()> {
        self.request(Method::DELETE, endpoint, &[], None).await?;
        Ok(())
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.request(method, endpoint, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn endpoint_url(&self, endpoint: &str) -> ClientResult<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, endpoint))?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/produits").await
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<Product> {
        self.get(&format!("/produits/{}", id)).await
    }

    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<Product> {
        self.post("/produits", product).await
    }

    pub async fn update_product(&self, id: i64, product: &NewProduct) -> ClientResult<Product> {
        self.put(&format!("/produits/{}", id), product).await
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/produits/{}", id)).await
    }

    /// Products the backend reports at or under their alert threshold.
    pub async fn low_stock_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/produits/stock-faible").await
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub async fn list_suppliers(&self) -> ClientResult<Vec<Supplier>> {
        self.get("/fournisseurs").await
    }

    pub async fn get_supplier(&self, id: i64) -> ClientResult<Supplier> {
        self.get(&format!("/fournisseurs/{}", id)).await
    }

    pub async fn create_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier> {
        self.post("/fournisseurs", supplier).await
    }

    pub async fn update_supplier(&self, id: i64, supplier: &NewSupplier) -> ClientResult<Supplier> {
        self.put(&format!("/fournisseurs/{}", id), supplier).await
    }

    pub async fn delete_supplier(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/fournisseurs/{}", id)).await
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    pub async fn list_purchases(&self) -> ClientResult<Vec<Purchase>> {
        self.get("/achats").await
    }

    pub async fn get_purchase(&self, id: i64) -> ClientResult<Purchase> {
        self.get(&format!("/achats/{}", id)).await
    }

    pub async fn create_purchase(&self, purchase: &NewPurchase) -> ClientResult<Purchase> {
        self.post("/achats", purchase).await
    }

    pub async fn delete_purchase(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/achats/{}", id)).await
    }

    pub async fn purchases_between(&self, range: &DateRange) -> ClientResult<Vec<Purchase>> {
        self.get_with_query("/achats/date-range", &date_range_query(range)).await
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
        self.get("/ventes").await
    }

    pub async fn get_sale(&self, id: i64) -> ClientResult<Sale> {
        self.get(&format!("/ventes/{}", id)).await
    }

    pub async fn create_sale(&self, sale: &NewSale) -> ClientResult<Sale> {
        self.post("/ventes", sale).await
    }

    pub async fn delete_sale(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/ventes/{}", id)).await
    }

    pub async fn sales_between(&self, range: &DateRange) -> ClientResult<Vec<Sale>> {
        self.get_with_query("/ventes/date-range", &date_range_query(range)).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/commandes").await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        self.get(&format!("/commandes/{}", id)).await
    }

    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<Order> {
        self.post("/commandes", order).await
    }

    pub async fn update_order(&self, id: i64, update: &OrderUpdate) -> ClientResult<Order> {
        self.put(&format!("/commandes/{}", id), update).await
    }

    pub async fn delete_order(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/commandes/{}", id)).await
    }

    pub async fn orders_by_status(&self, status: OrderStatus) -> ClientResult<Vec<Order>> {
        // Url::parse percent-encodes the space and accents
        self.get(&format!("/commandes/statut/{}", status.as_str())).await
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Server-side statistics, passed through as JSON.
    pub async fn statistics(&self) -> ClientResult<Value> {
        self.get("/statistiques").await
    }

    pub async fn profit_statistics(&self) -> ClientResult<Value> {
        self.get("/statistiques/benefices").await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get("/users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> ClientResult<User> {
        self.post("/users", user).await
    }

    pub async fn update_user(&self, id: i64, user: &UserUpdate) -> ClientResult<User> {
        self.put(&format!("/users/{}", id), user).await
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/users/{}", id)).await
    }

    // =========================================================================
    // Tenants
    // =========================================================================

    pub async fn list_clients(&self) -> ClientResult<Vec<Client>> {
        self.get("/clients").await
    }

    pub async fn create_client(&self, client: &NewClient) -> ClientResult<Client> {
        self.post("/clients", client).await
    }

    pub async fn update_client(&self, id: i64, client: &NewClient) -> ClientResult<Client> {
        self.put(&format!("/clients/{}", id), client).await
    }

    pub async fn delete_client(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/clients/{}", id)).await
    }
}

fn date_range_query(range: &DateRange) -> [(&'static str, String); 2] {
    [
        ("dateDebut", format_date(range.start)),
        ("dateFin", format_date(range.end)),
    ]
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The `message` field of an error body, or the generic fallback.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
