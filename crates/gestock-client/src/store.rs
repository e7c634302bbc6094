//! # Application Store
//!
//! Cached lists of the tenant's data plus the mutators that keep them in
//! step with the backend.
//!
//! ## Mutation Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_sale(NewSale)                                                      │
//! │      │                                                                  │
//! │      ├── quantity > 0, product cached, quantity ≤ cached stock          │
//! │      │      └── otherwise: Err(Core(..)), no request sent               │
//! │      │                                                                  │
//! │      ├── POST /ventes ──────── Err ──► error slot ← message, Err        │
//! │      │      │                                                           │
//! │      │      ▼ Ok(sale)                                                  │
//! │      ├── sales.push(sale)                                               │
//! │      │                                                                  │
//! │      └── GET /produits ─────── Err ──► error slot ← message, Err        │
//! │             │                                                           │
//! │             ▼ Ok(products)                                              │
//! │          products = fresh list (stock updated by the backend)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Local state only changes after the backend accepted the change. The lock
//! is never held while a request is in flight, and readers get clones.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use gestock_core::stats::{self, DashboardStats, DateRange, PeriodReport, StockSummary};
use gestock_core::validation::{ensure_stock, validate_price, validate_quantity};
use gestock_core::{
    CoreError, NewOrder, NewProduct, NewPurchase, NewSale, NewSupplier, Order, OrderStatus,
    OrderUpdate, Product, Purchase, Sale, Supplier,
};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Everything the store caches.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub products: Vec<Product>,
    pub purchases: Vec<Purchase>,
    pub sales: Vec<Sale>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<Order>,
    pub loading: bool,
    /// Message of the last failed backend call.
    pub error: Option<String>,
}

/// Result of a bulk product import.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Products created, in file order.
    pub created: Vec<Product>,
    /// The row that stopped the import, with the backend's message.
    pub failed: Option<ImportFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub product: String,
    pub message: String,
}

impl ImportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AppStore {
    api: ApiClient,
    state: Arc<RwLock<StoreState>>,
}

/// Removes the first element whose id is `id`. Returns whether one was found.
fn remove_by_id<T>(items: &mut Vec<T>, id: i64, id_of: impl Fn(&T) -> i64) -> bool {
    match items.iter().position(|item| id_of(item) == id) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

/// Replaces the element whose id is `id` with `item`.
fn replace_by_id<T>(items: &mut [T], id: i64, item: T, id_of: impl Fn(&T) -> i64) {
    if let Some(slot) = items.iter_mut().find(|existing| id_of(existing) == id) {
        *slot = item;
    }
}

impl AppStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Stores the message of a failed call in the error slot and passes the
    /// result through.
    async fn record<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            warn!(error = %e, "Backend call failed");
            self.state.write().await.error = Some(e.user_message());
        }
        result
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetches the five lists concurrently and replaces the cache.
    ///
    /// On failure the cache keeps its previous content.
    pub async fn load_all(&self) -> ClientResult<()> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = tokio::try_join!(
            self.api.list_products(),
            self.api.list_purchases(),
            self.api.list_sales(),
            self.api.list_suppliers(),
            self.api.list_orders(),
        );

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok((products, purchases, sales, suppliers, orders)) => {
                info!(
                    products = products.len(),
                    purchases = purchases.len(),
                    sales = sales.len(),
                    suppliers = suppliers.len(),
                    orders = orders.len(),
                    "Data loaded"
                );
                state.products = products;
                state.purchases = purchases;
                state.sales = sales;
                state.suppliers = suppliers;
                state.orders = orders;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Loading data failed");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Re-fetches the product list only.
    pub async fn refresh_products(&self) -> ClientResult<()> {
        let result = self.api.list_products().await;
        let products = self.record(result).await?;
        debug!(count = products.len(), "Products refreshed");
        self.state.write().await.products = products;
        Ok(())
    }

    /// Empties the cache (on logout).
    pub async fn clear(&self) {
        *self.state.write().await = StoreState::default();
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn add_product(&self, product: &NewProduct) -> ClientResult<Product> {
        let result = self.api.create_product(product).await;
        let created = self.record(result).await?;
        info!(product_id = created.id, nom = %created.nom, "Product created");
        self.state.write().await.products.push(created.clone());
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, product: &NewProduct) -> ClientResult<Product> {
        let result = self.api.update_product(id, product).await;
        let updated = self.record(result).await?;
        info!(product_id = id, "Product updated");
        replace_by_id(&mut self.state.write().await.products, id, updated.clone(), |p| p.id);
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        let result = self.api.delete_product(id).await;
        self.record(result).await?;
        info!(product_id = id, "Product deleted");
        remove_by_id(&mut self.state.write().await.products, id, |p| p.id);
        Ok(())
    }

    /// Creates products one after another, stopping at the first failure.
    ///
    /// Products created before the failure stay created.
    pub async fn import_products(&self, products: &[NewProduct]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for product in products {
            match self.add_product(product).await {
                Ok(created) => outcome.created.push(created),
                Err(e) => {
                    warn!(nom = %product.nom, error = %e, "Import stopped");
                    outcome.failed = Some(ImportFailure {
                        product: product.nom.clone(),
                        message: e.user_message(),
                    });
                    break;
                }
            }
        }

        info!(
            created = outcome.created.len(),
            requested = products.len(),
            "Product import finished"
        );
        outcome
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Records a purchase, then re-fetches products for the new stock.
    pub async fn add_purchase(&self, purchase: &NewPurchase) -> ClientResult<Purchase> {
        validate_quantity(purchase.quantite)?;
        validate_price("prix_unitaire", purchase.prix_unitaire)?;

        let result = self.api.create_purchase(purchase).await;
        let created = self.record(result).await?;
        info!(
            purchase_id = created.id,
            produit_id = created.produit_id,
            quantite = created.quantite,
            total = %created.prix_total,
            "Purchase recorded"
        );
        self.state.write().await.purchases.push(created.clone());

        self.refresh_products().await?;
        Ok(created)
    }

    pub async fn delete_purchase(&self, id: i64) -> ClientResult<()> {
        let result = self.api.delete_purchase(id).await;
        self.record(result).await?;
        info!(purchase_id = id, "Purchase deleted");
        remove_by_id(&mut self.state.write().await.purchases, id, |p| p.id);
        Ok(())
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale, then re-fetches products for the new stock.
    ///
    /// The quantity is checked against the cached stock first; an
    /// insufficient stock never reaches the backend.
    pub async fn add_sale(&self, sale: &NewSale) -> ClientResult<Sale> {
        validate_quantity(sale.quantite)?;
        validate_price("prix_unitaire", sale.prix_unitaire)?;
        {
            let state = self.state.read().await;
            let product = state
                .products
                .iter()
                .find(|p| p.id == sale.produit_id)
                .ok_or(CoreError::ProductNotFound(sale.produit_id))?;
            ensure_stock(product, sale.quantite)?;
        }

        let result = self.api.create_sale(sale).await;
        let created = self.record(result).await?;
        info!(
            sale_id = created.id,
            produit_id = created.produit_id,
            quantite = created.quantite,
            total = %created.prix_total,
            "Sale recorded"
        );
        self.state.write().await.sales.push(created.clone());

        self.refresh_products().await?;
        Ok(created)
    }

    pub async fn delete_sale(&self, id: i64) -> ClientResult<()> {
        let result = self.api.delete_sale(id).await;
        self.record(result).await?;
        info!(sale_id = id, "Sale deleted");
        remove_by_id(&mut self.state.write().await.sales, id, |s| s.id);
        Ok(())
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub async fn add_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier> {
        let result = self.api.create_supplier(supplier).await;
        let created = self.record(result).await?;
        info!(supplier_id = created.id, "Supplier created");
        self.state.write().await.suppliers.push(created.clone());
        Ok(created)
    }

    pub async fn update_supplier(&self, id: i64, supplier: &NewSupplier) -> ClientResult<Supplier> {
        let result = self.api.update_supplier(id, supplier).await;
        let updated = self.record(result).await?;
        info!(supplier_id = id, "Supplier updated");
        replace_by_id(&mut self.state.write().await.suppliers, id, updated.clone(), |s| s.id);
        Ok(updated)
    }

    pub async fn delete_supplier(&self, id: i64) -> ClientResult<()> {
        let result = self.api.delete_supplier(id).await;
        self.record(result).await?;
        info!(supplier_id = id, "Supplier deleted");
        remove_by_id(&mut self.state.write().await.suppliers, id, |s| s.id);
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn add_order(&self, order: &NewOrder) -> ClientResult<Order> {
        validate_quantity(order.quantite)?;

        let result = self.api.create_order(order).await;
        let created = self.record(result).await?;
        info!(order_id = created.id, statut = %created.statut, "Order created");
        self.state.write().await.orders.push(created.clone());
        Ok(created)
    }

    pub async fn update_order(&self, id: i64, update: &OrderUpdate) -> ClientResult<Order> {
        if let Some(qty) = update.quantite {
            validate_quantity(qty)?;
        }

        let result = self.api.update_order(id, update).await;
        let updated = self.record(result).await?;
        info!(order_id = id, statut = %updated.statut, "Order updated");
        replace_by_id(&mut self.state.write().await.orders, id, updated.clone(), |o| o.id);
        Ok(updated)
    }

    pub async fn set_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        self.update_order(id, &OrderUpdate::status(status)).await
    }

    pub async fn delete_order(&self, id: i64) -> ClientResult<()> {
        let result = self.api.delete_order(id).await;
        self.record(result).await?;
        info!(order_id = id, "Order deleted");
        remove_by_id(&mut self.state.write().await.orders, id, |o| o.id);
        Ok(())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn purchases(&self) -> Vec<Purchase> {
        self.state.read().await.purchases.clone()
    }

    pub async fn sales(&self) -> Vec<Sale> {
        self.state.read().await.sales.clone()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.state.read().await.suppliers.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn product(&self, id: i64) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    // =========================================================================
    // Derived Figures
    // =========================================================================

    /// Dashboard figures for the month containing `now`.
    pub async fn statistics(&self, now: DateTime<Utc>) -> DashboardStats {
        let state = self.state.read().await;
        stats::dashboard_stats(&state.products, &state.sales, &state.purchases, now)
    }

    pub async fn low_stock(&self) -> Vec<Product> {
        let state = self.state.read().await;
        stats::low_stock(&state.products).into_iter().cloned().collect()
    }

    pub async fn stock_summary(&self) -> StockSummary {
        stats::stock_summary(&self.state.read().await.products)
    }

    pub async fn report(&self, range: DateRange) -> PeriodReport {
        let state = self.state.read().await;
        stats::period_report(&state.sales, &state.purchases, &state.products, range)
    }
}
