//! # Domain Types
//!
//! Entities exchanged with the Gestock backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Purchase     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  nom, categorie │◄──│  produit_id     │   │  produit_id ───►│       │
//! │  │  prix_achat     │   │  fournisseur_id │   │  client_nom     │       │
//! │  │  prix_vente     │   │  prix_total     │   │  prix_total     │       │
//! │  │  stock, seuil   │   │  date_achat     │   │  date_vente     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │     Order       │   │  Client / User  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  nom, contact   │   │  OrderStatus    │   │  tenant, Role   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Conventions
//! - Responses reach these types after [`crate::casing`] rewrote every key to
//!   camelCase, so response structs use `rename_all = "camelCase"`.
//! - Request payloads (`New*`, `*Update`) keep the backend's snake_case
//!   French field names.
//! - Ids are the backend's integer primary keys.
//! - `User` and `CompanyProfile` are persisted locally with snake_case keys;
//!   `User` also accepts the camelCase form returned by `/users`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_ALERT_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub nom: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub categorie: Option<String>,

    /// Unit purchase price.
    #[serde(default)]
    pub prix_achat: Money,

    /// Unit sale price.
    #[serde(default)]
    pub prix_vente: Money,

    /// Units on hand. Maintained by the backend on every purchase and sale.
    #[serde(default)]
    pub stock: i64,

    /// Alert threshold; `None` means [`DEFAULT_ALERT_THRESHOLD`].
    #[serde(default)]
    pub seuil_alerte: Option<i64>,

    #[serde(default)]
    pub code_barre: Option<String>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Effective alert threshold.
    #[inline]
    pub fn alert_threshold(&self) -> i64 {
        self.seuil_alerte.unwrap_or(DEFAULT_ALERT_THRESHOLD)
    }

    /// True when stock is at or below the alert threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.alert_threshold()
    }

    /// Unit margin (sale price minus purchase price).
    #[inline]
    pub fn margin(&self) -> Money {
        self.prix_vente - self.prix_achat
    }

    /// Value of the stock on hand at purchase price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.prix_achat.multiply_quantity(self.stock)
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Category label, or `None` for a blank category.
    pub fn category(&self) -> Option<&str> {
        self.categorie
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Payload for `POST /produits` and `PUT /produits/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub nom: String,
    pub description: String,
    pub prix_achat: Money,
    pub prix_vente: Money,
    pub stock: i64,
    pub seuil_alerte: i64,
    pub categorie: String,
    pub code_barre: String,
}

impl NewProduct {
    /// Builds an update payload from a cached product.
    pub fn from_product(product: &Product) -> Self {
        NewProduct {
            nom: product.nom.clone(),
            description: product.description.clone().unwrap_or_default(),
            prix_achat: product.prix_achat,
            prix_vente: product.prix_vente,
            stock: product.stock,
            seuil_alerte: product.alert_threshold(),
            categorie: product.categorie.clone().unwrap_or_default(),
            code_barre: product.code_barre.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A stock purchase from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Purchase {
    pub id: i64,
    pub produit_id: i64,

    #[serde(default)]
    pub fournisseur_id: Option<i64>,

    pub quantite: i64,

    #[serde(default)]
    pub prix_unitaire: Money,

    /// Computed by the backend as `quantite × prix_unitaire`.
    #[serde(default)]
    pub prix_total: Money,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[ts(as = "Option<String>")]
    pub date_achat: Option<DateTime<Utc>>,

    #[serde(default)]
    pub produit_nom: Option<String>,

    #[serde(default)]
    pub fournisseur_nom: Option<String>,
}

impl Purchase {
    #[inline]
    pub fn expected_total(&self) -> Money {
        self.prix_unitaire.multiply_quantity(self.quantite)
    }
}

/// Payload for `POST /achats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPurchase {
    pub produit_id: i64,
    pub fournisseur_id: i64,
    pub quantite: i64,
    pub prix_unitaire: Money,
}

impl NewPurchase {
    #[inline]
    pub fn total(&self) -> Money {
        self.prix_unitaire.multiply_quantity(self.quantite)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale to a (possibly anonymous) customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub produit_id: i64,
    pub quantite: i64,

    #[serde(default)]
    pub prix_unitaire: Money,

    #[serde(default)]
    pub prix_total: Money,

    #[serde(default)]
    pub client_nom: Option<String>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[ts(as = "Option<String>")]
    pub date_vente: Option<DateTime<Utc>>,

    #[serde(default)]
    pub produit_nom: Option<String>,
}

impl Sale {
    #[inline]
    pub fn expected_total(&self) -> Money {
        self.prix_unitaire.multiply_quantity(self.quantite)
    }
}

/// Payload for `POST /ventes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub produit_id: i64,
    pub quantite: i64,
    pub prix_unitaire: Money,
    /// Empty for walk-in customers.
    pub client_nom: String,
}

impl NewSale {
    #[inline]
    pub fn total(&self) -> Money {
        self.prix_unitaire.multiply_quantity(self.quantite)
    }
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub adresse: Option<String>,
}

/// Payload for `POST /fournisseurs` and `PUT /fournisseurs/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub nom: String,
    pub email: String,
    pub telephone: String,
    pub adresse: String,
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of a supplier order.
///
/// ```text
/// EnAttente ──► EnCours ──► Livree
///     │            │
///     └────────────┴──────► Annulee
/// ```
/// The backend does not enforce transitions; any status may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "En cours")]
    InProgress,
    #[serde(rename = "Livrée")]
    Delivered,
    #[serde(rename = "Annulée")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Wire value, also used as the display label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "En attente",
            OrderStatus::InProgress => "En cours",
            OrderStatus::Delivered => "Livrée",
            OrderStatus::Cancelled => "Annulée",
        }
    }

    /// Parses a wire value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub produit_id: i64,
    pub fournisseur_id: i64,
    pub quantite: i64,

    #[serde(default)]
    pub statut: OrderStatus,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[ts(as = "Option<String>")]
    pub date_commande: Option<DateTime<Utc>>,

    #[serde(default)]
    pub produit_nom: Option<String>,

    #[serde(default)]
    pub fournisseur_nom: Option<String>,
}

/// Payload for `POST /commandes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub produit_id: i64,
    pub fournisseur_id: i64,
    pub quantite: i64,
    pub statut: OrderStatus,
}

/// Payload for `PUT /commandes/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produit_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fournisseur_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantite: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<OrderStatus>,
}

impl OrderUpdate {
    /// Update that only changes the status.
    pub fn status(statut: OrderStatus) -> Self {
        OrderUpdate {
            statut: Some(statut),
            ..Default::default()
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// User role. Permission checks are static set membership.
///
/// ```text
/// ┌──────────────┬─────────┬───────┬────────┬──────┬─────┐
/// │ Role         │ super   │ admin │ manage │ sell │ buy │
/// ├──────────────┼─────────┼───────┼────────┼──────┼─────┤
/// │ super_admin  │   ✓     │   ✓   │   ✓    │  ✓   │  ✓  │
/// │ admin        │         │   ✓   │   ✓    │  ✓   │  ✓  │
/// │ gestionnaire │         │       │   ✓    │  ✓   │  ✓  │
/// │ vendeur      │         │       │        │  ✓   │     │
/// │ acheteur     │         │       │        │      │  ✓  │
/// └──────────────┴─────────┴───────┴────────┴──────┴─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    SuperAdmin,
    Admin,
    Gestionnaire,
    Vendeur,
    Acheteur,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Gestionnaire => "gestionnaire",
            Role::Vendeur => "vendeur",
            Role::Acheteur => "acheteur",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            Role::SuperAdmin,
            Role::Admin,
            Role::Gestionnaire,
            Role::Vendeur,
            Role::Acheteur,
        ]
        .into_iter()
        .find(|r| r.as_str() == value)
    }

    #[inline]
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    #[inline]
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Gestionnaire)
    }

    #[inline]
    pub fn can_sell(&self) -> bool {
        self.can_manage() || matches!(self, Role::Vendeur)
    }

    #[inline]
    pub fn can_buy(&self) -> bool {
        self.can_manage() || matches!(self, Role::Acheteur)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// An authenticated user, as returned by login and `/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub prenom: Option<String>,
    pub email: String,
    pub role: Role,

    /// Tenant; `None` for the platform super admin.
    #[serde(default, alias = "clientId")]
    pub client_id: Option<i64>,

    #[serde(default = "default_true")]
    pub actif: bool,
}

impl User {
    /// "Prénom Nom", or just the name when no first name is set.
    pub fn display_name(&self) -> String {
        match self.prenom.as_deref().map(str::trim) {
            Some(prenom) if !prenom.is_empty() => format!("{} {}", prenom, self.nom),
            _ => self.nom.clone(),
        }
    }
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    pub actif: bool,
}

/// Payload for `PUT /users/{id}`. Never carries a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserUpdate {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    pub actif: bool,
}

impl From<NewUser> for UserUpdate {
    fn from(user: NewUser) -> Self {
        UserUpdate {
            nom: user.nom,
            prenom: user.prenom,
            email: user.email,
            role: user.role,
            client_id: user.client_id,
            actif: user.actif,
        }
    }
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Client (tenant)
// =============================================================================

/// A subscribing business (tenant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: i64,

    #[serde(alias = "nom_entreprise")]
    pub nom_entreprise: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub telephone: Option<String>,

    #[serde(default)]
    pub adresse: Option<String>,

    /// Subscription end, as sent by the backend (date or timestamp).
    #[serde(default, alias = "date_expiration")]
    pub date_expiration: Option<String>,

    #[serde(default = "default_true")]
    pub actif: bool,
}

impl Client {
    /// Subscription end date, if present and readable.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        let raw = self.date_expiration.as_deref()?.trim();
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// True when the subscription ended before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date().map(|d| d < today).unwrap_or(false)
    }
}

/// Payload for creating or updating a tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewClient {
    pub nom_entreprise: String,
    pub email: String,
    pub telephone: String,
    pub adresse: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub date_expiration: Option<NaiveDate>,
    pub actif: bool,
}

// =============================================================================
// Super-Admin Aggregates
// =============================================================================

/// Activity counters for one tenant (`GET /super-admin/clients/{id}/stats`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantActivity {
    pub nb_users: Count,
    pub nb_produits: Count,
    pub nb_fournisseurs: Count,
    pub ca_total: Money,
    pub nb_ventes: Count,
    pub depenses_total: Money,
    pub nb_achats: Count,
}

/// Best-selling product of a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: i64,
    pub nom: String,
    #[serde(default)]
    pub quantite_vendue: Count,
    #[serde(default)]
    pub ca_genere: Money,
}

/// Full body of the per-tenant statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub client: Client,
    #[serde(default)]
    pub stats: TenantActivity,
    #[serde(default)]
    pub top_produits: Vec<TopProduct>,
}

/// Platform-wide counters (`GET /super-admin/dashboard`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformStats {
    pub clients_actifs: Count,
    pub clients_inactifs: Count,
    pub clients_expires: Count,
    pub total_users: Count,
    pub total_produits: Count,
    pub total_ventes: Count,
    pub total_achats: Count,
    pub ca_total: Money,
}

/// A tenant in the "most active" ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub id: i64,
    pub nom_entreprise: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nb_ventes: Count,
    #[serde(default)]
    pub nb_achats: Count,
    #[serde(default)]
    pub nb_users: Count,
    #[serde(default)]
    pub nb_produits: Count,
}

/// New tenants registered in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClientsInMonth {
    pub mois: String,
    #[serde(default)]
    pub nouveaux_clients: Count,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminDashboard {
    pub stats: PlatformStats,
    pub top_clients: Vec<TopClient>,
    pub stats_par_mois: Vec<NewClientsInMonth>,
}

/// A counter from an aggregate query.
///
/// SQL `COUNT(*)` arrives as a JSON string from the backend's driver, so both
/// `12` and `"12"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Count(pub i64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
            Null(()),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Count(n)),
            Raw::Float(f) if f.is_finite() => Ok(Count(f.round() as i64)),
            Raw::Float(_) => Err(serde::de::Error::custom("count is not finite")),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Count)
                .map_err(|_| serde::de::Error::custom(format!("invalid count: '{}'", s))),
            Raw::Null(()) => Ok(Count(0)),
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 and the zone-less forms `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` (fractional seconds allowed) and `YYYY-MM-DD`.
/// Zone-less values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Unreadable timestamps become `None` instead of failing the whole record.
fn lenient_timestamp<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(parse_timestamp))
}

// =============================================================================
// Company Profile
// =============================================================================

/// Business details printed on invoices and receipts.
///
/// Stored locally under the `entreprise_info` key, never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CompanyProfile {
    pub nom_entreprise: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
    /// Numéro d'identification fiscale.
    pub nif: String,
    /// Registre du commerce.
    pub rccm: String,
    pub tva: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_product() -> Product {
        serde_json::from_value(json!({
            "id": 1,
            "nom": "Riz 25kg",
            "categorie": "Alimentaire",
            "prixAchat": "5000.00",
            "prixVente": 7500,
            "stock": 50,
            "seuilAlerte": null,
            "codeBarre": "1234567890123"
        }))
        .unwrap()
    }

    #[test]
    fn test_product_from_camel_case_json() {
        let product = sample_product();
        assert_eq!(product.prix_achat, Money::from_units(5000));
        assert_eq!(product.prix_vente, Money::from_units(7500));
        assert_eq!(product.alert_threshold(), DEFAULT_ALERT_THRESHOLD);
        assert_eq!(product.margin(), Money::from_units(2500));
        assert_eq!(product.stock_value(), Money::from_units(250_000));
        assert!(!product.is_low_stock());
        assert!(product.can_sell(50));
        assert!(!product.can_sell(60));
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut product = sample_product();
        product.stock = 10;
        assert!(product.is_low_stock());
        product.seuil_alerte = Some(5);
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_blank_category() {
        let mut product = sample_product();
        product.categorie = Some("   ".to_string());
        assert_eq!(product.category(), None);
    }

    #[test]
    fn test_new_purchase_serializes_snake_case() {
        let purchase = NewPurchase {
            produit_id: 1,
            fournisseur_id: 2,
            quantite: 10,
            prix_unitaire: Money::from_units(5200),
        };
        assert_eq!(purchase.total(), Money::from_units(52_000));
        assert_eq!(
            serde_json::to_value(&purchase).unwrap(),
            json!({"produit_id": 1, "fournisseur_id": 2, "quantite": 10, "prix_unitaire": 5200})
        );
    }

    #[test]
    fn test_order_status_wire_values() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Delivered).unwrap(),
            json!("Livrée")
        );
        let status: OrderStatus = serde_json::from_value(json!("En attente")).unwrap();
        assert_eq!(status, OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("Annulée"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("Perdue"), None);
    }

    #[test]
    fn test_order_update_only_sends_set_fields() {
        let update = OrderUpdate::status(OrderStatus::InProgress);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"statut": "En cours"})
        );
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(!Role::Admin.is_super_admin());

        assert!(Role::Admin.is_admin());
        assert!(!Role::Gestionnaire.is_admin());

        assert!(Role::Gestionnaire.can_manage());
        assert!(!Role::Vendeur.can_manage());

        assert!(Role::Vendeur.can_sell());
        assert!(!Role::Vendeur.can_buy());
        assert!(Role::Acheteur.can_buy());
        assert!(!Role::Acheteur.can_sell());
        assert!(Role::Gestionnaire.can_sell() && Role::Gestionnaire.can_buy());
    }

    #[test]
    fn test_user_accepts_both_casings() {
        let snake: User = serde_json::from_value(json!({
            "id": 3, "nom": "Diop", "prenom": "Awa", "email": "awa@example.com",
            "role": "vendeur", "client_id": 7
        }))
        .unwrap();
        let camel: User = serde_json::from_value(json!({
            "id": 3, "nom": "Diop", "prenom": "Awa", "email": "awa@example.com",
            "role": "vendeur", "clientId": 7, "actif": true
        }))
        .unwrap();

        assert_eq!(snake, camel);
        assert!(snake.actif);
        assert_eq!(snake.display_name(), "Awa Diop");
    }

    #[test]
    fn test_user_update_drops_password() {
        let update: UserUpdate = NewUser {
            nom: "Diop".to_string(),
            prenom: String::new(),
            email: "awa@example.com".to_string(),
            password: "secret".to_string(),
            role: Role::Vendeur,
            client_id: Some(7),
            actif: true,
        }
        .into();
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_client_expiration() {
        let client: Client = serde_json::from_value(json!({
            "id": 1,
            "nomEntreprise": "Boutique Awa",
            "dateExpiration": "2024-03-31T00:00:00.000Z",
            "actif": true
        }))
        .unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(client.expiration_date(), Some(expiry));
        assert!(!client.is_expired(expiry));
        assert!(client.is_expired(expiry.succ_opt().unwrap()));
    }

    #[test]
    fn test_count_accepts_strings() {
        let stats: PlatformStats = serde_json::from_value(json!({
            "clientsActifs": "12",
            "totalUsers": 40,
            "caTotal": "1500000.00"
        }))
        .unwrap();
        assert_eq!(stats.clients_actifs, Count(12));
        assert_eq!(stats.total_users, Count(40));
        assert_eq!(stats.clients_expires, Count(0));
        assert_eq!(stats.ca_total, Money::from_units(1_500_000));
    }

    #[test]
    fn test_timestamp_formats() {
        use chrono::TimeZone;
        let expected = Utc.with_ymd_and_hms(2026, 10, 3, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-10-03T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-03T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-03 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-03T10:00:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp("2026-10-03"),
            Some(Utc.with_ymd_and_hms(2026, 10, 3, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("hier"), None);
    }

    #[test]
    fn test_unreadable_sale_date_keeps_record() {
        let sales: Vec<Sale> = serde_json::from_value(json!([
            { "id": 1, "produitId": 1, "quantite": 2, "dateVente": "2026-10-03 10:00:00" },
            { "id": 2, "produitId": 1, "quantite": 1, "dateVente": "pas une date" },
            { "id": 3, "produitId": 1, "quantite": 1, "dateVente": 1759485600 },
            { "id": 4, "produitId": 1, "quantite": 1, "dateVente": null }
        ]))
        .unwrap();
        assert_eq!(sales.len(), 4);
        assert!(sales[0].date_vente.is_some());
        assert!(sales[1..].iter().all(|s| s.date_vente.is_none()));
    }
}
