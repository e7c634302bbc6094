//! # Validation Module
//!
//! Business rule checks run before anything reaches the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form / CSV input                                             │
//! │  ├── Import rows: validate_import → ImportReport                       │
//! │  └── Sale form: validate_quantity + ensure_stock                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: gestock-client                                               │
//! │  └── Rejects before the HTTP call, so invalid input costs no round trip│
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authoritative (stock updates, constraints, tenancy)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Import Rules
//! A row is accepted iff:
//! - `nom` and `categorie` are non-blank
//! - `prix_achat` and `prix_vente` are numbers ≥ 0
//! - `stock` is an integer ≥ 0
//! - `prix_vente` ≥ `prix_achat`
//!
//! Rejected rows are reported with every problem found; the remaining rows
//! still go through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewProduct, Product};
use crate::DEFAULT_ALERT_THRESHOLD;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Name reported for a rejected row without one.
const UNNAMED_ROW: &str = "Sans nom";

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale/purchase/order quantity.
///
/// ```rust
/// use gestock_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_positive("quantite", qty)
}

/// Validates that `value` is strictly positive.
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price (zero allowed, negative refused).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Rejects a sale that would take more than the cached stock.
///
/// ## User Workflow
/// ```text
/// Riz 25kg: stock 50
/// Sale form: quantite 60
///      │
///      ▼
/// ensure_stock ← THIS FUNCTION
///      │
///      ▼
/// Err(InsufficientStock { available: 50, requested: 60 })
/// ```
pub fn ensure_stock(product: &Product, qty: i64) -> CoreResult<()> {
    if !product.can_sell(qty) {
        return Err(CoreError::InsufficientStock {
            product: product.nom.clone(),
            available: product.stock,
            requested: qty,
        });
    }
    Ok(())
}

// =============================================================================
// Product Import
// =============================================================================

/// One raw row of an imported product file.
///
/// Values are kept as text; both the snake_case and camelCase spellings of
/// the multi-word columns are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub nom: Option<String>,

    #[serde(default)]
    pub categorie: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "prixAchat")]
    pub prix_achat: Option<String>,

    #[serde(default, alias = "prixVente")]
    pub prix_vente: Option<String>,

    #[serde(default)]
    pub stock: Option<String>,

    #[serde(default, alias = "seuilAlerte")]
    pub seuil_alerte: Option<String>,

    #[serde(default, alias = "codeBarre")]
    pub code_barre: Option<String>,
}

/// Why a row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportProblem {
    MissingName,
    MissingCategory,
    InvalidPurchasePrice,
    InvalidSalePrice,
    InvalidStock,
    SalePriceBelowPurchasePrice,
}

impl ImportProblem {
    /// Message shown to the user next to the row number.
    pub const fn message(&self) -> &'static str {
        match self {
            ImportProblem::MissingName => "Nom manquant",
            ImportProblem::MissingCategory => "Catégorie manquante",
            ImportProblem::InvalidPurchasePrice => "Prix d'achat invalide",
            ImportProblem::InvalidSalePrice => "Prix de vente invalide",
            ImportProblem::InvalidStock => "Stock invalide",
            ImportProblem::SalePriceBelowPurchasePrice => {
                "Prix de vente inférieur au prix d'achat"
            }
        }
    }
}

impl fmt::Display for ImportProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// Line number in the source file; the header is line 1.
    pub row: usize,
    /// Product name as given, or `Sans nom`.
    pub product: String,
    pub problems: Vec<ImportProblem>,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problems: Vec<&str> = self.problems.iter().map(ImportProblem::message).collect();
        write!(f, "Ligne {} ({}): {}", self.row, self.product, problems.join(", "))
    }
}

/// Outcome of validating a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub accepted: Vec<NewProduct>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    /// True when no row was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// Validates imported rows, splitting them into accepted payloads and
/// rejected rows.
///
/// ## Example
/// ```rust
/// use gestock_core::validation::{validate_import, ImportRow, ImportProblem};
///
/// let rows = vec![ImportRow {
///     nom: Some("Savon".into()),
///     categorie: Some("Hygiène".into()),
///     prix_achat: Some("500".into()),
///     prix_vente: Some("400".into()),
///     stock: Some("20".into()),
///     ..Default::default()
/// }];
///
/// let report = validate_import(&rows);
/// assert_eq!(report.rejected[0].row, 2);
/// assert_eq!(
///     report.rejected[0].problems,
///     vec![ImportProblem::SalePriceBelowPurchasePrice]
/// );
/// ```
pub fn validate_import(rows: &[ImportRow]) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        match validate_import_row(row) {
            Ok(product) => report.accepted.push(product),
            Err(problems) => report.rejected.push(RejectedRow {
                // Header occupies line 1
                row: index + 2,
                product: non_blank(&row.nom)
                    .map(str::to_string)
                    .unwrap_or_else(|| UNNAMED_ROW.to_string()),
                problems,
            }),
        }
    }

    report
}

/// Validates a single row, returning every problem found.
pub fn validate_import_row(row: &ImportRow) -> Result<NewProduct, Vec<ImportProblem>> {
    let mut problems = Vec::new();

    let nom = non_blank(&row.nom);
    if nom.is_none() {
        problems.push(ImportProblem::MissingName);
    }

    let categorie = non_blank(&row.categorie);
    if categorie.is_none() {
        problems.push(ImportProblem::MissingCategory);
    }

    let prix_achat = parse_amount(&row.prix_achat).filter(|p| !p.is_negative());
    if prix_achat.is_none() {
        problems.push(ImportProblem::InvalidPurchasePrice);
    }

    let prix_vente = parse_amount(&row.prix_vente).filter(|p| !p.is_negative());
    if prix_vente.is_none() {
        problems.push(ImportProblem::InvalidSalePrice);
    }

    let stock = parse_integer(&row.stock).filter(|s| *s >= 0);
    if stock.is_none() {
        problems.push(ImportProblem::InvalidStock);
    }

    if let (Some(achat), Some(vente)) = (prix_achat, prix_vente) {
        if vente < achat {
            problems.push(ImportProblem::SalePriceBelowPurchasePrice);
        }
    }

    match (nom, categorie, prix_achat, prix_vente, stock) {
        (Some(nom), Some(categorie), Some(prix_achat), Some(prix_vente), Some(stock))
            if problems.is_empty() =>
        {
            Ok(NewProduct {
                nom: nom.to_string(),
                description: row.description.as_deref().unwrap_or("").trim().to_string(),
                prix_achat,
                prix_vente,
                stock,
                seuil_alerte: parse_integer(&row.seuil_alerte).unwrap_or(DEFAULT_ALERT_THRESHOLD),
                categorie: categorie.to_string(),
                code_barre: row.code_barre.as_deref().unwrap_or("").trim().to_string(),
            })
        }
        _ => Err(problems),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(value: &Option<String>) -> Option<Money> {
    non_blank(value).and_then(Money::parse)
}

fn parse_integer(value: &Option<String>) -> Option<i64> {
    non_blank(value).and_then(|v| v.parse().ok())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(nom: &str, categorie: &str, achat: &str, vente: &str, stock: &str) -> ImportRow {
        let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        ImportRow {
            nom: opt(nom),
            categorie: opt(categorie),
            prix_achat: opt(achat),
            prix_vente: opt(vente),
            stock: opt(stock),
            ..Default::default()
        }
    }

    fn product(stock: i64) -> Product {
        Product {
            id: 1,
            nom: "Riz 25kg".to_string(),
            description: None,
            categorie: Some("Alimentaire".to_string()),
            prix_achat: Money::from_units(5000),
            prix_vente: Money::from_units(7500),
            stock,
            seuil_alerte: None,
            code_barre: None,
            created_at: None,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("prix_unitaire", Money::zero()).is_ok());
        assert!(validate_price("prix_unitaire", Money::from_units(-1)).is_err());
    }

    #[test]
    fn test_ensure_stock() {
        let p = product(50);
        assert!(ensure_stock(&p, 50).is_ok());

        let err = ensure_stock(&p, 60).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("insufficient stock"));
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 50,
                requested: 60,
                ..
            }
        ));
    }

    #[test]
    fn test_accepted_row_is_trimmed_with_defaults() {
        let rows = vec![row("  Exemple Produit 1 ", " Électronique ", "5000", "7500", "50")];
        let report = validate_import(&rows);

        assert!(report.is_clean());
        let p = &report.accepted[0];
        assert_eq!(p.nom, "Exemple Produit 1");
        assert_eq!(p.categorie, "Électronique");
        assert_eq!(p.description, "");
        assert_eq!(p.code_barre, "");
        assert_eq!(p.seuil_alerte, DEFAULT_ALERT_THRESHOLD);
        assert_eq!(p.prix_achat, Money::from_units(5000));
        assert_eq!(p.stock, 50);
    }

    #[test]
    fn test_equal_prices_accepted() {
        let report = validate_import(&[row("Sel", "Alimentaire", "100", "100", "0")]);
        assert_eq!(report.accepted.len(), 1);
    }

    #[test]
    fn test_every_problem_reported() {
        let report = validate_import(&[row("", "", "abc", "-1", "2.5")]);
        assert_eq!(report.accepted.len(), 0);

        let rejected = &report.rejected[0];
        assert_eq!(rejected.row, 2);
        assert_eq!(rejected.product, "Sans nom");
        assert_eq!(
            rejected.problems,
            vec![
                ImportProblem::MissingName,
                ImportProblem::MissingCategory,
                ImportProblem::InvalidPurchasePrice,
                ImportProblem::InvalidSalePrice,
                ImportProblem::InvalidStock,
            ]
        );
    }

    #[test]
    fn test_mixed_batch_keeps_valid_rows() {
        let rows = vec![
            row("Savon", "Hygiène", "500", "750", "20"),
            row("Huile", "Alimentaire", "1500", "1000", "5"),
            row("Sucre", "Alimentaire", "800", "1000", "-1"),
            row("Lait", "Alimentaire", "600", "900", "12"),
        ];
        let report = validate_import(&rows);

        let accepted: Vec<&str> = report.accepted.iter().map(|p| p.nom.as_str()).collect();
        assert_eq!(accepted, vec!["Savon", "Lait"]);

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].row, 3);
        assert_eq!(
            report.rejected[0].problems,
            vec![ImportProblem::SalePriceBelowPurchasePrice]
        );
        assert_eq!(report.rejected[1].row, 4);
        assert_eq!(report.rejected[1].problems, vec![ImportProblem::InvalidStock]);
        assert_eq!(report.total_rows(), 4);
    }

    #[test]
    fn test_optional_columns() {
        let mut r = row("Café", "Boissons", "2000,5", "3000", "7");
        r.seuil_alerte = Some("3".to_string());
        r.code_barre = Some(" 9876543210987 ".to_string());
        r.description = Some("Arabica".to_string());

        let p = validate_import_row(&r).unwrap();
        assert_eq!(p.prix_achat, Money::from_centimes(200_050));
        assert_eq!(p.seuil_alerte, 3);
        assert_eq!(p.code_barre, "9876543210987");
        assert_eq!(p.description, "Arabica");
    }

    #[test]
    fn test_rejected_row_display() {
        let report = validate_import(&[row("Huile", "", "1500", "1000", "5")]);
        assert_eq!(
            report.rejected[0].to_string(),
            "Ligne 2 (Huile): Catégorie manquante, Prix de vente inférieur au prix d'achat"
        );
    }
}
