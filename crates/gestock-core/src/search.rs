//! Filtering and lookup over cached lists.
//!
//! Text matching is a case-insensitive substring test; an empty term
//! matches everything.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Product, Purchase, Sale};

fn matches(field: Option<&str>, needle: &str) -> bool {
    field
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Products whose name, category or description contains `term`.
pub fn search_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || matches(Some(&p.nom), &needle)
                || matches(p.categorie.as_deref(), &needle)
                || matches(p.description.as_deref(), &needle)
        })
        .collect()
}

/// Sales whose product name or client name contains `term`.
pub fn search_sales<'a>(sales: &'a [Sale], term: &str) -> Vec<&'a Sale> {
    let needle = term.trim().to_lowercase();
    sales
        .iter()
        .filter(|s| {
            needle.is_empty()
                || matches(s.produit_nom.as_deref(), &needle)
                || matches(s.client_nom.as_deref(), &needle)
        })
        .collect()
}

/// Purchases whose product name or supplier name contains `term`.
pub fn search_purchases<'a>(purchases: &'a [Purchase], term: &str) -> Vec<&'a Purchase> {
    let needle = term.trim().to_lowercase();
    purchases
        .iter()
        .filter(|p| {
            needle.is_empty()
                || matches(p.produit_nom.as_deref(), &needle)
                || matches(p.fournisseur_nom.as_deref(), &needle)
        })
        .collect()
}

/// Finds the product a scanned code refers to.
///
/// A code matches on barcode equality first, then on the product id
/// written as text (labels printed without a barcode carry the id).
pub fn find_by_barcode<'a>(products: &'a [Product], code: &str) -> Option<&'a Product> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    products
        .iter()
        .find(|p| p.code_barre.as_deref().map(str::trim) == Some(code))
        .or_else(|| products.iter().find(|p| p.id.to_string() == code))
}

/// Advanced product search. Unset criteria are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Bounds on the sale price, inclusive.
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    /// Bounds on stock, inclusive.
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub low_stock_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            if !matches(Some(&product.nom), &name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            if !matches(product.categorie.as_deref(), &category.to_lowercase()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.prix_vente < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.prix_vente > max) {
            return false;
        }
        if self.min_stock.is_some_and(|min| product.stock < min) {
            return false;
        }
        if self.max_stock.is_some_and(|max| product.stock > max) {
            return false;
        }
        !self.low_stock_only || product.is_low_stock()
    }
}

pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(
        id: i64,
        nom: &str,
        categorie: &str,
        prix: i64,
        stock: i64,
        code: Option<&str>,
    ) -> Product {
        Product {
            id,
            nom: nom.to_string(),
            description: Some(format!("{} de qualité", nom)),
            categorie: Some(categorie.to_string()),
            prix_achat: Money::from_units(prix / 2),
            prix_vente: Money::from_units(prix),
            stock,
            seuil_alerte: None,
            code_barre: code.map(str::to_string),
            created_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Riz parfumé", "Alimentaire", 7500, 50, Some("1234567890123")),
            product(2, "Savon", "Hygiène", 500, 4, None),
            product(3, "Chargeur USB", "Électronique", 3000, 12, Some("9876543210987")),
        ]
    }

    #[test]
    fn test_search_products_case_insensitive() {
        let products = catalog();
        let ids = |v: Vec<&Product>| v.iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(ids(search_products(&products, "RIZ")), vec![1]);
        assert_eq!(ids(search_products(&products, "hygi")), vec![2]);
        assert_eq!(ids(search_products(&products, "qualité")), vec![1, 2, 3]);
        assert_eq!(ids(search_products(&products, "  ")), vec![1, 2, 3]);
        assert!(search_products(&products, "téléphone").is_empty());
    }

    #[test]
    fn test_search_sales() {
        let sale = |id, produit: &str, client: Option<&str>| Sale {
            id,
            produit_id: 1,
            quantite: 1,
            prix_unitaire: Money::zero(),
            prix_total: Money::zero(),
            client_nom: client.map(str::to_string),
            date_vente: None,
            produit_nom: Some(produit.to_string()),
        };
        let sales = vec![sale(1, "Riz", Some("Moussa")), sale(2, "Savon", None)];

        assert_eq!(search_sales(&sales, "mous").len(), 1);
        assert_eq!(search_sales(&sales, "savon")[0].id, 2);
    }

    #[test]
    fn test_search_purchases() {
        let purchase = |id, produit: Option<&str>, fournisseur: Option<&str>| Purchase {
            id,
            produit_id: 1,
            fournisseur_id: Some(2),
            quantite: 10,
            prix_unitaire: Money::zero(),
            prix_total: Money::zero(),
            date_achat: None,
            produit_nom: produit.map(str::to_string),
            fournisseur_nom: fournisseur.map(str::to_string),
        };
        let purchases = vec![
            purchase(1, Some("Riz parfumé"), Some("Sonacos")),
            purchase(2, Some("Huile"), Some("Grands Moulins")),
            purchase(3, None, None),
        ];
        let ids = |v: Vec<&Purchase>| v.iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(ids(search_purchases(&purchases, "RIZ")), vec![1]);
        assert_eq!(ids(search_purchases(&purchases, "moulins")), vec![2]);
        assert_eq!(ids(search_purchases(&purchases, "")), vec![1, 2, 3]);
        assert!(search_purchases(&purchases, "savon").is_empty());
    }

    #[test]
    fn test_find_by_barcode() {
        let products = catalog();
        assert_eq!(find_by_barcode(&products, "9876543210987").map(|p| p.id), Some(3));
        assert_eq!(find_by_barcode(&products, " 2 ").map(|p| p.id), Some(2));
        assert!(find_by_barcode(&products, "0000").is_none());
        assert!(find_by_barcode(&products, "").is_none());
    }

    #[test]
    fn test_advanced_filter() {
        let products = catalog();

        let filter = ProductFilter {
            min_price: Some(Money::from_units(1000)),
            max_stock: Some(20),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_products(&products, &filter).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);

        let alerts = ProductFilter {
            low_stock_only: true,
            ..Default::default()
        };
        assert_eq!(filter_products(&products, &alerts)[0].id, 2);

        let by_category = ProductFilter {
            category: Some("électro".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_products(&products, &by_category).len(), 1);

        assert_eq!(filter_products(&products, &ProductFilter::default()).len(), 3);
    }
}
