//! # Statistics
//!
//! Aggregations behind the dashboard, the profit page and period reports.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cached lists (AppStore)                                                │
//! │    products ─┬──► stock_summary, low_stock, category_breakdown          │
//! │    sales    ─┼──► monthly_totals, monthly_series, period_report         │
//! │    purchases ┘                                                          │
//! │                                                                         │
//! │  Every function is a single pass over in-memory data. Nothing here      │
//! │  reads the clock: callers pass `now` or a month/range explicitly.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Months are calendar months in UTC. Records without a timestamp never fall
//! into a month or a date range; they still count toward all-time totals.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, Purchase, Sale};
use crate::{TOP_PRODUCTS_LIMIT, TREND_MONTHS, UNCATEGORIZED_LABEL};

// =============================================================================
// Month Key
// =============================================================================

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthKey {
    /// Month containing `instant`.
    pub fn of(instant: DateTime<Utc>) -> Self {
        MonthKey {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// True when `instant` falls in this month.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        MonthKey::of(instant) == *self
    }

    /// `YYYY-MM`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn in_month(timestamp: Option<DateTime<Utc>>, month: MonthKey) -> bool {
    timestamp.map(|t| month.contains(t)).unwrap_or(false)
}

// =============================================================================
// Monthly Totals
// =============================================================================

/// Sales, purchases and profit over one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub sales: Money,
    pub purchases: Money,
    /// `sales - purchases`
    pub profit: Money,
    /// `profit / sales × 100`, 0 when there were no sales.
    pub margin_pct: f64,
}

/// Sums sale and purchase totals whose timestamp falls in `month`.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use gestock_core::stats::{monthly_totals, MonthKey};
///
/// let month = MonthKey::of(Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap());
/// let totals = monthly_totals(&[], &[], month);
/// assert!(totals.sales.is_zero());
/// assert_eq!(totals.margin_pct, 0.0);
/// ```
pub fn monthly_totals(sales: &[Sale], purchases: &[Purchase], month: MonthKey) -> MonthlyTotals {
    let sales_total: Money = sales
        .iter()
        .filter(|s| in_month(s.date_vente, month))
        .map(|s| s.prix_total)
        .sum();
    let purchases_total: Money = purchases
        .iter()
        .filter(|p| in_month(p.date_achat, month))
        .map(|p| p.prix_total)
        .sum();

    let profit = sales_total - purchases_total;
    MonthlyTotals {
        month,
        sales: sales_total,
        purchases: purchases_total,
        profit,
        margin_pct: Money::percentage(profit, sales_total),
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline figures of the home dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: usize,
    /// Sum of stock units across products.
    pub total_stock: i64,
    pub month_sales: Money,
    pub month_purchases: Money,
    pub month_profit: Money,
    pub month_margin_pct: f64,
}

pub fn dashboard_stats(
    products: &[Product],
    sales: &[Sale],
    purchases: &[Purchase],
    now: DateTime<Utc>,
) -> DashboardStats {
    let month = monthly_totals(sales, purchases, MonthKey::of(now));
    DashboardStats {
        total_products: products.len(),
        total_stock: products.iter().map(|p| p.stock).sum(),
        month_sales: month.sales,
        month_purchases: month.purchases,
        month_profit: month.profit,
        month_margin_pct: month.margin_pct,
    }
}

/// All-time totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallTotals {
    pub sales: Money,
    pub purchases: Money,
    pub profit: Money,
    pub margin_pct: f64,
}

pub fn overall_totals(sales: &[Sale], purchases: &[Purchase]) -> OverallTotals {
    let sales_total: Money = sales.iter().map(|s| s.prix_total).sum();
    let purchases_total: Money = purchases.iter().map(|p| p.prix_total).sum();
    let profit = sales_total - purchases_total;
    OverallTotals {
        sales: sales_total,
        purchases: purchases_total,
        profit,
        margin_pct: Money::percentage(profit, sales_total),
    }
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub product_count: usize,
    pub total_units: i64,
    /// Σ stock × prix_achat
    pub valuation: Money,
    pub low_stock_count: usize,
}

pub fn stock_summary(products: &[Product]) -> StockSummary {
    StockSummary {
        product_count: products.len(),
        total_units: products.iter().map(|p| p.stock).sum(),
        valuation: products.iter().map(Product::stock_value).sum(),
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
    }
}

/// Products at or under their alert threshold, in input order.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

/// Number of products per category. Blank categories are grouped under
/// `Sans catégorie`.
pub fn category_breakdown(products: &[Product]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for product in products {
        let label = product.category().unwrap_or(UNCATEGORIZED_LABEL);
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

// =============================================================================
// Trend
// =============================================================================

/// One point of the sales/purchases trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: MonthKey,
    pub sales: Money,
    pub purchases: Money,
}

/// The last twelve months ending with the month of `now`, oldest first.
///
/// Records outside that window are ignored.
pub fn monthly_series(
    sales: &[Sale],
    purchases: &[Purchase],
    now: DateTime<Utc>,
) -> Vec<MonthlyPoint> {
    let mut months = Vec::with_capacity(TREND_MONTHS);
    let mut cursor = MonthKey::of(now);
    for _ in 0..TREND_MONTHS {
        months.push(cursor);
        cursor = cursor.previous();
    }
    months.reverse();

    let mut buckets: BTreeMap<MonthKey, MonthlyPoint> = months
        .iter()
        .map(|&month| {
            (
                month,
                MonthlyPoint {
                    month,
                    sales: Money::zero(),
                    purchases: Money::zero(),
                },
            )
        })
        .collect();

    for sale in sales {
        if let Some(point) = sale.date_vente.and_then(|d| buckets.get_mut(&MonthKey::of(d))) {
            point.sales += sale.prix_total;
        }
    }
    for purchase in purchases {
        if let Some(point) = purchase
            .date_achat
            .and_then(|d| buckets.get_mut(&MonthKey::of(d)))
        {
            point.purchases += purchase.prix_total;
        }
    }

    buckets.into_values().collect()
}

// =============================================================================
// Period Report
// =============================================================================

/// Inclusive date range; the end day is covered up to its last instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidFormat {
                field: "dateFin".to_string(),
                reason: format!("{} is before {}", end, start),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Parses two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let parse = |field: &str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
                ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: e.to_string(),
                }
            })
        };
        DateRange::new(parse("dateDebut", start)?, parse("dateFin", end)?)
    }

    /// The range ending today and starting one month earlier (same day).
    pub fn last_month(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(chrono::Months::new(1))
            .unwrap_or(today);
        DateRange { start, end: today }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let day = instant.date_naive();
        day >= self.start && day <= self.end
    }
}

/// A product's sales within a report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub produit_id: i64,
    pub nom: String,
    pub quantite: i64,
    pub montant: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub range: DateRange,
    pub sales_total: Money,
    pub purchases_total: Money,
    pub profit: Money,
    pub sales_count: usize,
    pub purchases_count: usize,
    /// Best sellers by amount, at most ten, limited to known products.
    pub top_products: Vec<ProductRanking>,
}

pub fn period_report(
    sales: &[Sale],
    purchases: &[Purchase],
    products: &[Product],
    range: DateRange,
) -> PeriodReport {
    let in_range = |ts: Option<DateTime<Utc>>| ts.map(|t| range.contains(t)).unwrap_or(false);

    let period_sales: Vec<&Sale> = sales.iter().filter(|s| in_range(s.date_vente)).collect();
    let period_purchases: Vec<&Purchase> = purchases
        .iter()
        .filter(|p| in_range(p.date_achat))
        .collect();

    let sales_total: Money = period_sales.iter().map(|s| s.prix_total).sum();
    let purchases_total: Money = period_purchases.iter().map(|p| p.prix_total).sum();

    let names: HashMap<i64, &str> = products.iter().map(|p| (p.id, p.nom.as_str())).collect();
    let mut per_product: HashMap<i64, ProductRanking> = HashMap::new();
    for sale in &period_sales {
        let Some(nom) = names.get(&sale.produit_id) else {
            continue;
        };
        let entry = per_product
            .entry(sale.produit_id)
            .or_insert_with(|| ProductRanking {
                produit_id: sale.produit_id,
                nom: nom.to_string(),
                quantite: 0,
                montant: Money::zero(),
            });
        entry.quantite += sale.quantite;
        entry.montant += sale.prix_total;
    }

    let mut top_products: Vec<ProductRanking> = per_product.into_values().collect();
    top_products.sort_by(|a, b| {
        b.montant
            .cmp(&a.montant)
            .then_with(|| a.produit_id.cmp(&b.produit_id))
    });
    top_products.truncate(TOP_PRODUCTS_LIMIT);

    PeriodReport {
        range,
        sales_total,
        purchases_total,
        profit: sales_total - purchases_total,
        sales_count: period_sales.len(),
        purchases_count: period_purchases.len(),
        top_products,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
