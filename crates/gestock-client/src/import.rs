//! # Product Import
//!
//! Reads a CSV or Excel product list and validates it row by row.
//!
//! ```text
//! produits.csv  ──► parse_products_csv ───────┐
//!                                              ├──► Vec<ImportRow>
//! produits.xlsx ──► parse_products_workbook ──┘         │
//!                                                       ▼
//!                                              validate_import (core)
//!                                                       │
//!                         ┌─────────────────────────────┴──────────────┐
//!                         ▼                                            ▼
//!                 accepted: Vec<NewProduct>                rejected: Vec<RejectedRow>
//!                         │
//!                         ▼
//!                 AppStore::import_products
//! ```
//!
//! Expected header (camelCase spellings of the price/threshold/barcode
//! columns are accepted too):
//! `nom,categorie,description,prix_achat,prix_vente,stock,seuil_alerte,code_barre`
//!
//! Workbooks are read from their first sheet, whose first row holds the
//! same column names.

use calamine::{open_workbook_auto, Data, Reader};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

use gestock_core::validation::{validate_import, ImportReport, ImportRow};

use crate::error::{ClientError, ClientResult};

/// Message for files that are neither CSV nor Excel.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Format de fichier non supporté. Utilisez un fichier CSV ou Excel.";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Parses CSV bytes into raw rows. Fields are trimmed; empty lines are
/// skipped.
pub fn parse_products_csv(content: &[u8]) -> ClientResult<Vec<ImportRow>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ImportRow = result?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "CSV parsed");
    Ok(rows)
}

// =============================================================================
// Excel Workbooks
// =============================================================================

/// Parses the first sheet of a workbook into raw rows.
///
/// The first row gives the column names. Rows with no filled cell are
/// skipped.
pub fn parse_products_workbook(path: &Path) -> ClientResult<Vec<ImportRow>> {
    let mut workbook = open_workbook_auto(path).map_err(read_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ClientError::Import("Le classeur ne contient aucune feuille.".to_string()))?
        .map_err(read_error)?;

    let mut sheet_rows = range.rows();
    let headers: Vec<Option<String>> = match sheet_rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let mut record = Map::new();
        for (header, cell) in headers.iter().zip(cells) {
            if let (Some(key), Some(value)) = (header, cell_text(cell)) {
                record.insert(key.clone(), Value::String(value));
            }
        }
        if record.is_empty() {
            continue;
        }

        let row: ImportRow = serde_json::from_value(Value::Object(record))
            .map_err(|e| ClientError::Import(e.to_string()))?;
        rows.push(row);
    }

    debug!(rows = rows.len(), path = %path.display(), "Workbook parsed");
    Ok(rows)
}

/// Text of a cell as a CSV export would show it. Whole numbers lose their
/// decimal part.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::Int(n) => n.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn read_error(err: impl std::fmt::Display) -> ClientError {
    ClientError::Import(format!("Erreur de lecture du fichier: {}", err))
}

// =============================================================================
// Files
// =============================================================================

/// Reads and validates a product file, CSV or Excel by extension.
pub fn import_file(path: &Path) -> ClientResult<ImportReport> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = if extension == "csv" {
        let content = std::fs::read(path).map_err(read_error)?;
        parse_products_csv(&content)?
    } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        parse_products_workbook(path)?
    } else {
        return Err(ClientError::Import(UNSUPPORTED_FORMAT_MESSAGE.to_string()));
    };
    let report = validate_import(&rows);

    info!(
        path = %path.display(),
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Import file validated"
    );
    Ok(report)
}

#[derive(Serialize)]
struct TemplateRow<'a> {
    nom: &'a str,
    categorie: &'a str,
    description: &'a str,
    prix_achat: i64,
    prix_vente: i64,
    stock: i64,
    seuil_alerte: i64,
    code_barre: &'a str,
}

/// The downloadable import template: header plus two example rows.
pub fn product_template_csv() -> ClientResult<String> {
    let rows = [
        TemplateRow {
            nom: "Exemple Produit 1",
            categorie: "Électronique",
            description: "Description du produit",
            prix_achat: 5000,
            prix_vente: 7500,
            stock: 50,
            seuil_alerte: 10,
            code_barre: "1234567890123",
        },
        TemplateRow {
            nom: "Exemple Produit 2",
            categorie: "Alimentaire",
            description: "Autre description",
            prix_achat: 1000,
            prix_vente: 1500,
            stock: 100,
            seuil_alerte: 20,
            code_barre: "9876543210987",
        },
    ];

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClientError::Import(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ClientError::Import(e.to_string()))
}
