//! # Export Rows
//!
//! Read-only flattening of the committed state into tabular rows for
//! the spreadsheet-export collaborator: one row type per sheet
//! (sales, stock history, menu). Serialization order of the fields is
//! the column order. The core keeps no reference to the rows after the
//! call; formatting and file writing happen entirely outside.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kasir_core::{AppState, Money, StockDirection};

/// One row of the sales sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRow {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total: Money,
    pub method: String,
    pub table: Option<String>,
    pub note: Option<String>,
}

/// One row of the stock history sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRow {
    pub id: String,
    pub date: DateTime<Utc>,
    pub menu: String,
    pub direction: StockDirection,
    pub quantity: i64,
    pub note: String,
}

/// One row of the menu sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuRow {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub cost: Money,
    pub stock: i64,
}

/// Flattens the sales ledger, newest first.
pub fn sales_rows(state: &AppState) -> Vec<SalesRow> {
    state
        .sales
        .iter()
        .map(|s| SalesRow {
            id: s.id.clone(),
            date: s.timestamp,
            total: s.total,
            method: s.method.to_string(),
            table: s.table.clone(),
            note: s.note.clone(),
        })
        .collect()
}

/// Flattens the stock ledger, newest first.
pub fn stock_rows(state: &AppState) -> Vec<StockRow> {
    state
        .stock_history
        .iter()
        .map(|h| StockRow {
            id: h.id.clone(),
            date: h.timestamp,
            menu: h.menu_name.clone(),
            direction: h.direction,
            quantity: h.quantity,
            note: h.note.clone(),
        })
        .collect()
}

/// Flattens the catalog in catalog order.
pub fn menu_rows(state: &AppState) -> Vec<MenuRow> {
    state
        .menu
        .iter()
        .map(|m| MenuRow {
            id: m.id.clone(),
            name: m.name.clone(),
            price: m.price,
            cost: m.cost,
            stock: m.stock,
        })
        .collect()
}
