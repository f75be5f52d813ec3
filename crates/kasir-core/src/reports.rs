//! # Derived Views
//!
//! Read-only projections over a committed [`AppState`]. Nothing here
//! persists state of its own; every figure is recomputed from the
//! aggregate on demand, so the views can never drift from the ledgers.
//!
//! Aggregations that rank items keep a stable tie-break: the order in
//! which a menu id is first seen while scanning `sales` (newest first).

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::money::Money;
use crate::types::{AppState, MenuItem, SaleInvoice};
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// View Types
// =============================================================================

/// Revenue and traffic for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// The day summarized.
    pub date: NaiveDate,
    /// Sum of invoice totals committed that day.
    pub revenue: Money,
    /// Number of invoices committed that day.
    pub transactions: usize,
    /// The day's three best sellers by quantity.
    pub top_items: Vec<SellerRank>,
}

/// One row of a quantity-sold ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerRank {
    /// Menu id of the ranked item.
    pub menu_id: String,
    /// Current catalog name (falls back to the sale-time snapshot).
    pub name: String,
    /// Total units sold.
    pub quantity: i64,
}

/// One row of the margin ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginRow {
    /// Menu id of the item.
    pub menu_id: String,
    /// Current catalog name.
    pub name: String,
    /// Revenue at sale-time prices.
    pub revenue: Money,
    /// Cost at the CURRENT catalog cost. An estimate by design: the
    /// catalog does not version historical costs.
    pub cost: Money,
    /// `revenue - cost`.
    pub profit: Money,
}

/// Quantity of one menu item sold on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub quantity: i64,
}

/// Revenue across all items on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Money,
}

// =============================================================================
// Views
// =============================================================================

/// Revenue, transaction count, and top-3 sellers for one calendar day.
pub fn daily_summary(state: &AppState, date: NaiveDate) -> DailySummary {
    let day_sales: Vec<&SaleInvoice> = state
        .sales
        .iter()
        .filter(|s| s.timestamp.date_naive() == date)
        .collect();

    let revenue = day_sales.iter().map(|s| s.total).sum();
    let mut top_items = rank_by_quantity(day_sales.iter().copied(), state);
    top_items.truncate(3);

    DailySummary {
        date,
        revenue,
        transactions: day_sales.len(),
        top_items,
    }
}

/// All-time best sellers by quantity, at most `limit` rows.
pub fn top_sellers(state: &AppState, limit: usize) -> Vec<SellerRank> {
    let mut ranking = rank_by_quantity(state.sales.iter(), state);
    ranking.truncate(limit);
    ranking
}

/// Profit ranking per sold menu id, most profitable first.
///
/// Revenue uses the prices recorded on the invoices; cost uses the
/// current menu cost for every unit ever sold.
pub fn margin_ranking(state: &AppState) -> Vec<MarginRow> {
    let mut rows: Vec<MarginRow> = Vec::new();

    for sale in &state.sales {
        for line in &sale.items {
            let unit_cost = state
                .find_menu_item(&line.menu_id)
                .map(|m| m.cost)
                .unwrap_or_else(Money::zero);
            let row = match rows.iter_mut().find(|r| r.menu_id == line.menu_id) {
                Some(row) => row,
                None => {
                    rows.push(MarginRow {
                        menu_id: line.menu_id.clone(),
                        name: state
                            .find_menu_item(&line.menu_id)
                            .map(|m| m.name.clone())
                            .unwrap_or_else(|| line.name.clone()),
                        revenue: Money::zero(),
                        cost: Money::zero(),
                        profit: Money::zero(),
                    });
                    rows.last_mut().expect("just pushed")
                }
            };
            row.revenue += line.line_total();
            row.cost += unit_cost.multiply_quantity(line.quantity);
        }
    }

    for row in &mut rows {
        row.profit = row.revenue - row.cost;
    }
    rows.sort_by(|a, b| b.profit.cmp(&a.profit));
    rows
}

/// Items running low: `0 < stock <= LOW_STOCK_THRESHOLD`, catalog order.
///
/// Sold-out items are excluded on purpose: zero stock shows as
/// unavailable in the catalog already, the alert is for items that can
/// still be saved by a restock.
pub fn low_stock(state: &AppState) -> Vec<&MenuItem> {
    state
        .menu
        .iter()
        .filter(|m| m.stock > 0 && m.stock <= LOW_STOCK_THRESHOLD)
        .collect()
}

/// Units of one menu item sold per day over the trailing window ending
/// at `today`. Oldest day first, zero-filled.
pub fn item_trend(state: &AppState, menu_id: &str, days: u64, today: NaiveDate) -> Vec<TrendPoint> {
    trailing_days(today, days)
        .map(|date| TrendPoint {
            date,
            quantity: state
                .sales
                .iter()
                .filter(|s| s.timestamp.date_naive() == date)
                .flat_map(|s| s.items.iter())
                .filter(|l| l.menu_id == menu_id)
                .map(|l| l.quantity)
                .sum(),
        })
        .collect()
}

/// Total revenue per day over the trailing window ending at `today`.
/// Oldest day first, zero-filled.
pub fn revenue_trend(state: &AppState, days: u64, today: NaiveDate) -> Vec<RevenuePoint> {
    trailing_days(today, days)
        .map(|date| RevenuePoint {
            date,
            revenue: state
                .sales
                .iter()
                .filter(|s| s.timestamp.date_naive() == date)
                .map(|s| s.total)
                .sum(),
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// The `days` calendar days ending at `today`, oldest first.
fn trailing_days(today: NaiveDate, days: u64) -> impl Iterator<Item = NaiveDate> {
    (0..days).rev().map(move |back| {
        today
            .checked_sub_days(Days::new(back))
            .expect("date within chrono range")
    })
}

/// Aggregates quantity per menu id in first-seen order, then sorts
/// descending by quantity. The sort is stable, so equal quantities keep
/// their first-seen order.
fn rank_by_quantity<'a>(
    sales: impl Iterator<Item = &'a SaleInvoice>,
    state: &AppState,
) -> Vec<SellerRank> {
    let mut ranking: Vec<SellerRank> = Vec::new();

    for sale in sales {
        for line in &sale.items {
            match ranking.iter_mut().find(|r| r.menu_id == line.menu_id) {
                Some(row) => row.quantity += line.quantity,
                None => ranking.push(SellerRank {
                    menu_id: line.menu_id.clone(),
                    name: state
                        .find_menu_item(&line.menu_id)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| line.name.clone()),
                    quantity: line.quantity,
                }),
            }
        }
    }

    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking
}

// =============================================================================
// Unit Tests
// =============================================================================
