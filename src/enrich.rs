/// Row enrichment engine
///
/// Appends derived financial columns to a report dataset, row by row.
/// Two recipes exist: Sales (invoice rows) and Backlog (order
/// confirmation lines). Both resolve USD exchange rates through a
/// per-run cache and tolerate missing or malformed fields per cell: a
/// bad field nulls its own output column and never aborts the row.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::numeric::{display_precision, parse_amount, parse_split_rate, round_to};
use crate::rates::RateCache;
use crate::types::{Cell, Dataset};

/// Marker written into rate-derived text columns when resolution failed
const UNRESOLVED: &str = "N/A";

/// Which derivation recipe to run over a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// Sales/revenue enrichment: exchange rate, landed cost in USD,
    /// gross profit, split-attributed sales and profit, invoice month
    Sales,
    /// Backlog enrichment: landed cost in USD, GP %, total backlog
    /// landed cost and profit, ETD month
    Backlog,
}

/// Run a recipe over the dataset, appending its output columns in place
pub fn apply(data: &mut Dataset, recipe: Recipe, rates: &mut RateCache) -> Result<(), String> {
    debug!("enriching {} rows with {:?} recipe", data.row_count(), recipe);
    match recipe {
        Recipe::Sales => enrich_sales(data, rates),
        Recipe::Backlog => enrich_backlog(data, rates),
    }
}

fn enrich_sales(data: &mut Dataset, rates: &mut RateCache) -> Result<(), String> {
    let n = data.row_count();
    let mut usd_rates = Vec::with_capacity(n);
    let mut landed_usd_col = Vec::with_capacity(n);
    let mut gp_percent = Vec::with_capacity(n);
    let mut sales_by_split = Vec::with_capacity(n);
    let mut gp_by_split = Vec::with_capacity(n);
    let mut invoice_months = Vec::with_capacity(n);

    for i in 0..n {
        let currency = cell_text(data.value(i, "Landed Cost Currency"));
        let avg_cost = parse_amount(data.value(i, "Average Landed Cost")).unwrap_or(0.0);

        // Rate and converted cost are formatted with precisions computed
        // independently from their own magnitudes.
        let landed_usd = match rates.resolve(&currency) {
            Some(rate) => {
                let rate_places = display_precision(rate);
                usd_rates.push(Cell::text(format!("{:.*}", rate_places, rate)));

                let converted = avg_cost / rate;
                let cost_places = display_precision(converted);
                let rounded = round_to(converted, cost_places);
                landed_usd_col.push(Cell::text(format!("{:.*}", cost_places, rounded)));
                Some(rounded)
            }
            None => {
                usd_rates.push(Cell::text(UNRESOLVED));
                landed_usd_col.push(Cell::text(UNRESOLVED));
                None
            }
        };

        let price = parse_amount(data.value(i, "Standard Unit Price (USD)"));
        gp_percent.push(Cell::from_option(gross_profit_percent(price, landed_usd)));

        let qty = parse_amount(data.value(i, "Standard Invoiced Quantity")).unwrap_or(0.0);
        let split = split_fraction(data.value(i, "Split Rate"));
        let price_or_zero = price.unwrap_or(0.0);

        sales_by_split.push(Cell::Number(round_to(price_or_zero * qty * split, 2)));

        let gp_split = landed_usd.map(|landed| round_to((price_or_zero - landed) * qty * split, 2));
        gp_by_split.push(Cell::from_option(gp_split));

        invoice_months.push(opt_text(format_date(data.value(i, "INV Date"), "%Y-%m")));
    }

    data.add_column("USD Exchange Rate", usd_rates)?;
    data.add_column("Average Landed Cost (USD)", landed_usd_col)?;
    data.add_column("Gross Profit (%)", gp_percent)?;
    data.add_column("Sales by Split (USD)", sales_by_split)?;
    data.add_column("Gross Profit by Split (USD)", gp_by_split)?;
    data.add_column("Invoice Month", invoice_months)?;
    Ok(())
}

fn enrich_backlog(data: &mut Dataset, rates: &mut RateCache) -> Result<(), String> {
    let n = data.row_count();
    let mut landed_usd_col = Vec::with_capacity(n);
    let mut gp_percent = Vec::with_capacity(n);
    let mut total_landed = Vec::with_capacity(n);
    let mut total_gp = Vec::with_capacity(n);
    let mut etd_months = Vec::with_capacity(n);

    for i in 0..n {
        let currency = cell_text(data.value(i, "Landed Cost Currency"));
        let local_cost = parse_amount(data.value(i, "Average Landed Cost")).unwrap_or(0.0);

        let landed_usd = rates.convert_to_usd(local_cost, &currency).map(|c| round_to(c, 6));
        landed_usd_col.push(Cell::from_option(landed_usd));

        let price = parse_amount(data.value(i, "Standard Unit Price (USD)"));
        gp_percent.push(Cell::from_option(gross_profit_percent(price, landed_usd)));

        let qty = parse_amount(data.value(i, "Backlog Quantity")).unwrap_or(0.0);
        let total = landed_usd.map(|landed| round_to(landed * qty, 2));
        total_landed.push(Cell::from_option(total));

        let amount = parse_amount(data.value(i, "Backlog Amount (USD)")).unwrap_or(0.0);
        total_gp.push(Cell::from_option(total.map(|t| round_to(amount - t, 2))));

        etd_months.push(opt_text(format_date(data.value(i, "ETD"), "%b")));
    }

    data.add_column("Average Landed Cost (USD)", landed_usd_col)?;
    data.add_column("GP %", gp_percent)?;
    data.add_column("Total Backlog Landed Cost (USD)", total_landed)?;
    data.add_column("Total Backlog GP (USD)", total_gp)?;
    data.add_column("ETD Month", etd_months)?;
    Ok(())
}

/// (price - landed) / price * 100, rounded to 2 decimals.
/// Null when the price is zero/missing or the landed cost is unresolved.
fn gross_profit_percent(price: Option<f64>, landed_usd: Option<f64>) -> Option<f64> {
    let price = price?;
    let landed = landed_usd?;
    if price == 0.0 {
        return None;
    }
    Some(round_to((price - landed) / price * 100.0, 2))
}

/// Split Rate as a fraction in [0, 1]; missing or malformed is 0.0
fn split_fraction(cell: Option<&Cell>) -> f64 {
    match cell {
        Some(Cell::Text(s)) => parse_split_rate(s),
        Some(Cell::Number(n)) => n / 100.0,
        _ => 0.0,
    }
}

fn cell_text(cell: Option<&Cell>) -> String {
    cell.and_then(Cell::as_text).unwrap_or("").trim().to_string()
}

fn opt_text(value: Option<String>) -> Cell {
    match value {
        Some(s) => Cell::Text(s),
        None => Cell::Null,
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Reformat a date cell with the given pattern; None if absent or unparsable
fn format_date(cell: Option<&Cell>, pattern: &str) -> Option<String> {
    let raw = cell?.as_text()?.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.format(pattern).to_string());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d.format(pattern).to_string());
        }
    }
    None
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod enrich_test;
