/// Database collaborator
///
/// Runs one blocking MySQL query and materializes the result set as a
/// Dataset. Column schema comes from result-set metadata, so an empty
/// report still carries its header.

use log::{debug, info};
use mysql::prelude::*;
use mysql::{Conn, OptsBuilder};

use crate::config::DbConfig;
use crate::types::{Cell, Dataset};

/// Execute a report query and collect the full result set
pub fn fetch_report(config: &DbConfig, sql: &str) -> Result<Dataset, String> {
    info!("Connecting to {}", config.masked_url());

    let opts = OptsBuilder::new()
        .ip_or_hostname(Some(config.host.clone()))
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()));

    let mut conn = Conn::new(opts).map_err(|e| format!("Database connection failed: {}", e))?;

    debug!("running query: {}", sql);
    let mut result = conn.query_iter(sql).map_err(|e| format!("Query failed: {}", e))?;

    let columns: Vec<String> =
        result.columns().as_ref().iter().map(|c| c.name_str().into_owned()).collect();
    let mut data = Dataset::with_columns(columns);

    for row in result.by_ref() {
        let row = row.map_err(|e| format!("Failed to read row: {}", e))?;
        let cells: Vec<Cell> = row.unwrap().into_iter().map(to_cell).collect();
        data.push_row(cells)?;
    }

    info!("Retrieved {} rows", data.row_count());
    Ok(data)
}

/// Map a MySQL value into a dataset cell. Temporal values become text in
/// the forms the enrichment date parser understands.
fn to_cell(value: mysql::Value) -> Cell {
    match value {
        mysql::Value::NULL => Cell::Null,
        mysql::Value::Bytes(bytes) => Cell::Text(String::from_utf8_lossy(&bytes).into_owned()),
        mysql::Value::Int(i) => Cell::Number(i as f64),
        mysql::Value::UInt(u) => Cell::Number(u as f64),
        mysql::Value::Float(f) => Cell::Number(f as f64),
        mysql::Value::Double(d) => Cell::Number(d),
        mysql::Value::Date(year, month, day, 0, 0, 0, 0) => {
            Cell::Text(format!("{:04}-{:02}-{:02}", year, month, day))
        }
        mysql::Value::Date(year, month, day, hour, minute, second, _) => Cell::Text(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        )),
        mysql::Value::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if negative { "-" } else { "" };
            Cell::Text(format!("{}{:02}:{:02}:{:02}", sign, u32::from(hours) + days * 24, minutes, seconds))
        }
    }
}
