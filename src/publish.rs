/// Spreadsheet publisher
///
/// Publishes a report dataset into the destination spreadsheet under a
/// timestamped tab title. Each report type owns at most one tab,
/// identified by its title prefix: publishing again retitles and clears
/// that tab instead of creating a duplicate. Write order is fixed:
/// header (literal values), then formatting, then body (interpreted
/// values). A formatting failure is logged and swallowed; any other
/// failure aborts the publish.

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Ho_Chi_Minh;
use chrono_tz::Tz;
use log::{debug, info, warn};
use serde_json::json;

use crate::reports::ReportType;
use crate::sheets::{SheetsBackend, ValueInput};
use crate::types::Dataset;

/// Columns whose data cells get the bold + light-blue highlight
const HIGHLIGHT_COLUMNS: &[&str] = &["In-stock Quantity", "Remaining Quantity"];

/// Identifier column forced to TEXT so leading zeros survive
const TEXT_FORMAT_COLUMN: &str = "VAT Invoice Number";

/// Publish a dataset for a report type; returns the new tab title
pub fn publish(backend: &dyn SheetsBackend, data: &Dataset, report: ReportType) -> Result<String, String> {
    publish_at(backend, data, report, Utc::now().with_timezone(&Ho_Chi_Minh))
}

/// Publish with an explicit timestamp (minute precision, Asia/Ho_Chi_Minh)
pub fn publish_at(
    backend: &dyn SheetsBackend,
    data: &Dataset,
    report: ReportType,
    now: DateTime<Tz>,
) -> Result<String, String> {
    let prefix = report.tab_prefix();
    let new_title = format!("{}_{}", prefix, now.format("%Y-%m-%d_%H%M"));

    debug!("looking for an existing tab with prefix '{}'", prefix);
    let tabs = backend.tabs()?;
    let reuse_target = tabs.iter().find(|t| t.title.starts_with(&prefix));

    let sheet_id = match reuse_target {
        Some(tab) => {
            info!("Reusing tab '{}' as '{}'", tab.title, new_title);
            backend.rename_and_clear(tab.sheet_id, &new_title)?;
            tab.sheet_id
        }
        None => {
            info!("Creating tab '{}'", new_title);
            backend.add_tab(&new_title)?
        }
    };

    // Header first, stored verbatim so numeric-looking column names are
    // not reinterpreted.
    let header: Vec<String> = data.columns().to_vec();
    backend.write_values(&format!("{}!A1", new_title), ValueInput::Raw, &[header])?;

    // Formatting inspects header-derived column positions, so it runs
    // after the header write. A rejected formatting batch never fails
    // the publish.
    if let Err(e) = backend.apply_formatting(formatting_requests(sheet_id, data)) {
        warn!("Formatting failed for '{}': {}", new_title, e);
    }

    // Body from row 2, interpreted so numeric and date cells render as
    // numbers and dates.
    let body = data.rows_as_strings();
    if !body.is_empty() {
        backend.write_values(&format!("{}!A2", new_title), ValueInput::UserEntered, &body)?;
    }

    info!("Published {} rows to '{}'", data.row_count(), new_title);
    Ok(new_title)
}

/// The full formatting batch for a tab; reapplied on every publish
fn formatting_requests(sheet_id: i64, data: &Dataset) -> Vec<serde_json::Value> {
    let mut requests = Vec::new();

    // Freeze the header row
    requests.push(json!({
        "updateSheetProperties": {
            "properties": {
                "sheetId": sheet_id,
                "gridProperties": { "frozenRowCount": 1 }
            },
            "fields": "gridProperties.frozenRowCount"
        }
    }));

    // Bold the header row
    requests.push(json!({
        "repeatCell": {
            "range": { "sheetId": sheet_id, "startRowIndex": 0, "endRowIndex": 1 },
            "cell": { "userEnteredFormat": { "textFormat": { "bold": true } } },
            "fields": "userEnteredFormat.textFormat.bold"
        }
    }));

    // Highlight stock-quantity columns where present
    for column in HIGHLIGHT_COLUMNS {
        if let Some(idx) = data.column_index(column) {
            requests.push(json!({
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": 1,
                        "startColumnIndex": idx,
                        "endColumnIndex": idx + 1
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "textFormat": { "bold": true },
                            "backgroundColor": { "red": 0.8, "green": 0.95, "blue": 1.0 }
                        }
                    },
                    "fields": "userEnteredFormat(textFormat, backgroundColor)"
                }
            }));
        }
    }

    // Keep invoice numbers textual so leading zeros and precision survive
    if let Some(idx) = data.column_index(TEXT_FORMAT_COLUMN) {
        requests.push(json!({
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 1,
                    "startColumnIndex": idx,
                    "endColumnIndex": idx + 1
                },
                "cell": { "userEnteredFormat": { "numberFormat": { "type": "TEXT" } } },
                "fields": "userEnteredFormat.numberFormat"
            }
        }));
    }

    requests
}

#[cfg(test)]
#[path = "publish_test.rs"]
mod publish_test;
