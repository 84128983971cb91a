/// Google Sheets backend
///
/// This module handles:
/// - Reading spreadsheet metadata (tab ids and titles)
/// - Batch updates (rename + clear, add tab, cell formatting)
/// - Value writes with explicit input semantics
///
/// The publisher talks to the `SheetsBackend` trait; `GoogleSheets` is
/// the ureq implementation against the Sheets v4 REST API, authenticated
/// with an externally supplied bearer token.

use log::debug;
use serde_json::json;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// One tab in the destination spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub sheet_id: i64,
    pub title: String,
}

/// How the backend interprets written values
///
/// Raw stores strings verbatim; UserEntered lets the backend infer
/// numbers and dates the way a typed-in value would be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInput {
    Raw,
    UserEntered,
}

impl ValueInput {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInput::Raw => "RAW",
            ValueInput::UserEntered => "USER_ENTERED",
        }
    }
}

/// The spreadsheet API surface the publisher depends on
pub trait SheetsBackend {
    /// All tabs with their stable ids and current titles
    fn tabs(&self) -> Result<Vec<Tab>, String>;

    /// Retitle a tab and clear all its cell values in one atomic batch
    fn rename_and_clear(&self, sheet_id: i64, new_title: &str) -> Result<(), String>;

    /// Create a new tab, returning its id
    fn add_tab(&self, title: &str) -> Result<i64, String>;

    /// Apply a batch of cell-formatting requests to the spreadsheet
    fn apply_formatting(&self, requests: Vec<serde_json::Value>) -> Result<(), String>;

    /// Write a rectangular block of values at an A1 range
    fn write_values(&self, range: &str, mode: ValueInput, values: &[Vec<String>]) -> Result<(), String>;
}

/// ureq client for the Google Sheets v4 REST API
pub struct GoogleSheets {
    spreadsheet_id: String,
    access_token: String,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: &str, access_token: &str) -> GoogleSheets {
        GoogleSheets {
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn batch_update(&self, requests: Vec<serde_json::Value>) -> Result<serde_json::Value, String> {
        let url = format!("{}/{}:batchUpdate", API_BASE, self.spreadsheet_id);
        let response = ureq::post(&url)
            .set("Authorization", &self.auth_header())
            .send_json(json!({ "requests": requests }))
            .map_err(|e| format!("Sheets batchUpdate failed: {}", e))?;
        response.into_json().map_err(|e| format!("Invalid batchUpdate response: {}", e))
    }
}

impl SheetsBackend for GoogleSheets {
    fn tabs(&self) -> Result<Vec<Tab>, String> {
        debug!("fetching spreadsheet metadata");

        let url = format!("{}/{}?fields=sheets.properties", API_BASE, self.spreadsheet_id);
        let response = ureq::get(&url)
            .set("Authorization", &self.auth_header())
            .call()
            .map_err(|e| format!("Failed to read spreadsheet metadata: {}", e))?;
        let body: serde_json::Value =
            response.into_json().map_err(|e| format!("Invalid metadata response: {}", e))?;

        let mut tabs = Vec::new();
        if let Some(sheets) = body.get("sheets").and_then(|s| s.as_array()) {
            for sheet in sheets {
                let props = sheet.get("properties");
                let sheet_id = props.and_then(|p| p.get("sheetId")).and_then(|v| v.as_i64());
                let title = props.and_then(|p| p.get("title")).and_then(|v| v.as_str());
                if let (Some(sheet_id), Some(title)) = (sheet_id, title) {
                    tabs.push(Tab { sheet_id, title: title.to_string() });
                }
            }
        }
        Ok(tabs)
    }

    fn rename_and_clear(&self, sheet_id: i64, new_title: &str) -> Result<(), String> {
        debug!("renaming tab {} to '{}' and clearing values", sheet_id, new_title);

        self.batch_update(vec![
            json!({
                "updateSheetProperties": {
                    "properties": { "sheetId": sheet_id, "title": new_title },
                    "fields": "title"
                }
            }),
            json!({
                "updateCells": {
                    "range": { "sheetId": sheet_id },
                    "fields": "userEnteredValue"
                }
            }),
        ])?;
        Ok(())
    }

    fn add_tab(&self, title: &str) -> Result<i64, String> {
        debug!("creating tab '{}'", title);

        let body = self.batch_update(vec![json!({
            "addSheet": { "properties": { "title": title } }
        })])?;

        body.get("replies")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("addSheet"))
            .and_then(|r| r.get("properties"))
            .and_then(|p| p.get("sheetId"))
            .and_then(|v| v.as_i64())
            .ok_or_else(|| format!("addSheet reply missing sheetId for '{}'", title))
    }

    fn apply_formatting(&self, requests: Vec<serde_json::Value>) -> Result<(), String> {
        if requests.is_empty() {
            return Ok(());
        }
        self.batch_update(requests)?;
        Ok(())
    }

    fn write_values(&self, range: &str, mode: ValueInput, values: &[Vec<String>]) -> Result<(), String> {
        debug!("writing {} rows at {} ({})", values.len(), range, mode.as_str());

        let url = format!(
            "{}/{}/values/{}?valueInputOption={}",
            API_BASE,
            self.spreadsheet_id,
            range,
            mode.as_str()
        );
        ureq::put(&url)
            .set("Authorization", &self.auth_header())
            .send_json(json!({ "values": values }))
            .map_err(|e| format!("Value write at {} failed: {}", range, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_input_wire_names() {
        assert_eq!(ValueInput::Raw.as_str(), "RAW");
        assert_eq!(ValueInput::UserEntered.as_str(), "USER_ENTERED");
    }
}
