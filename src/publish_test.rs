use super::*;
use crate::sheets::Tab;
use crate::types::Cell;
use chrono::TimeZone;
use std::cell::RefCell;

/// In-memory spreadsheet that tracks tabs and records every write
struct FakeBackend {
    tabs: RefCell<Vec<Tab>>,
    next_id: RefCell<i64>,
    writes: RefCell<Vec<(String, ValueInput, Vec<Vec<String>>)>>,
    formatting: RefCell<Vec<Vec<serde_json::Value>>>,
    fail_formatting: bool,
    fail_writes: bool,
}

impl FakeBackend {
    fn new() -> FakeBackend {
        FakeBackend {
            tabs: RefCell::new(Vec::new()),
            next_id: RefCell::new(100),
            writes: RefCell::new(Vec::new()),
            formatting: RefCell::new(Vec::new()),
            fail_formatting: false,
            fail_writes: false,
        }
    }

    fn with_tab(self, sheet_id: i64, title: &str) -> FakeBackend {
        self.tabs.borrow_mut().push(Tab { sheet_id, title: title.to_string() });
        self
    }
}

impl SheetsBackend for FakeBackend {
    fn tabs(&self) -> Result<Vec<Tab>, String> {
        Ok(self.tabs.borrow().clone())
    }

    fn rename_and_clear(&self, sheet_id: i64, new_title: &str) -> Result<(), String> {
        let mut tabs = self.tabs.borrow_mut();
        let tab = tabs
            .iter_mut()
            .find(|t| t.sheet_id == sheet_id)
            .ok_or_else(|| format!("no tab {}", sheet_id))?;
        tab.title = new_title.to_string();
        Ok(())
    }

    fn add_tab(&self, title: &str) -> Result<i64, String> {
        let id = *self.next_id.borrow();
        *self.next_id.borrow_mut() += 1;
        self.tabs.borrow_mut().push(Tab { sheet_id: id, title: title.to_string() });
        Ok(id)
    }

    fn apply_formatting(&self, requests: Vec<serde_json::Value>) -> Result<(), String> {
        if self.fail_formatting {
            return Err("formatting rejected".to_string());
        }
        self.formatting.borrow_mut().push(requests);
        Ok(())
    }

    fn write_values(&self, range: &str, mode: ValueInput, values: &[Vec<String>]) -> Result<(), String> {
        if self.fail_writes {
            return Err("write rejected".to_string());
        }
        self.writes.borrow_mut().push((range.to_string(), mode, values.to_vec()));
        Ok(())
    }
}

fn inventory_dataset() -> Dataset {
    let mut data = Dataset::with_columns(vec![
        "Product".to_string(),
        "In-stock Quantity".to_string(),
        "VAT Invoice Number".to_string(),
    ]);
    data.push_row(vec![Cell::text("widget"), Cell::Number(12.0), Cell::text("0012345")]).unwrap();
    data.push_row(vec![Cell::text("gadget"), Cell::Number(3.0), Cell::text("0012346")]).unwrap();
    data
}

fn fixed_now() -> chrono::DateTime<chrono_tz::Tz> {
    chrono_tz::Asia::Ho_Chi_Minh.with_ymd_and_hms(2025, 8, 26, 15, 30, 0).unwrap()
}

#[test]
fn test_creates_tab_when_none_matches_prefix() {
    let backend = FakeBackend::new().with_tab(1, "unrelated_tab");
    let title = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now()).unwrap();

    assert_eq!(title, "inventory_summary_2025-08-26_1530");
    let tabs = backend.tabs.borrow();
    assert_eq!(tabs.len(), 2);
    assert!(tabs.iter().any(|t| t.title == title));
}

#[test]
fn test_reuses_tab_with_matching_prefix() {
    let backend = FakeBackend::new().with_tab(7, "inventory_summary_2025-08-01_0900");
    let title = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now()).unwrap();

    let tabs = backend.tabs.borrow();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].sheet_id, 7);
    assert_eq!(tabs[0].title, title);
}

#[test]
fn test_publish_twice_leaves_one_prefixed_tab() {
    let backend = FakeBackend::new();
    publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now()).unwrap();
    let later = chrono_tz::Asia::Ho_Chi_Minh.with_ymd_and_hms(2025, 8, 27, 9, 5, 0).unwrap();
    let title = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, later).unwrap();

    assert_eq!(title, "inventory_summary_2025-08-27_0905");
    let tabs = backend.tabs.borrow();
    let prefixed: Vec<_> = tabs.iter().filter(|t| t.title.starts_with("inventory_summary")).collect();
    assert_eq!(prefixed.len(), 1);
    assert_eq!(prefixed[0].title, title);
}

#[test]
fn test_header_is_raw_and_body_is_user_entered() {
    let backend = FakeBackend::new();
    let title = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now()).unwrap();

    let writes = backend.writes.borrow();
    assert_eq!(writes.len(), 2);

    let (header_range, header_mode, header_values) = &writes[0];
    assert_eq!(header_range, &format!("{}!A1", title));
    assert_eq!(*header_mode, ValueInput::Raw);
    assert_eq!(header_values[0], vec!["Product", "In-stock Quantity", "VAT Invoice Number"]);

    let (body_range, body_mode, body_values) = &writes[1];
    assert_eq!(body_range, &format!("{}!A2", title));
    assert_eq!(*body_mode, ValueInput::UserEntered);
    assert_eq!(body_values.len(), 2);
    assert_eq!(body_values[0][0], "widget");
}

#[test]
fn test_formatting_targets_highlight_and_text_columns() {
    let backend = FakeBackend::new();
    publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now()).unwrap();

    let batches = backend.formatting.borrow();
    assert_eq!(batches.len(), 1);
    let requests = &batches[0];

    // Freeze + bold header + one highlight column + one TEXT column
    assert_eq!(requests.len(), 4);
    assert!(requests[0]["updateSheetProperties"]["properties"]["gridProperties"]["frozenRowCount"] == 1);
    assert!(requests[1]["repeatCell"]["cell"]["userEnteredFormat"]["textFormat"]["bold"] == true);

    // "In-stock Quantity" is column 1; data cells start at row index 1
    let highlight = &requests[2]["repeatCell"]["range"];
    assert!(highlight["startColumnIndex"] == 1);
    assert!(highlight["startRowIndex"] == 1);

    // "VAT Invoice Number" is column 2, forced to TEXT
    let text = &requests[3]["repeatCell"];
    assert!(text["range"]["startColumnIndex"] == 2);
    assert!(text["cell"]["userEnteredFormat"]["numberFormat"]["type"] == "TEXT");
}

#[test]
fn test_formatting_failure_does_not_fail_publish() {
    let mut backend = FakeBackend::new();
    backend.fail_formatting = true;

    let result = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now());
    assert!(result.is_ok());
    // Header and body were still written
    assert_eq!(backend.writes.borrow().len(), 2);
}

#[test]
fn test_write_failure_propagates() {
    let mut backend = FakeBackend::new();
    backend.fail_writes = true;

    let result = publish_at(&backend, &inventory_dataset(), ReportType::InventorySummary, fixed_now());
    assert!(result.is_err());
}

#[test]
fn test_empty_dataset_skips_body_write() {
    let backend = FakeBackend::new();
    let data = Dataset::with_columns(vec!["Product".to_string()]);
    publish_at(&backend, &data, ReportType::Deliveries, fixed_now()).unwrap();

    let writes = backend.writes.borrow();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1, ValueInput::Raw);
}
