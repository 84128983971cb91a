/// Export orchestration
///
/// One export runs query -> enrichment (for report types that derive
/// USD metrics) -> publish, strictly in sequence. The exchange-rate
/// cache lives and dies with a single run.

use log::debug;

use crate::config::AppConfig;
use crate::rates::{ExchangeRateApi, RateCache, RateSource};
use crate::reports::ReportType;
use crate::sheets::{GoogleSheets, SheetsBackend};
use crate::types::Dataset;
use crate::{db, enrich, publish};

/// Run one full export; returns the published tab title
pub fn run_export(config: &AppConfig, report: ReportType) -> Result<String, String> {
    let data = fetch_and_enrich(config, report)?;
    let backend = GoogleSheets::new(&config.sheets.spreadsheet_id, &config.sheets.access_token);
    publish_dataset(&backend, &data, report)
}

/// Query the report and apply its enrichment recipe, if it has one
pub fn fetch_and_enrich(config: &AppConfig, report: ReportType) -> Result<Dataset, String> {
    debug!("exporting report '{}'", report.as_str());

    let mut data = db::fetch_report(&config.db, report.sql())?;

    if let Some(recipe) = report.recipe() {
        let api = ExchangeRateApi::new(&config.exchange_api_key);
        enrich_dataset(&mut data, recipe, &api)?;
    }

    Ok(data)
}

/// Enrich with a fresh per-run rate cache over the given source
pub fn enrich_dataset(
    data: &mut Dataset,
    recipe: enrich::Recipe,
    rates: &dyn RateSource,
) -> Result<(), String> {
    let mut cache = RateCache::new(rates);
    enrich::apply(data, recipe, &mut cache)
}

/// Publish a prepared dataset through the given backend
pub fn publish_dataset(
    backend: &dyn SheetsBackend,
    data: &Dataset,
    report: ReportType,
) -> Result<String, String> {
    publish::publish(backend, data, report)
}
