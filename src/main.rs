mod cli;
mod config;
mod db;
mod enrich;
mod numeric;
mod publish;
mod rates;
mod reports;
mod runner;
mod sheets;
mod types;
mod ui;

use log::error;
use reports::ReportType;

fn main() {
    env_logger::init();

    let args = cli::CliArgs::parse_args();

    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    if args.list {
        ui::status("Available reports:");
        for report in ReportType::all() {
            println!("  {}", report.as_str());
        }
        return;
    }

    // Unknown report names stop here, before any query or publish work
    let report = match ReportType::parse(args.report.as_deref().unwrap_or("")) {
        Ok(r) => r,
        Err(e) => {
            ui::print_error(&e);
            std::process::exit(1);
        }
    };

    let mut config = match config::load(args.env_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    if let Some(ref id) = args.spreadsheet_id {
        config.sheets.spreadsheet_id = id.clone();
    }

    ui::status(&format!("Exporting '{}'...", report.as_str()));

    if args.dry_run {
        match runner::fetch_and_enrich(&config, report) {
            Ok(data) => {
                ui::print_success(&format!(
                    "Dry run: {} rows x {} columns ready for '{}'",
                    data.row_count(),
                    data.columns().len(),
                    report.tab_prefix()
                ));
            }
            Err(e) => {
                error!("Dry run failed for '{}': {}", report.as_str(), e);
                ui::print_error("Export failed. Check logs for details.");
                std::process::exit(1);
            }
        }
        return;
    }

    match runner::run_export(&config, report) {
        Ok(tab_title) => {
            ui::print_success(&format!("Exported to sheet: {}", tab_title));
        }
        Err(e) => {
            // Detail goes to the log; the operator sees a generic failure
            error!("Export failed for '{}': {}", report.as_str(), e);
            ui::print_error("Export failed. Check logs for details.");
            std::process::exit(1);
        }
    }
}
