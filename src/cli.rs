use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "erp-export")]
#[command(about = "Export ERP report data from MySQL to Google Sheets")]
#[command(version)]
pub struct CliArgs {
    /// Report to export, by display name or slug
    /// Examples: "Sales Report", sales-report, backlog
    #[arg(value_name = "REPORT")]
    pub report: Option<String>,

    /// List the available report types and exit
    #[arg(long, short = 'l')]
    pub list: bool,

    /// Path to a .env file with database and API credentials
    /// Default: ./.env if present, else plain environment variables
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Override the destination spreadsheet id from the environment
    #[arg(long, value_name = "ID")]
    pub spreadsheet_id: Option<String>,

    /// Query and enrich, then report the shape instead of publishing
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if !self.list && self.report.is_none() {
            return Err("Specify a report to export, or --list to see the available reports".to_string());
        }
        Ok(())
    }
}
