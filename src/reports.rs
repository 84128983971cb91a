/// Report catalog
///
/// The closed set of exportable report types. Each type carries a fixed
/// SQL statement (a flat reporting view), an optional enrichment recipe,
/// and the tab-name prefix used to find its current spreadsheet tab.

use crate::enrich::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    SalesReport,
    Backlog,
    BrokerCommission,
    InventorySummary,
    InventoryDetails,
    OrderConfirmations,
    PurchaseOrders,
    SalesInvoices,
    CustomerPayments,
    Deliveries,
    InboundLogisticCharges,
    OutboundLogisticCharges,
    CanDetails,
}

impl ReportType {
    /// Every report type, in menu order
    pub fn all() -> &'static [ReportType] {
        &[
            ReportType::SalesReport,
            ReportType::Backlog,
            ReportType::BrokerCommission,
            ReportType::InventorySummary,
            ReportType::InventoryDetails,
            ReportType::OrderConfirmations,
            ReportType::PurchaseOrders,
            ReportType::SalesInvoices,
            ReportType::CustomerPayments,
            ReportType::Deliveries,
            ReportType::InboundLogisticCharges,
            ReportType::OutboundLogisticCharges,
            ReportType::CanDetails,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::SalesReport => "Sales Report",
            ReportType::Backlog => "Backlog",
            ReportType::BrokerCommission => "Broker Commission",
            ReportType::InventorySummary => "Inventory Summary",
            ReportType::InventoryDetails => "Inventory Details",
            ReportType::OrderConfirmations => "Order Confirmations",
            ReportType::PurchaseOrders => "Purchase Orders",
            ReportType::SalesInvoices => "Sales Invoices",
            ReportType::CustomerPayments => "Customer Payments",
            ReportType::Deliveries => "Deliveries",
            ReportType::InboundLogisticCharges => "Inbound Logistic Charges",
            ReportType::OutboundLogisticCharges => "Outbound Logistic Charges",
            ReportType::CanDetails => "CAN Details",
        }
    }

    /// Parse a report name from the CLI. Accepts the display name or a
    /// slug ("sales-report", "sales_report"), case-insensitively.
    /// Unknown names are a validation failure: nothing is queried or
    /// published for them.
    pub fn parse(input: &str) -> Result<ReportType, String> {
        let normalized = normalize(input);
        for report in ReportType::all() {
            if normalize(report.as_str()) == normalized {
                return Ok(*report);
            }
        }
        Err(format!(
            "Unknown report type '{}'. Use --list to see available reports.",
            input
        ))
    }

    /// The fixed SELECT backing this report
    pub fn sql(&self) -> &'static str {
        match self {
            ReportType::SalesReport => "SELECT * FROM sales_report_flat_view",
            ReportType::Backlog => "SELECT * FROM order_confirmation_full_view",
            ReportType::BrokerCommission => "SELECT * FROM broker_commission_earning_view",
            ReportType::InventorySummary => "SELECT * FROM inventory_full_view",
            ReportType::InventoryDetails => "SELECT * FROM inventory_detailed_view",
            ReportType::OrderConfirmations => "SELECT * FROM order_confirmation_full_view",
            ReportType::PurchaseOrders => "SELECT * FROM purchase_order_full_view",
            ReportType::SalesInvoices => "SELECT * FROM sales_invoice_full_view",
            ReportType::CustomerPayments => "SELECT * FROM customer_payment_full_view",
            ReportType::Deliveries => "SELECT * FROM delivery_full_view",
            ReportType::InboundLogisticCharges => "SELECT * FROM inbound_logistic_charge_full_view",
            ReportType::OutboundLogisticCharges => "SELECT * FROM outbound_logistic_charge_full_view",
            ReportType::CanDetails => "SELECT * FROM can_tracking_full_view",
        }
    }

    /// Enrichment recipe, for the report types that derive USD metrics
    pub fn recipe(&self) -> Option<Recipe> {
        match self {
            ReportType::SalesReport => Some(Recipe::Sales),
            ReportType::Backlog => Some(Recipe::Backlog),
            _ => None,
        }
    }

    /// Tab-name prefix: lowercase with spaces as underscores.
    /// A tab whose title starts with this prefix is "the current tab"
    /// for the report type.
    pub fn tab_prefix(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "_")
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}
