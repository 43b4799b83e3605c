//! Reports module - CSV and printable HTML statements.

mod csv_report;
mod html_report;
mod money;
mod reports_model;

pub use csv_report::render_csv;
pub use html_report::{escape_html, render_account_summary, render_html};
pub use money::{format_brl, format_rate};
pub use reports_model::{ReportData, ReportFormat};

use crate::Result;

/// Renders `data` in the requested format.
pub fn render(format: ReportFormat, data: &ReportData) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Csv => render_csv(data),
        ReportFormat::Html => render_html(data).map(String::into_bytes),
    }
}
