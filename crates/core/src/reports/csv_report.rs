//! Spreadsheet export.
//!
//! The output starts with a UTF-8 byte order mark and uses `;` as delimiter so
//! spreadsheet software in pt-BR locales opens it without an import dialog.

use csv::WriterBuilder;

use super::money::{format_brl, format_rate};
use super::reports_model::ReportData;
use crate::accounts::Account;
use crate::constants::BANK_NAME;
use crate::errors::{Error, Result};
use crate::utils::time_utils::format_report_timestamp;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn render_csv(data: &ReportData) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(UTF8_BOM.to_vec());

    let title = format!("RELATÓRIO FINANCEIRO - {}", BANK_NAME.to_uppercase());
    let generated_at = format_report_timestamp(&data.generated_at);
    let total = format_brl(data.total_balance()?);
    let limit = format_brl(Account::withdrawal_limit());

    let mut rows: Vec<Vec<String>> = vec![
        vec![title],
        vec![String::new()],
        vec!["Titular:".into(), data.holder_name.clone()],
        vec!["Data:".into(), generated_at],
        vec!["Saldo Total:".into(), total],
        vec!["Limite de Saque:".into(), limit],
        vec![String::new()],
        vec!["CONTA POUPANÇA".into()],
        vec![
            "Número da Conta".into(),
            "Saldo".into(),
            "Taxa de Rendimento".into(),
        ],
    ];
    rows.extend(data.accounts.iter().map(|account| {
        vec![
            account.account_number.clone(),
            format_brl(account.balance),
            format_rate(account.interest_rate),
        ]
    }));
    rows.push(vec![String::new()]);

    if !data.goal_boxes.is_empty() {
        rows.push(vec!["CAIXINHAS".into()]);
        rows.push(vec!["Tipo".into(), "Número".into(), "Saldo".into()]);
        rows.extend(data.goal_boxes.iter().map(|goal_box| {
            vec![
                goal_box.category.label().to_string(),
                goal_box.account_number.clone(),
                format_brl(goal_box.balance),
            ]
        }));
    }

    for row in &rows {
        writer
            .write_record(row)
            .map_err(|e| Error::Unexpected(format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to finish CSV report: {e}")))
}
