//! Printable HTML statement and the single-account summary fragment.

use std::fmt::Write;

use super::money::{format_brl, format_rate};
use super::reports_model::ReportData;
use crate::accounts::Account;
use crate::constants::BANK_NAME;
use crate::errors::Result;
use crate::utils::time_utils::format_report_timestamp;

const STYLE: &str = "\
body{font-family:sans-serif;margin:20px;font-size:13px}\
.container{max-width:900px;margin:0 auto}\
h1,h2{color:#1976d2}\
table{width:100%;border-collapse:collapse;margin:10px 0 15px}\
th,td{border:1px solid #ddd;padding:8px 10px;text-align:left}\
th{background:#1976d2;color:#fff}\
@media print{.no-print{display:none}}";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Full standalone document with a print button.
pub fn render_html(data: &ReportData) -> Result<String> {
    let total = format_brl(data.total_balance()?);
    let mut html = String::with_capacity(4096);
    let bank = escape_html(BANK_NAME);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Relatório Financeiro - {bank}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<div class=\"container\">\n<h1>Relatório Financeiro</h1>\n\
         <p class=\"subtitle\">{bank} - Sistema de Gestão Financeira</p>\n\
         <button onclick=\"window.print()\" class=\"no-print\">Imprimir / Salvar PDF</button>\n\
         <div class=\"info-box\">\n\
         <p><strong>Titular:</strong> {holder}</p>\n\
         <p><strong>Data de Geração:</strong> {date}</p>\n\
         <p><strong>Saldo Total:</strong> {total}</p>\n\
         <p><strong>Limite de Saque:</strong> {limit}</p>\n</div>\n",
        holder = escape_html(&data.holder_name),
        date = format_report_timestamp(&data.generated_at),
        limit = format_brl(Account::withdrawal_limit()),
    );

    html.push_str(
        "<div class=\"section\">\n<h2>Conta Poupança</h2>\n<table>\n\
         <tr><th>Número da Conta</th><th>Saldo</th><th>Taxa de Rendimento</th></tr>\n",
    );
    for account in &data.accounts {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&account.account_number),
            format_brl(account.balance),
            format_rate(account.interest_rate),
        );
    }
    html.push_str("</table>\n</div>\n");

    if !data.goal_boxes.is_empty() {
        html.push_str(
            "<div class=\"section\">\n<h2>Caixinhas</h2>\n<table>\n\
             <tr><th>Tipo</th><th>Número</th><th>Saldo</th></tr>\n",
        );
        for goal_box in &data.goal_boxes {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(goal_box.category.label()),
                escape_html(&goal_box.account_number),
                format_brl(goal_box.balance),
            );
        }
        html.push_str("</table>\n</div>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    Ok(html)
}

/// Summary table for one account, meant to be embedded in a page.
pub fn render_account_summary(account: &Account) -> String {
    let mut html = String::from("<div class='relatorio'><h3>Relatório da Conta</h3><table>");
    let mut row = |label: &str, value: &str| {
        let _ = write!(
            html,
            "<tr><td><strong>{label}:</strong></td><td>{value}</td></tr>"
        );
    };
    row("Tipo", account.kind.type_tag());
    row("Número", &escape_html(&account.account_number));
    row("Titular", &escape_html(&account.owner));
    row("Saldo", &format_brl(account.balance()));
    row("Tarifa", &format_brl(account.calculate_fee()));
    if let Some(rate) = account.kind.interest_rate() {
        row("Taxa Rendimento", &format_rate(rate));
    }
    html.push_str("</table></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountKind, AccountSummary, GoalBoxSummary};
    use crate::goals::GoalCategory;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn report() -> ReportData {
        ReportData {
            holder_name: "<script>alert('x')</script>".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2025, 3, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            accounts: vec![AccountSummary {
                account_number: "123456-7".to_string(),
                owner: "x".to_string(),
                balance: dec!(10),
                account_type: "ContaPoupanca".to_string(),
                interest_rate: dec!(0.5),
            }],
            goal_boxes: vec![GoalBoxSummary {
                account_number: "EMERG-001".to_string(),
                owner: "x".to_string(),
                balance: dec!(2),
                category: GoalCategory::EmergencyFund,
            }],
        }
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn document_escapes_holder_and_lists_sections() {
        let html = render_html(&report()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("05/03/2025 09:00:00"));
        assert!(html.contains("<td>123456-7</td><td>R$ 10,00</td><td>0.5%</td>"));
        assert!(html.contains("<td>Reserva de Emergência</td><td>EMERG-001</td><td>R$ 2,00</td>"));
        assert!(html.contains("R$ 12,00"));
    }

    #[test]
    fn total_out_of_range_is_an_error() {
        let mut data = report();
        data.accounts[0].balance = rust_decimal::Decimal::MAX;
        let err = render_html(&data).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Account(crate::accounts::AccountError::BalanceOverflow(_))
        ));
    }

    #[test]
    fn summary_shows_rate_only_for_interest_bearing_accounts() {
        let savings = Account::restore("123456-7", "Ana & Bia", dec!(1234.5), AccountKind::savings())
            .unwrap();
        let html = render_account_summary(&savings);
        assert!(html.contains("<td>ContaPoupanca</td>"));
        assert!(html.contains("Ana &amp; Bia"));
        assert!(html.contains("R$ 1.234,50"));
        assert!(html.contains("Taxa Rendimento"));

        let checking = Account::new("111111-1", "Ana", AccountKind::Checking);
        assert!(!render_account_summary(&checking).contains("Taxa Rendimento"));
    }
}
