use crate::hotel::domain::format_cents;

use super::views::RevenueReport;
use super::ReportError;

/// Render the revenue report as CSV: one row per day with per-method
/// columns, closed by a totals row.
pub fn revenue_csv(report: &RevenueReport) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["date", "cash", "card", "online", "total"])
        .map_err(|err| ReportError::Csv(err.to_string()))?;

    for day in &report.daily {
        writer
            .write_record([
                day.date.to_string(),
                format_cents(day.cash_cents),
                format_cents(day.card_cents),
                format_cents(day.online_cents),
                format_cents(day.total_cents),
            ])
            .map_err(|err| ReportError::Csv(err.to_string()))?;
    }

    let mut totals = vec!["total".to_string()];
    for method in &report.by_method {
        totals.push(format_cents(method.amount_cents));
    }
    totals.push(format_cents(report.total_collected_cents));
    writer
        .write_record(&totals)
        .map_err(|err| ReportError::Csv(err.to_string()))?;

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Csv(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ReportError::Csv(err.to_string()))
}
