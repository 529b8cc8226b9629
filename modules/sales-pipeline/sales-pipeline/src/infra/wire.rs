//! Scalar conventions of the ERP tables.

use erp_gateway::GatewayRecord;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub(crate) const ACTIVE: &str = "S";
pub(crate) const INACTIVE: &str = "N";

/// Criterion shared by every list query.
pub(crate) const ONLY_ACTIVE: &str = "ATIVO = 'S'";

const WIRE_DATE: &[BorrowedFormatItem<'static>] = format_description!("[day]/[month]/[year]");

/// `DD/MM/YYYY`, through the same description [`parse_date`] reads with.
pub(crate) fn format_date(date: Date) -> String {
    // A calendar date carries every component the description needs.
    date.format(WIRE_DATE).unwrap_or_else(|e| {
        tracing::warn!(%date, error = %e, "date formatting failed");
        String::new()
    })
}

/// Parse `DD/MM/YYYY`; blank or unparsable values become `None`.
pub(crate) fn parse_date(record: &GatewayRecord, field: &str) -> Option<Date> {
    let raw = record.get(field)?.trim();
    if raw.is_empty() {
        return None;
    }
    // Some tables return a time part ("07/03/2025 00:00:00").
    let day_part = raw.split_whitespace().next().unwrap_or(raw);
    match Date::parse(day_part, WIRE_DATE) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(field, value = raw, error = %e, "unparsable date ignored");
            None
        }
    }
}

/// `ATIVO` flag. Only an explicit `"N"` counts as inactive.
pub(crate) fn is_active(record: &GatewayRecord) -> bool {
    record.text("ATIVO").trim() != INACTIVE
}

pub(crate) fn owned(record: &GatewayRecord, field: &str) -> String {
    record.text(field).to_owned()
}

/// Non-blank value or `None`.
pub(crate) fn optional(record: &GatewayRecord, field: &str) -> Option<String> {
    record
        .get(field)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Integer field; blank is 0, garbage is 0 with a warning.
pub(crate) fn parse_int(record: &GatewayRecord, field: &str) -> i32 {
    let raw = record.text(field).trim();
    if raw.is_empty() {
        return 0;
    }
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(field, value = raw, "non-integer value read as 0");
        0
    })
}

/// Decimal field. Accepts a comma decimal separator.
pub(crate) fn parse_decimal(record: &GatewayRecord, field: &str) -> f64 {
    let raw = record.text(field).trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.replace(',', ".").parse().unwrap_or_else(|_| {
        tracing::warn!(field, value = raw, "non-numeric value read as 0");
        0.0
    })
}
