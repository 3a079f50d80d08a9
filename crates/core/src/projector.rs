//! Row projection: clinics to displayed rows.
//!
//! A clinic is expanded into one [`DisplayRow`] per service (or a single placeholder row when it
//! has none), rows are filtered by the active [`FilterSet`] and global search term, and the
//! surviving rows can be annotated with highlight spans. Projection is pure and order-preserving.

use crate::constants::{PLACEHOLDER, UNKNOWN_CODE};
use crate::filters::{FilterColumn, FilterSet};
use crate::highlight::{fuzzy_digit_pattern, highlight, literal_pattern, Span};
use crate::model::ClinicRecord;
use crate::phone::{digits_only, format_phone};

/// One rendered table row: a clinic paired with one of its services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// `<code>_svc_<index>`, or `<code>_nosvc` for a clinic without services.
    pub key: String,
    pub code: String,
    pub name: String,
    pub doctor_name: String,
    pub address: String,
    /// `None` on the placeholder row of a clinic without services.
    pub service: Option<String>,
    /// Service phone, falling back to the clinic phone.
    pub phone: Option<String>,
}

impl DisplayRow {
    /// Raw value of `column` used for matching; missing values are empty.
    pub fn field(&self, column: FilterColumn) -> &str {
        match column {
            FilterColumn::ClinicId => &self.code,
            FilterColumn::ClinicName => &self.name,
            FilterColumn::DoctorName => &self.doctor_name,
            FilterColumn::Address => &self.address,
            FilterColumn::Phone => self.phone.as_deref().unwrap_or_default(),
            FilterColumn::Services => self.service.as_deref().unwrap_or_default(),
        }
    }

    /// Value of `column` as shown to the user.
    pub fn display(&self, column: FilterColumn) -> String {
        match column {
            FilterColumn::Phone => match self.phone.as_deref().map(format_phone) {
                Some(formatted) if !formatted.is_empty() => formatted,
                _ => PLACEHOLDER.to_owned(),
            },
            other => {
                let value = self.field(other);
                if value.is_empty() {
                    PLACEHOLDER.to_owned()
                } else {
                    value.to_owned()
                }
            }
        }
    }
}

/// Expand clinics into rows, one per service, preserving clinic then service order.
pub fn flatten(clinics: &[ClinicRecord]) -> Vec<DisplayRow> {
    let mut rows = Vec::with_capacity(clinics.len());
    for clinic in clinics {
        let key_base = if clinic.code.is_empty() {
            UNKNOWN_CODE
        } else {
            clinic.code.as_str()
        };

        let row = |key: String, service: Option<String>, phone: Option<String>| DisplayRow {
            key,
            code: clinic.code.clone(),
            name: clinic.name.clone(),
            doctor_name: clinic.doctor_name.clone(),
            address: clinic.address.clone(),
            service,
            phone,
        };

        if clinic.services.is_empty() {
            rows.push(row(
                format!("{key_base}_nosvc"),
                None,
                clinic.phone.clone(),
            ));
            continue;
        }

        for (idx, service) in clinic.services.iter().enumerate() {
            let name = Some(service.name.clone()).filter(|n| !n.is_empty());
            let phone = service.phone.clone().or_else(|| clinic.phone.clone());
            rows.push(row(format!("{key_base}_svc_{idx}"), name, phone));
        }
    }
    rows
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Whether `row` satisfies one column filter.
///
/// Phone filters compare digit-only forms, so punctuation never blocks a match. A phone filter
/// without any digits falls back to a plain substring test.
fn column_matches(row: &DisplayRow, column: FilterColumn, pattern: &str) -> bool {
    if column == FilterColumn::Phone {
        let wanted = digits_only(pattern);
        if !wanted.is_empty() {
            return digits_only(row.field(column)).contains(&wanted);
        }
    }
    contains_ignore_case(row.field(column), &pattern.to_lowercase())
}

fn global_matches(row: &DisplayRow, term: &str) -> bool {
    let lower = term.to_lowercase();
    let text_hit = [
        FilterColumn::ClinicId,
        FilterColumn::ClinicName,
        FilterColumn::DoctorName,
        FilterColumn::Address,
        FilterColumn::Services,
    ]
    .into_iter()
    .any(|column| contains_ignore_case(row.field(column), &lower));

    if text_hit {
        return true;
    }

    let digits = digits_only(term);
    !digits.is_empty() && digits_only(row.field(FilterColumn::Phone)).contains(&digits)
}

/// Whether `row` passes every active filter and the global term.
pub fn row_matches(row: &DisplayRow, filters: &FilterSet, term: &str) -> bool {
    if !filters
        .active()
        .all(|(column, pattern)| column_matches(row, column, pattern))
    {
        return false;
    }

    let term = term.trim();
    term.is_empty() || global_matches(row, term)
}

/// Flatten and filter in one pass. Empty filters and term return every row.
pub fn project(clinics: &[ClinicRecord], filters: &FilterSet, term: &str) -> Vec<DisplayRow> {
    flatten(clinics)
        .into_iter()
        .filter(|row| row_matches(row, filters, term))
        .collect()
}

/// A row ready for rendering: one span sequence per column, in [`FilterColumn::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedRow {
    pub key: String,
    pub cells: Vec<(FilterColumn, Vec<Span>)>,
}

impl HighlightedRow {
    pub fn cell(&self, column: FilterColumn) -> &[Span] {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, spans)| spans.as_slice())
            .unwrap_or_default()
    }
}

/// Highlight patterns for one column: the global term, the column filter, and for phones the
/// fuzzy-digit forms of both.
fn column_patterns(column: FilterColumn, filters: &FilterSet, term: &str) -> Vec<String> {
    let sources: Vec<&str> = [Some(term), filters.get(column)]
        .into_iter()
        .flatten()
        .collect();

    let mut patterns: Vec<String> = sources.iter().filter_map(|s| literal_pattern(s)).collect();
    if column == FilterColumn::Phone {
        patterns.extend(sources.iter().filter_map(|s| fuzzy_digit_pattern(s)));
    }
    patterns
}

pub fn highlight_row(row: &DisplayRow, filters: &FilterSet, term: &str) -> HighlightedRow {
    let cells = FilterColumn::ALL
        .into_iter()
        .map(|column| {
            let patterns = column_patterns(column, filters, term);
            (column, highlight(&row.display(column), &patterns))
        })
        .collect();

    HighlightedRow {
        key: row.key.clone(),
        cells,
    }
}
