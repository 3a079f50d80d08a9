//! Per-column filters and the filter panel editing state.

use crate::{ClinicError, ClinicResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A filterable column of the directory table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterColumn {
    ClinicId,
    ClinicName,
    DoctorName,
    Address,
    Phone,
    Services,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 6] = [
        FilterColumn::ClinicId,
        FilterColumn::ClinicName,
        FilterColumn::DoctorName,
        FilterColumn::Address,
        FilterColumn::Phone,
        FilterColumn::Services,
    ];

    /// Stable key, matching the filter names the directory has always used.
    pub fn key(self) -> &'static str {
        match self {
            FilterColumn::ClinicId => "clinicId",
            FilterColumn::ClinicName => "clinicName",
            FilterColumn::DoctorName => "doctorName",
            FilterColumn::Address => "address",
            FilterColumn::Phone => "phone",
            FilterColumn::Services => "services",
        }
    }

    /// Table header text.
    pub fn header(self) -> &'static str {
        match self {
            FilterColumn::ClinicId => "Clinic ID",
            FilterColumn::ClinicName => "Clinic Name",
            FilterColumn::DoctorName => "Doctor Name",
            FilterColumn::Address => "Clinic Address",
            FilterColumn::Phone => "Phone Number",
            FilterColumn::Services => "Services",
        }
    }

    /// Prefix of an active filter pill, e.g. `Doc: smith`.
    pub fn short_label(self) -> &'static str {
        match self {
            FilterColumn::ClinicId => "ID",
            FilterColumn::ClinicName => "Name",
            FilterColumn::DoctorName => "Doc",
            FilterColumn::Address => "Addr",
            FilterColumn::Phone => "Ph",
            FilterColumn::Services => "Svc",
        }
    }

    fn summary_label(self) -> &'static str {
        match self {
            FilterColumn::Phone => "Phone",
            other => other.header(),
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterColumn {
    type Err = ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        let column = match normalised.as_str() {
            "clinicid" | "id" | "code" => FilterColumn::ClinicId,
            "clinicname" | "name" => FilterColumn::ClinicName,
            "doctorname" | "doctor" => FilterColumn::DoctorName,
            "address" | "clinicaddress" => FilterColumn::Address,
            "phone" | "phonenumber" => FilterColumn::Phone,
            "services" | "service" => FilterColumn::Services,
            _ => {
                return Err(ClinicError::InvalidInput(format!(
                    "unknown filter column: {s}"
                )))
            }
        };
        Ok(column)
    }
}

/// Substring patterns keyed by column. A column with no entry is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<FilterColumn, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's pattern. The value is trimmed; an empty value clears the column.
    pub fn set(&mut self, column: FilterColumn, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.values.remove(&column);
        } else {
            self.values.insert(column, value.to_owned());
        }
    }

    pub fn clear(&mut self, column: FilterColumn) {
        self.values.remove(&column);
    }

    pub fn clear_all(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, column: FilterColumn) -> Option<&str> {
        self.values.get(&column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Active filters in column order.
    pub fn active(&self) -> impl Iterator<Item = (FilterColumn, &str)> {
        self.values.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// One-line description such as `Clinic ID: C1; Phone: 555`.
    pub fn summary(&self) -> String {
        self.active()
            .map(|(column, value)| format!("{}: {}", column.summary_label(), value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Label for a column's filter pill.
    pub fn pill_label(&self, column: FilterColumn) -> String {
        match self.get(column) {
            Some(value) => format!("{}: {}", column.short_label(), value),
            None => format!("+ {}", column.header()),
        }
    }
}

/// Editing state of the filter pill row. At most one column is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterPanel {
    #[default]
    Closed,
    Editing { column: FilterColumn, draft: String },
}

impl FilterPanel {
    /// Open `column` for editing, seeding the draft from its current value.
    ///
    /// Opening the column that is already open closes it instead.
    pub fn toggle(&mut self, column: FilterColumn, filters: &FilterSet) {
        *self = match &*self {
            FilterPanel::Editing { column: open, .. } if *open == column => FilterPanel::Closed,
            _ => FilterPanel::Editing {
                column,
                draft: filters.get(column).unwrap_or_default().to_owned(),
            },
        };
    }

    /// Replace the draft text. Ignored when the panel is closed.
    pub fn edit(&mut self, text: impl Into<String>) {
        if let FilterPanel::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Write the trimmed draft into `filters` and close. Returns the applied column.
    pub fn apply(&mut self, filters: &mut FilterSet) -> Option<FilterColumn> {
        match std::mem::take(self) {
            FilterPanel::Editing { column, draft } => {
                filters.set(column, draft);
                Some(column)
            }
            FilterPanel::Closed => None,
        }
    }

    /// Clear the open column's filter and close. Returns the cleared column.
    pub fn clear(&mut self, filters: &mut FilterSet) -> Option<FilterColumn> {
        match std::mem::take(self) {
            FilterPanel::Editing { column, .. } => {
                filters.clear(column);
                Some(column)
            }
            FilterPanel::Closed => None,
        }
    }

    /// Close without touching the filters.
    pub fn close(&mut self) {
        *self = FilterPanel::Closed;
    }

    pub fn open_column(&self) -> Option<FilterColumn> {
        match self {
            FilterPanel::Editing { column, .. } => Some(*column),
            FilterPanel::Closed => None,
        }
    }
}
