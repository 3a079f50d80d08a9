//! Backend search queries.

use crate::backend::{ClinicBackend, ClinicQuery, LookupField};
use crate::model::ClinicRecord;
use crate::{ClinicError, ClinicResult};

/// A server-side search, as submitted from the search dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Free-text search across all fields.
    General(String),
    /// Filtered listing; an empty query lists everything.
    Advanced(ClinicQuery),
    /// Exact-field lookup.
    Specific { field: LookupField, value: String },
    /// Clinics offering any of the named services.
    Services(Vec<String>),
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(csv: &str) -> Vec<String> {
    csv.split(',').filter_map(non_blank).collect()
}

impl SearchQuery {
    /// Build an advanced query from raw dialog fields. `services` is comma-separated.
    pub fn advanced(name: &str, phone: &str, services: &str) -> Self {
        SearchQuery::Advanced(ClinicQuery {
            name: non_blank(name),
            phone: non_blank(phone),
            services: split_list(services),
        })
    }

    /// Run the query against `backend`.
    ///
    /// # Errors
    ///
    /// Blank general terms and blank lookup values are rejected before any request is made.
    /// Backend failures are passed through.
    pub async fn run<B>(&self, backend: &B) -> ClinicResult<Vec<ClinicRecord>>
    where
        B: ClinicBackend + ?Sized,
    {
        match self {
            SearchQuery::General(term) => {
                let term = non_blank(term).ok_or_else(|| {
                    ClinicError::InvalidInput("Please enter a search term".into())
                })?;
                backend.search_clinics(&term).await
            }
            SearchQuery::Advanced(query) => backend.fetch_clinics(query).await,
            SearchQuery::Specific { field, value } => {
                let value = non_blank(value)
                    .ok_or_else(|| ClinicError::InvalidInput("Please enter a value".into()))?;
                backend.lookup(*field, &value).await
            }
            SearchQuery::Services(services) => {
                let services: Vec<String> = services.iter().filter_map(|s| non_blank(s)).collect();
                if services.is_empty() {
                    return Err(ClinicError::InvalidInput(
                        "Please enter at least one service".into(),
                    ));
                }
                backend.search_by_services(&services).await
            }
        }
    }
}
