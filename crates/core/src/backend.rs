//! The backend seam.
//!
//! [`ClinicBackend`] is the contract of the clinics HTTP API. The production implementation
//! lives in `clinic-api-client`; tests substitute in-memory fakes.

use crate::model::{ClinicRecord, NewClinic};
use crate::ClinicResult;
use async_trait::async_trait;

/// Optional filters for `GET /api/clinics`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub services: Vec<String>,
}

impl ClinicQuery {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.services.is_empty()
    }

    /// Query-string pairs in request order; `services` repeats once per entry.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.as_str()));
        }
        if let Some(phone) = &self.phone {
            pairs.push(("phone", phone.as_str()));
        }
        pairs.extend(self.services.iter().map(|s| ("services", s.as_str())));
        pairs
    }
}

/// Single-field lookup endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    ClinicCode,
    DoctorName,
    Address,
    Name,
    Phone,
}

impl LookupField {
    pub fn label(self) -> &'static str {
        match self {
            LookupField::ClinicCode => "clinic code",
            LookupField::DoctorName => "doctor name",
            LookupField::Address => "address",
            LookupField::Name => "name",
            LookupField::Phone => "phone",
        }
    }
}

impl std::str::FromStr for LookupField {
    type Err = crate::ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        let field = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "clinic_code" | "code" | "id" => LookupField::ClinicCode,
            "doctor_name" | "doctor" => LookupField::DoctorName,
            "address" => LookupField::Address,
            "name" => LookupField::Name,
            "phone" => LookupField::Phone,
            _ => {
                return Err(crate::ClinicError::InvalidInput(format!(
                    "unknown lookup field: {s}"
                )))
            }
        };
        Ok(field)
    }
}

#[async_trait]
pub trait ClinicBackend: Send + Sync {
    /// `GET /api/clinics`, optionally filtered.
    async fn fetch_clinics(&self, query: &ClinicQuery) -> ClinicResult<Vec<ClinicRecord>>;

    /// `POST /api/clinics`.
    async fn add_clinic(&self, clinic: &NewClinic) -> ClinicResult<ClinicRecord>;

    /// `GET /api/clinics/search?q=`.
    async fn search_clinics(&self, term: &str) -> ClinicResult<Vec<ClinicRecord>>;

    /// One of the `by-*` single-field lookups.
    async fn lookup(&self, field: LookupField, value: &str) -> ClinicResult<Vec<ClinicRecord>>;

    /// `GET /api/clinics/by-services?services=a&services=b`.
    async fn search_by_services(&self, services: &[String]) -> ClinicResult<Vec<ClinicRecord>>;
}

#[async_trait]
impl<B: ClinicBackend + ?Sized> ClinicBackend for Box<B> {
    async fn fetch_clinics(&self, query: &ClinicQuery) -> ClinicResult<Vec<ClinicRecord>> {
        (**self).fetch_clinics(query).await
    }

    async fn add_clinic(&self, clinic: &NewClinic) -> ClinicResult<ClinicRecord> {
        (**self).add_clinic(clinic).await
    }

    async fn search_clinics(&self, term: &str) -> ClinicResult<Vec<ClinicRecord>> {
        (**self).search_clinics(term).await
    }

    async fn lookup(&self, field: LookupField, value: &str) -> ClinicResult<Vec<ClinicRecord>> {
        (**self).lookup(field, value).await
    }

    async fn search_by_services(&self, services: &[String]) -> ClinicResult<Vec<ClinicRecord>> {
        (**self).search_by_services(services).await
    }
}
