//! Clinic records and the boundary normalization from backend JSON.
//!
//! The backend is not consistent about naming: a clinic code may arrive as `clinic_code` or
//! `clinicId` (string or number), the doctor as `doctor_name` or `doctorName`, and services as
//! plain strings or `{name, phone}` objects. Everything is folded into one canonical
//! [`ClinicRecord`] here so the rest of the crate never sees wire variance.

use clinic_types::{NonEmptyText, ServicePhone};
use serde::{Deserialize, Serialize};

/// A named service offered by a clinic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            name: name.into(),
            phone,
        }
    }
}

/// A clinic as returned by the backend, in canonical shape.
///
/// `phone` is the clinic-level number, used only when a service has none of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireClinic")]
pub struct ClinicRecord {
    #[serde(rename = "clinic_code")]
    pub code: String,
    pub name: String,
    pub doctor_name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub services: Vec<ServiceEntry>,
}

/// JSON scalar accepted where the backend is loose about strings vs numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireService {
    Name(String),
    Entry {
        #[serde(default)]
        name: Option<Scalar>,
        #[serde(default)]
        phone: Option<Scalar>,
    },
}

#[derive(Deserialize)]
struct WireClinic {
    #[serde(default)]
    clinic_code: Option<Scalar>,
    #[serde(default, rename = "clinicId")]
    clinic_id: Option<Scalar>,
    #[serde(default)]
    name: Option<Scalar>,
    #[serde(default)]
    doctor_name: Option<Scalar>,
    #[serde(default, rename = "doctorName")]
    doctor_name_camel: Option<Scalar>,
    #[serde(default)]
    address: Option<Scalar>,
    #[serde(default)]
    phone: Option<Scalar>,
    #[serde(default)]
    services: Option<Vec<WireService>>,
}

/// Non-empty text of an optional scalar.
fn text(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_text).filter(|s| !s.is_empty())
}

impl From<WireService> for ServiceEntry {
    fn from(wire: WireService) -> Self {
        match wire {
            WireService::Name(name) => ServiceEntry { name, phone: None },
            WireService::Entry { name, phone } => ServiceEntry {
                name: text(name).unwrap_or_default(),
                phone: text(phone),
            },
        }
    }
}

impl From<WireClinic> for ClinicRecord {
    fn from(wire: WireClinic) -> Self {
        ClinicRecord {
            code: text(wire.clinic_code)
                .or_else(|| text(wire.clinic_id))
                .unwrap_or_default(),
            name: text(wire.name).unwrap_or_default(),
            doctor_name: text(wire.doctor_name)
                .or_else(|| text(wire.doctor_name_camel))
                .unwrap_or_default(),
            address: text(wire.address).unwrap_or_default(),
            phone: text(wire.phone),
            services: wire
                .services
                .unwrap_or_default()
                .into_iter()
                .map(ServiceEntry::from)
                .collect(),
        }
    }
}

/// A service in a create request. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewService {
    pub name: NonEmptyText,
    pub phone: ServicePhone,
}

/// Body of `POST /api/clinics`.
///
/// Only produced by the creation form validator, so a value of this type is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClinic {
    pub name: NonEmptyText,
    pub clinic_code: NonEmptyText,
    pub doctor_name: NonEmptyText,
    pub address: NonEmptyText,
    pub services: Vec<NewService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<ServicePhone>,
}
