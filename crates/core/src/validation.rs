//! Creation form validation.
//!
//! The form is validated as a whole: every problem is reported at once, keyed by field, and a
//! [`NewClinic`] payload is only produced when there are none.

use crate::model::{NewClinic, NewService};
use clinic_types::{NonEmptyText, ServicePhone};
use std::collections::BTreeMap;
use std::fmt;

/// A field of the clinic creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    ClinicId,
    Name,
    DoctorName,
    Address,
    Services,
}

impl FormField {
    pub fn key(self) -> &'static str {
        match self {
            FormField::ClinicId => "clinicId",
            FormField::Name => "name",
            FormField::DoctorName => "doctorName",
            FormField::Address => "address",
            FormField::Services => "services",
        }
    }
}

/// Field-keyed error messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.0.insert(field, message.to_owned());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.key(), message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// One editable service row of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub phone: String,
}

impl ServiceDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Raw contents of the clinic creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicForm {
    pub clinic_id: String,
    pub name: String,
    pub doctor_name: String,
    pub address: String,
    pub services: Vec<ServiceDraft>,
}

impl Default for ClinicForm {
    /// A fresh form starts with one empty service row.
    fn default() -> Self {
        Self {
            clinic_id: String::new(),
            name: String::new(),
            doctor_name: String::new(),
            address: String::new(),
            services: vec![ServiceDraft::default()],
        }
    }
}

impl ClinicForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service(&mut self) {
        self.services.push(ServiceDraft::default());
    }

    /// Remove the service row at `index`; out-of-range indices are ignored.
    pub fn remove_service(&mut self, index: usize) {
        if index < self.services.len() {
            self.services.remove(index);
        }
    }

    /// Validate the form and build the create payload.
    ///
    /// # Errors
    ///
    /// Returns every failed check, keyed by field. Services report a single message: a missing
    /// list first, then incomplete rows, then malformed phone numbers.
    pub fn validate(&self) -> Result<NewClinic, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let mut required = |value: &str, field: FormField, message: &str| {
            let text = NonEmptyText::new(value).ok();
            if text.is_none() {
                errors.insert(field, message);
            }
            text
        };

        let clinic_code = required(&self.clinic_id, FormField::ClinicId, "Clinic ID is required");
        let name = required(&self.name, FormField::Name, "Clinic name is required");
        let doctor_name = required(
            &self.doctor_name,
            FormField::DoctorName,
            "Doctor name is required",
        );
        let address = required(&self.address, FormField::Address, "Clinic address is required");

        let services = match self.validate_services() {
            Ok(services) => Some(services),
            Err(message) => {
                errors.insert(FormField::Services, message);
                None
            }
        };

        match (clinic_code, name, doctor_name, address, services) {
            (Some(clinic_code), Some(name), Some(doctor_name), Some(address), Some(services))
                if errors.is_empty() =>
            {
                Ok(NewClinic {
                    name,
                    clinic_code,
                    doctor_name,
                    address,
                    services,
                    phone: None,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_services(&self) -> Result<Vec<NewService>, &'static str> {
        let rows: Vec<(&str, &str)> = self
            .services
            .iter()
            .map(|s| (s.name.trim(), s.phone.trim()))
            .filter(|(name, phone)| !name.is_empty() || !phone.is_empty())
            .collect();

        if rows.is_empty() {
            return Err("At least one service is required");
        }

        let mut services = Vec::with_capacity(rows.len());
        let mut bad_phone = false;
        for (name, phone) in rows {
            let Ok(name) = NonEmptyText::new(name) else {
                return Err("All added services must have both name and phone");
            };
            if phone.is_empty() {
                return Err("All added services must have both name and phone");
            }
            match ServicePhone::new(phone) {
                Ok(phone) => services.push(NewService { name, phone }),
                Err(_) => bad_phone = true,
            }
        }

        if bad_phone {
            return Err("All service phone numbers must be valid (min 10 digits)");
        }
        Ok(services)
    }
}
