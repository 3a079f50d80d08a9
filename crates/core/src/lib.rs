//! # Clinic Core
//!
//! Core logic of the clinic directory.
//!
//! This crate contains the directory state and everything derived from it:
//! - Canonical clinic records, normalised from the backend's loose JSON
//! - The directory store (load / replace / create / search) over a [`ClinicBackend`]
//! - Row projection: flattening, column filters, global search and highlight spans
//! - Phone display formatting and creation form validation
//!
//! **No transport concerns**: the HTTP implementation of [`ClinicBackend`] belongs in
//! `clinic-api-client`; terminal interaction belongs in the binaries.

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod highlight;
pub mod model;
pub mod phone;
pub mod projector;
pub mod search;
pub mod store;
pub mod table;
pub mod validation;
pub mod view;

pub use backend::{ClinicBackend, ClinicQuery, LookupField};
pub use config::DirectoryConfig;
pub use error::{ClinicError, ClinicResult};
pub use filters::{FilterColumn, FilterPanel, FilterSet};
pub use highlight::Span;
pub use model::{ClinicRecord, NewClinic, NewService, ServiceEntry};
pub use projector::{DisplayRow, HighlightedRow};
pub use search::SearchQuery;
pub use store::DirectoryStore;
pub use validation::{ClinicForm, FormField, ServiceDraft, ValidationErrors};
pub use view::DirectoryView;
