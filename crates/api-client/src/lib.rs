//! # Clinic API Client
//!
//! HTTP implementation of [`clinic_core::ClinicBackend`] for the clinics REST API.
//!
//! Handles:
//! - URL construction under `/api/clinics`, with percent-encoded path segments
//! - JSON request and response bodies
//! - Mapping transport failures and non-2xx responses onto [`clinic_core::ClinicError`]

#![warn(rust_2018_idioms)]

mod client;

pub use client::HttpClinicBackend;
