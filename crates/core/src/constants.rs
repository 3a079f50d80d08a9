//! Constants used throughout the clinic directory core crate.

/// Backend origin used when `CLINIC_API_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://clinic-details-backend-5wsv.vercel.app";

/// Environment variable holding the backend origin.
pub const API_URL_ENV: &str = "CLINIC_API_URL";

/// Path of the clinics collection on the backend.
pub const CLINICS_PATH: &str = "/api/clinics";

/// Rendered in place of a missing field value.
pub const PLACEHOLDER: &str = "-";

/// Row-key stand-in for a clinic without a code.
pub const UNKNOWN_CODE: &str = "unknown";

/// Error banner shown when the clinic list cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load clinics. Please ensure backend is running.";
