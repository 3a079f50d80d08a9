//! Directory runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the backend client.
//! Nothing below the binaries reads process-wide environment variables.

use std::cell::Cell;
use url::Url;

use crate::constants::{CLINICS_PATH, DEFAULT_API_BASE_URL};
use crate::{ClinicError, ClinicResult};

/// Directory configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryConfig {
    api_base_url: String,
}

impl DirectoryConfig {
    /// Create a new `DirectoryConfig`.
    ///
    /// The base URL must parse cleanly, use `http` or `https` and have a host. A trailing slash
    /// is removed so endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty, unparseable or non-http(s) URL, for one without a
    /// host or carrying a query or fragment, and for input the parser only accepts after
    /// repairing it (backslashes, stray whitespace).
    pub fn new(api_base_url: impl AsRef<str>) -> ClinicResult<Self> {
        let trimmed = api_base_url.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClinicError::InvalidInput(
                "api base url cannot be empty".into(),
            ));
        }

        let violation = Cell::new(None);
        let parsed = Url::options()
            .syntax_violation_callback(Some(&|v| violation.set(Some(v))))
            .parse(trimmed)
            .map_err(|e| {
                ClinicError::InvalidInput(format!("invalid api base url {trimmed}: {e}"))
            })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClinicError::InvalidInput(format!(
                "api base url must start with http:// or https:// (got {trimmed})"
            )));
        }
        if let Some(v) = violation.get() {
            return Err(ClinicError::InvalidInput(format!(
                "invalid api base url {trimmed}: {}",
                v.description()
            )));
        }
        match parsed.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => {
                return Err(ClinicError::InvalidInput(format!(
                    "api base url has no valid host: {trimmed}"
                )))
            }
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ClinicError::InvalidInput(format!(
                "api base url cannot carry a query or fragment: {trimmed}"
            )));
        }

        Ok(Self {
            api_base_url: trimmed.to_owned(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Full URL of the clinics collection, e.g. `https://host/api/clinics`.
    pub fn clinics_endpoint(&self) -> String {
        format!("{}{}", self.api_base_url, CLINICS_PATH)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

/// Resolve the backend origin from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, the default origin is used.
pub fn api_base_url_from_env_value(value: Option<String>) -> ClinicResult<DirectoryConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(url) => DirectoryConfig::new(url),
        None => Ok(DirectoryConfig::default()),
    }
}
