//! The directory store: the clinic list currently on screen.
//!
//! Contents are always exactly the result of the last successful load or search. Failed
//! operations leave them untouched.

use crate::backend::{ClinicBackend, ClinicQuery};
use crate::constants::LOAD_ERROR_MESSAGE;
use crate::model::{ClinicRecord, NewClinic};
use crate::search::SearchQuery;
use crate::ClinicResult;

pub struct DirectoryStore<B> {
    backend: B,
    clinics: Vec<ClinicRecord>,
    error: Option<String>,
}

impl<B: ClinicBackend> DirectoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clinics: Vec::new(),
            error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clinics(&self) -> &[ClinicRecord] {
        &self.clinics
    }

    /// Error banner text from the last failed load, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Fetch the full clinic list.
    ///
    /// On success the contents are replaced and the banner cleared. On failure the previous
    /// contents stay and the banner is set; the error is also returned.
    pub async fn load(&mut self) -> ClinicResult<()> {
        match self.backend.fetch_clinics(&ClinicQuery::default()).await {
            Ok(clinics) => {
                tracing::info!("loaded {} clinics", clinics.len());
                self.clinics = clinics;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load clinics: {e}");
                self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
                Err(e)
            }
        }
    }

    /// Re-issue [`load`](Self::load) after a failure.
    pub async fn retry(&mut self) -> ClinicResult<()> {
        self.load().await
    }

    /// Replace the contents unconditionally.
    pub fn replace(&mut self, clinics: Vec<ClinicRecord>) {
        self.clinics = clinics;
    }

    /// Register a clinic, then reload.
    ///
    /// Returns the created record once the backend accepts it; the caller should close its
    /// creation dialog. A failed follow-up reload only sets the banner. On rejection the
    /// backend's message is returned and nothing local changes.
    pub async fn create(&mut self, clinic: &NewClinic) -> ClinicResult<ClinicRecord> {
        let created = self.backend.add_clinic(clinic).await.map_err(|e| {
            tracing::warn!("failed to add clinic {}: {e}", clinic.clinic_code);
            e
        })?;
        tracing::info!("added clinic {}", clinic.clinic_code);

        // Failure is already reflected in the banner.
        let _ = self.load().await;
        Ok(created)
    }

    /// Run a backend search and replace the contents with its result.
    ///
    /// Returns the number of clinics found. Failures leave the store untouched.
    pub async fn search(&mut self, query: &SearchQuery) -> ClinicResult<usize> {
        let clinics = query.run(&self.backend).await?;
        tracing::info!("search returned {} clinics", clinics.len());
        let found = clinics.len();
        self.replace(clinics);
        Ok(found)
    }
}
