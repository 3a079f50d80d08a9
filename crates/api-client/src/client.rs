use async_trait::async_trait;
use clinic_core::{
    ClinicBackend, ClinicError, ClinicQuery, ClinicRecord, ClinicResult, DirectoryConfig,
    LookupField, NewClinic,
};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

/// Clinics API client over HTTP.
#[derive(Clone, Debug)]
pub struct HttpClinicBackend {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpClinicBackend {
    /// Create a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the configured endpoint is not a usable base URL, or
    /// `Transport` if the HTTP client cannot be built.
    pub fn new(config: &DirectoryConfig) -> ClinicResult<Self> {
        let endpoint = Url::parse(&config.clinics_endpoint()).map_err(|e| {
            ClinicError::InvalidInput(format!("invalid api base url: {e}"))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ClinicError::InvalidInput(format!(
                "api base url cannot carry paths: {endpoint}"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("clinic-directory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClinicError::Transport(e.to_string()))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The endpoint with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn transport_error(&self, e: reqwest::Error) -> ClinicError {
        if e.is_connect() {
            ClinicError::Transport(format!("could not connect to {}", self.endpoint))
        } else if e.is_timeout() {
            ClinicError::Transport("request timed out".into())
        } else {
            ClinicError::Transport(e.to_string())
        }
    }

    async fn get_list(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> ClinicResult<Vec<ClinicRecord>> {
        tracing::debug!("GET {url} {query:?}");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        read_json(response).await
    }
}

/// Decode a successful response, or turn a non-2xx one into `ClinicError::Server`.
///
/// The error message is the response body, or `API Error: <status text>` when the body is
/// empty.
async fn read_json<T: DeserializeOwned>(response: Response) -> ClinicResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!(
                "API Error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        } else {
            body
        };
        tracing::warn!("backend returned {status}: {message}");
        return Err(ClinicError::Server {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClinicError::Decode(e.to_string()))
}

#[async_trait]
impl ClinicBackend for HttpClinicBackend {
    async fn fetch_clinics(&self, query: &ClinicQuery) -> ClinicResult<Vec<ClinicRecord>> {
        self.get_list(self.url(&[]), &query.pairs()).await
    }

    async fn add_clinic(&self, clinic: &NewClinic) -> ClinicResult<ClinicRecord> {
        let url = self.url(&[]);
        tracing::debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(clinic)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        read_json(response).await
    }

    async fn search_clinics(&self, term: &str) -> ClinicResult<Vec<ClinicRecord>> {
        self.get_list(self.url(&["search"]), &[("q", term)]).await
    }

    async fn lookup(&self, field: LookupField, value: &str) -> ClinicResult<Vec<ClinicRecord>> {
        match field {
            LookupField::ClinicCode => {
                self.get_list(self.url(&["by-clinic-code", value]), &[]).await
            }
            LookupField::DoctorName => {
                self.get_list(self.url(&["by-doctor-name", value]), &[]).await
            }
            LookupField::Name => self.get_list(self.url(&["by-name", value]), &[]).await,
            LookupField::Phone => self.get_list(self.url(&["by-phone", value]), &[]).await,
            LookupField::Address => {
                self.get_list(self.url(&["by-address"]), &[("address", value)])
                    .await
            }
        }
    }

    async fn search_by_services(&self, services: &[String]) -> ClinicResult<Vec<ClinicRecord>> {
        let query: Vec<(&str, &str)> = services
            .iter()
            .map(|s| ("services", s.as_str()))
            .collect();
        self.get_list(self.url(&["by-services"]), &query).await
    }
}
