use catalog::{CatalogError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Connection settings for the TMDB API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key, attached to every request as the `api_key` query parameter
    pub api_key: String,
    pub base_url: String,
    /// Optional `language` parameter (e.g. "pt-BR")
    pub language: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "TMDB API key cannot be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CatalogError::InvalidConfig(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// HTTP client for the TMDB v3 API.
///
/// No timeout or retry is configured beyond reqwest's defaults.
pub struct TmdbClient {
    client: Client,
    config: ClientConfig,
}

impl TmdbClient {
    /// Create a client with a fresh reqwest `Client`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| {
                CatalogError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;
        Self::with_client(client, config)
    }

    /// Create a client reusing an existing reqwest `Client`.
    pub fn with_client(client: Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Query parameters shared by every request, followed by `extra`.
    pub(crate) fn params(&self, extra: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
        let mut params = vec![("api_key", self.config.api_key.clone())];
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        params.extend(extra.iter().map(|(name, value)| (*name, value.to_string())));
        params
    }

    /// GET `path` with the shared parameters plus `extra`, decoding JSON.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&'static str, &str)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!(path, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&self.params(extra))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url().to_string()))?;

        decode_body(status, &body)
            .inspect_err(|err| warn!(path, error = %err, "TMDB request failed"))
    }
}

/// TMDB's error body: `{"status_code": 7, "status_message": "..."}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status_message: String,
}

/// Turn a status code and body into a decoded value or a `CatalogError`.
pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|err| err.status_message)
            .unwrap_or_else(|_| body.to_string());
        return Err(CatalogError::Upstream { status, message });
    }

    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| CatalogError::Decode {
        path: e.path().to_string(),
        reason: e.into_inner().to_string(),
    })
}
