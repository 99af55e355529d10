//! REST client for the `/api` backend.

use std::future::Future;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use sis_model::{Entity, ListEnvelope, MutationResponse, PageQuery, SearchEnvelope};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::traits::{RecordWriter, RemoteCollection};

const USER_AGENT_VALUE: &str = concat!("sis-client/", env!("CARGO_PKG_VERSION"));

/// Client for the student information system backend.
///
/// Holds one connection pool and one cookie jar, so a session cookie set by
/// the backend is sent on every later request (including logout).
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_root: String,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    /// Build a client for `base_url` with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// `{base}/api`.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    /// Fetch one page of `E` matching `query`.
    pub async fn search<E: Entity>(&self, query: &PageQuery) -> Result<SearchEnvelope<E>> {
        if query.page_size == 0 {
            return Err(ClientError::InvalidQuery(
                "page size must be greater than zero".to_string(),
            ));
        }

        let url = self.url(&format!("{}/search", E::PATH));
        tracing::debug!(
            entity = E::PATH,
            page = query.page_index,
            page_size = query.page_size,
            search = query.search_term().unwrap_or_default(),
            "GET {}",
            url
        );

        let response = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await?;
        let envelope: SearchEnvelope<E> = read_json(response).await?;

        if envelope.rows.len() > query.page_size {
            return Err(ClientError::Decode(format!(
                "{} rows returned for a page of {}",
                envelope.rows.len(),
                query.page_size
            )));
        }
        Ok(envelope)
    }

    /// Fetch every row of `E`, unpaged (used to fill pickers).
    pub async fn list_all<E: Entity>(&self) -> Result<Vec<E>> {
        let url = self.url(E::PATH);
        tracing::debug!(entity = E::PATH, "GET {}", url);
        let response = self.client.get(&url).send().await?;
        let envelope: ListEnvelope<E> = read_json(response).await?;
        Ok(envelope.rows)
    }

    /// Create a record. Resolves to the server's message.
    pub async fn create<E: Entity>(&self, payload: &E::Create) -> Result<String> {
        let url = self.url(&format!("{}/add", E::PATH));
        tracing::debug!(entity = E::PATH, "POST {}", url);
        self.send_mutation(self.client.post(&url).json(payload)).await
    }

    /// Update a record. Resolves to the server's message.
    pub async fn update<E: Entity>(&self, payload: &E::Update) -> Result<String> {
        let url = self.url(&format!("{}/update", E::PATH));
        tracing::debug!(entity = E::PATH, "PUT {}", url);
        self.send_mutation(self.client.put(&url).json(payload)).await
    }

    /// Delete a record. Resolves to the server's message.
    pub async fn delete<E: Entity>(&self, key: &E::Key) -> Result<String> {
        let url = self.url(&format!("{}/delete", E::PATH));
        tracing::debug!(entity = E::PATH, key = %key, "DELETE {}", url);
        self.send_mutation(self.client.delete(&url).json(key)).await
    }

    /// End the session held in the cookie jar.
    pub async fn logout(&self) -> Result<String> {
        let url = self.url("logout");
        tracing::debug!("POST {}", url);
        self.send_mutation(self.client.post(&url)).await
    }

    async fn send_mutation(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_mutation(status, &body)
    }
}

/// Read a JSON body, mapping non-success statuses to [`ClientError::Status`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Classify a write response.
///
/// A parseable `{success: false}` body is a rejection whatever the status;
/// an unparseable body is a status error on failure and a decode error otherwise.
fn interpret_mutation(status: StatusCode, body: &str) -> Result<String> {
    match serde_json::from_str::<MutationResponse>(body) {
        Ok(response) if !response.success => Err(ClientError::Rejected {
            message: response.message,
        }),
        Ok(response) if status.is_success() => Ok(response.message),
        Ok(_) => Err(ClientError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        }),
        Err(_) if !status.is_success() => Err(ClientError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

impl<E: Entity> RemoteCollection<E> for ApiClient {
    fn search(&self, query: &PageQuery) -> impl Future<Output = Result<SearchEnvelope<E>>> + Send {
        ApiClient::search::<E>(self, query)
    }
}

impl<E: Entity> RecordWriter<E> for ApiClient {
    fn create(&self, payload: &E::Create) -> impl Future<Output = Result<String>> + Send {
        ApiClient::create::<E>(self, payload)
    }

    fn update(&self, payload: &E::Update) -> impl Future<Output = Result<String>> + Send {
        ApiClient::update::<E>(self, payload)
    }

    fn delete(&self, key: &E::Key) -> impl Future<Output = Result<String>> + Send {
        ApiClient::delete::<E>(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_wins_over_status() {
        let result = interpret_mutation(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Student ID already exists."}"#,
        );
        match result {
            Err(ClientError::Rejected { message }) => {
                assert_eq!(message, "Student ID already exists.");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_success_returns_message() {
        let result = interpret_mutation(
            StatusCode::CREATED,
            r#"{"success":true,"message":"Student added."}"#,
        );
        assert_eq!(result.unwrap(), "Student added.");
    }

    #[test]
    fn test_html_error_page_is_status_error() {
        let result = interpret_mutation(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(
            result,
            Err(ClientError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn test_garbage_success_body_is_decode_error() {
        let result = interpret_mutation(StatusCode::OK, "not json");
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_url_joins_api_root() {
        let client = ApiClient::with_base_url("http://localhost:5000/").unwrap();
        assert_eq!(client.api_root(), "http://localhost:5000/api");
        assert_eq!(
            client.url("students/search"),
            "http://localhost:5000/api/students/search"
        );
    }
}
