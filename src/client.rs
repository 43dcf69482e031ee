use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use std::env;
use std::pin::Pin;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::observability;
use crate::sse::process_sse;
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini generative language API.
#[derive(Debug, Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable. The key is resolved exactly once, here: there
    /// is no runtime reconfiguration or retry-to-create.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// The timeout applies to each HTTP request and is the only hook for
    /// bounding a slow remote call; there is no per-fragment deadline.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var("GEMINI_API_KEY").map_err(|_| {
                Error::authentication(
                    "API key not provided and GEMINI_API_KEY environment variable not set",
                )
            })?,
        };

        if let Some(base_url) = &base_url {
            url::Url::parse(base_url)?;
        }

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
        })
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key).expect("API key should be valid"),
        );
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // The error envelope: {"error": {"code": 400, "message": "...",
        // "status": "INVALID_ARGUMENT"}}
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let error_status = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.status.clone());
        let error_message = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(error_message),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_status, error_message),
        }
    }

    fn map_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Generate a complete, non-streaming reply.
    pub async fn generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}models/{}:generateContent", self.base_url, model);

        observability::CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.map_request_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Generate a reply as a stream of incremental chunks.
    ///
    /// Returns a stream of [`GenerateContentResponse`] chunks that can be
    /// processed as they arrive. The stream ends when the reply is complete;
    /// mid-stream failures surface as `Err` items.
    pub async fn stream_generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>> {
        let url = format!(
            "{}models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        );

        let mut headers = self.default_headers();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        observability::CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.map_request_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        // Get the byte stream from the response
        let stream = response.bytes_stream();

        // Create an SSE processor
        let event_stream = process_sse(stream);

        Ok(Box::pin(event_stream))
    }
}
