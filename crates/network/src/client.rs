// crates/network/src/client.rs
//! reqwest-backed transport

use crate::error::{NetworkError, NetworkResult};
use crate::transport::{EventStream, StreamRequest, Transport, TransportEvent};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use geoexport_core::ApiError;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout; `None` lets a stalled transfer wait forever
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("geoexport/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// HTTP client for the export service
#[derive(Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    /// Creates a new client with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let mut builder = ReqwestClient::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(NetworkError::Http)?;

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Sends a request, turning non-success statuses into `NetworkError::Api`
async fn send_checked(request: RequestBuilder) -> NetworkResult<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    // The body is best effort; a broken error body still reports the status
    let body = response.bytes().await.unwrap_or_default();
    log::debug!("Request failed with HTTP {}", status.as_u16());

    Err(NetworkError::Api {
        status: status.as_u16(),
        api_error: ApiError::from_body(&body),
    })
}

/// Progress of the body-streaming loop
enum Phase {
    Connect(RequestBuilder),
    Body {
        chunks: BoxStream<'static, reqwest::Result<Bytes>>,
        headers: HeaderMap,
        total: Option<u64>,
        buffer: BytesMut,
    },
    Finished,
}

async fn advance(phase: Phase) -> Option<(NetworkResult<TransportEvent>, Phase)> {
    match phase {
        Phase::Connect(request) => match send_checked(request).await {
            Ok(response) => {
                let headers = response.headers().clone();
                let total = response.content_length();
                let next = Phase::Body {
                    chunks: response.bytes_stream().boxed(),
                    headers: headers.clone(),
                    total,
                    buffer: BytesMut::new(),
                };
                Some((Ok(TransportEvent::Headers(headers)), next))
            }
            Err(e) => Some((Err(e), Phase::Finished)),
        },
        Phase::Body {
            mut chunks,
            headers,
            total,
            mut buffer,
        } => match chunks.next().await {
            Some(Ok(chunk)) => {
                buffer.extend_from_slice(&chunk);
                let event = TransportEvent::Progress {
                    loaded: buffer.len() as u64,
                    total,
                };
                let next = Phase::Body {
                    chunks,
                    headers,
                    total,
                    buffer,
                };
                Some((Ok(event), next))
            }
            Some(Err(e)) => Some((Err(NetworkError::Http(e)), Phase::Finished)),
            None => {
                let event = TransportEvent::Response {
                    body: buffer.freeze(),
                    headers,
                };
                Some((Ok(event), Phase::Finished))
            }
        },
        Phase::Finished => None,
    }
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, url: &str) -> NetworkResult<Bytes> {
        let response = send_checked(self.inner.get(url)).await?;
        response.bytes().await.map_err(NetworkError::Http)
    }

    fn open(&self, request: StreamRequest) -> EventStream {
        let builder = self.inner.get(&request.url).headers(request.headers);
        stream::unfold(Phase::Connect(builder), advance).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("geoexport/"));
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            timeout: Some(Duration::from_secs(10)),
            user_agent: "TestAgent".to_string(),
            max_redirects: 5,
        };

        let client = Client::with_config(config).expect("client builds");
        assert_eq!(client.config().max_redirects, 5);
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exports/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let client = Client::new().expect("client builds");
        let body = client
            .get(&format!("{}/exports/", server.uri()))
            .await
            .expect("request succeeds");
        assert_eq!(body, Bytes::from_static(b"[]"));
    }

    #[tokio::test]
    async fn test_get_maps_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exports/"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"api_error": "no_result_found", "message": "Configure one or more export"}"#,
            ))
            .mount(&server)
            .await;

        let client = Client::new().expect("client builds");
        let err = client
            .get(&format!("{}/exports/", server.uri()))
            .await
            .expect_err("404 is an error");

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.api_error().error.as_deref(), Some("no_result_found"));
    }

    #[tokio::test]
    async fn test_open_emits_headers_progress_then_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exports/7/csv"))
            .and(header("content-type", "text/csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-disposition", "attachment; filename=\"out.csv\"")
                    .set_body_raw(b"id;label\n1;a\n".to_vec(), "text/csv"),
            )
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
        let request =
            StreamRequest::new(format!("{}/exports/7/csv", server.uri())).with_headers(headers);

        let client = Client::new().expect("client builds");
        let events: Vec<_> = client.open(request).collect().await;

        let first = events.first().expect("at least one event");
        match first {
            Ok(TransportEvent::Headers(headers)) => {
                assert!(headers.get(CONTENT_DISPOSITION).is_some());
            }
            other => panic!("expected headers first, got {:?}", other),
        }

        let last = events.last().expect("at least one event");
        match last {
            Ok(TransportEvent::Response { body, headers }) => {
                assert_eq!(body.as_ref(), b"id;label\n1;a\n");
                assert_eq!(
                    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
                    Some("text/csv")
                );
            }
            other => panic!("expected response last, got {:?}", other),
        }

        assert!(events[1..events.len() - 1]
            .iter()
            .all(|e| matches!(e, Ok(TransportEvent::Progress { .. }))));
    }

    #[tokio::test]
    async fn test_open_reports_http_error_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"message": "Not Allowed"}"#))
            .mount(&server)
            .await;

        let client = Client::new().expect("client builds");
        let events: Vec<_> = client
            .open(StreamRequest::new(format!("{}/exports/1/json", server.uri())))
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        let err = events[0].as_ref().expect_err("403 is an error");
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.api_error().message.as_deref(), Some("Not Allowed"));
    }
}
