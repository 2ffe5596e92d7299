//! Client layer: the default HTTP notifier shipped with the crate.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ApiKey, Message};
use crate::notify::{BoxError, BoxFuture, Notifier};
use crate::transport::{DispatchStatus, decode_dispatch_json_response, encode_dispatch_request};

const DEFAULT_ENDPOINT: &str = "https://rest.eazysms.com/api/v1/messages";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync + std::fmt::Debug {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        payload: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        payload: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(ApiKey::HEADER, api_key.as_str())
                .json(payload)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`HttpNotifier`].
pub enum DeliveryError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status code returned by the gateway.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway acknowledged the request with an `ERROR` status.
    #[error("gateway error: {status_text:?}")]
    Gateway { status_text: Option<String> },

    /// The dispatch request could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// An endpoint override was not a valid URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[source] url::ParseError),
}

#[derive(Debug, Clone)]
/// Gateway acknowledgement for a dispatched message.
pub struct DispatchAck {
    /// Message id assigned by the gateway, when it reports one.
    pub message_id: Option<String>,
}

#[derive(Debug, Clone)]
/// Builder for [`HttpNotifier`].
///
/// Use this when you need to customize the endpoint, timeout, or user-agent.
pub struct HttpNotifierBuilder {
    api_key: ApiKey,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpNotifierBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent override.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the gateway endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an [`HttpNotifier`].
    ///
    /// Fails with [`DeliveryError::InvalidEndpoint`] when the endpoint
    /// override is not a valid URL.
    pub fn build(self) -> Result<HttpNotifier, DeliveryError> {
        url::Url::parse(&self.endpoint).map_err(DeliveryError::InvalidEndpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| DeliveryError::Transport(Box::new(err)))?;

        Ok(HttpNotifier {
            api_key: self.api_key,
            endpoint: self.endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Debug, Clone)]
/// [`Notifier`] implementation that POSTs dispatch requests to an HTTP
/// gateway, authenticated with an `X-Api-Key` header.
pub struct HttpNotifier {
    api_key: ApiKey,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl HttpNotifier {
    /// Create a notifier using the default endpoint.
    ///
    /// For more customization, use [`HttpNotifier::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a notifier with custom settings.
    pub fn builder(api_key: ApiKey) -> HttpNotifierBuilder {
        HttpNotifierBuilder::new(api_key)
    }

    /// Dispatch one message to the gateway.
    ///
    /// Errors:
    /// - [`DeliveryError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`DeliveryError::Gateway`] when the gateway returns an `ERROR` status,
    /// - [`DeliveryError::Transport`] / [`DeliveryError::Parse`] for
    ///   transport and response-format failures.
    pub async fn dispatch(
        &self,
        message: &Message,
        subject: Option<&str>,
        schedule_date: Option<&str>,
        is_schedule: bool,
    ) -> Result<DispatchAck, DeliveryError> {
        let payload = encode_dispatch_request(message, subject, schedule_date, is_schedule)
            .map_err(DeliveryError::Encode)?;

        let response = self
            .http
            .post_json(&self.endpoint, &self.api_key, &payload)
            .await
            .map_err(DeliveryError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(DeliveryError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let outcome = decode_dispatch_json_response(&response.body)
            .map_err(|err| DeliveryError::Parse(Box::new(err)))?;

        if outcome.status != DispatchStatus::Ok {
            return Err(DeliveryError::Gateway {
                status_text: outcome.status_text,
            });
        }

        Ok(DispatchAck {
            message_id: outcome.message_id,
        })
    }
}

impl Notifier for HttpNotifier {
    fn notify<'a>(
        &'a self,
        message: &'a Message,
        subject: Option<&'a str>,
        schedule_date: Option<&'a str>,
        is_schedule: bool,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            self.dispatch(message, subject, schedule_date, is_schedule)
                .await
                .map(|_| ())
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use crate::domain::{Channel, Recipient, SenderId};
    use crate::notify::{MessageBuilder, NoTemplates};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_api_key: Option<String>,
        last_payload: Option<serde_json::Value>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_api_key: None,
                    last_payload: None,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> (Option<String>, Option<String>, Option<serde_json::Value>) {
            let state = self.state.lock().unwrap();
            (
                state.last_url.clone(),
                state.last_api_key.clone(),
                state.last_payload.clone(),
            )
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            api_key: &'a ApiKey,
            payload: &'a serde_json::Value,
        ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_api_key = Some(api_key.as_str().to_owned());
                    state.last_payload = Some(payload.clone());
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn make_notifier(transport: FakeTransport) -> HttpNotifier {
        HttpNotifier {
            api_key: ApiKey::new("test_key").unwrap(),
            endpoint: "https://example.invalid/api/v1/messages".to_owned(),
            http: Arc::new(transport),
        }
    }

    fn message() -> Message {
        Message::new(
            Some(SenderId::new("ACME").unwrap()),
            vec![Recipient::new("+15551234567").unwrap()],
            None,
            "Hello",
            None,
        )
    }

    #[tokio::test]
    async fn dispatch_posts_payload_and_parses_ack() {
        let transport = FakeTransport::new(200, r#"{"status": "OK", "messageId": "abc123"}"#);
        let notifier = make_notifier(transport.clone());

        let ack = notifier
            .dispatch(&message(), Some("invoice"), None, false)
            .await
            .unwrap();
        assert_eq!(ack.message_id.as_deref(), Some("abc123"));

        let (url, api_key, payload) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/api/v1/messages")
        );
        assert_eq!(api_key.as_deref(), Some("test_key"));
        assert_eq!(
            payload.unwrap(),
            json!({
                "message": {
                    "from": "ACME",
                    "to": ["+15551234567"],
                    "body": "Hello",
                },
                "subject": "invoice",
            })
        );
    }

    #[tokio::test]
    async fn dispatch_maps_gateway_error() {
        let transport =
            FakeTransport::new(200, r#"{"status": "ERROR", "statusText": "sender not enabled"}"#);
        let notifier = make_notifier(transport);

        let err = notifier
            .dispatch(&message(), None, None, false)
            .await
            .unwrap_err();
        match err {
            DeliveryError::Gateway { status_text } => {
                assert_eq!(status_text.as_deref(), Some("sender not enabled"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_maps_non_success_http_status() {
        let transport = FakeTransport::new(500, "oops");
        let notifier = make_notifier(transport);

        let err = notifier
            .dispatch(&message(), None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
    }

    #[tokio::test]
    async fn dispatch_maps_empty_http_body_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let notifier = make_notifier(transport);

        let err = notifier
            .dispatch(&message(), None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn dispatch_maps_invalid_json_to_parse_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let notifier = make_notifier(transport);

        let err = notifier
            .dispatch(&message(), None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Parse(_)));
    }

    #[tokio::test]
    async fn builder_sends_through_http_notifier() {
        let transport = FakeTransport::new(200, r#"{"status": "OK"}"#);
        let notifier = make_notifier(transport.clone());

        MessageBuilder::<()>::new()
            .from(SenderId::new("ACME").unwrap())
            .recipients(vec![Recipient::new("+15551234567").unwrap()])
            .channel(Channel::Sms)
            .text("Hello")
            .schedule(true, Some("2026-09-01T09:00:00Z".to_owned()))
            .send(&NoTemplates, &notifier)
            .await
            .unwrap();

        let (_, _, payload) = transport.last_request();
        assert_eq!(
            payload.unwrap(),
            json!({
                "message": {
                    "from": "ACME",
                    "to": ["+15551234567"],
                    "allowedChannels": ["sms"],
                    "body": "Hello",
                },
                "scheduleDate": "2026-09-01T09:00:00Z",
            })
        );
    }

    #[test]
    fn builder_overrides_are_applied() {
        let notifier = HttpNotifier::builder(ApiKey::new("key").unwrap())
            .endpoint("https://example.invalid/v2/send")
            .timeout(Duration::from_secs(5))
            .user_agent("eazysms-tests")
            .build()
            .unwrap();
        assert_eq!(notifier.endpoint, "https://example.invalid/v2/send");
    }

    #[test]
    fn builder_rejects_invalid_endpoint() {
        let err = HttpNotifier::builder(ApiKey::new("key").unwrap())
            .endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidEndpoint(_)));
    }
}
