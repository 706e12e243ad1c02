//! CCIP-Read gateway client.
//!
//! A gateway URL template may carry `{sender}` and `{data}` placeholders.
//! When substitution leaves nothing of the request outside the URL, the
//! request is a GET: the template carries `{data}`, or carries no
//! placeholder at all. A template that takes `{sender}` but not `{data}`
//! leaves the call data unplaced, so it travels in a JSON POST body:
//!
//! ```json
//! { "data": "0x…", "sender": "0x…" }
//! ```
//!
//! A successful answer is `{ "data": "0x…" }`, or a bare hex string.

use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use basenames_core::constants::{GATEWAY_DATA_PLACEHOLDER, GATEWAY_SENDER_PLACEHOLDER};
use basenames_core::error::{ResolveError, Result};

/// JSON body of a POST gateway request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPostBody {
    /// Lowercase hex call data.
    pub data: String,
    /// Lowercase hex sender address.
    pub sender: String,
}

/// A fully substituted gateway request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayRequest {
    /// Everything is in the URL.
    Get {
        /// Target URL.
        url: String,
    },
    /// Call data in a JSON body.
    Post {
        /// Target URL.
        url: String,
        /// Request body.
        body: GatewayPostBody,
    },
}

impl GatewayRequest {
    /// Substitutes the placeholders of `url_template` and picks the method.
    pub fn build(url_template: &str, sender: Address, call_data: &[u8]) -> Self {
        let sender_hex = format!("0x{}", hex::encode(sender.as_slice()));
        let data_hex = format!("0x{}", hex::encode(call_data));

        let url = url_template
            .replace(GATEWAY_SENDER_PLACEHOLDER, &sender_hex)
            .replace(GATEWAY_DATA_PLACEHOLDER, &data_hex);

        let takes_data = url_template.contains(GATEWAY_DATA_PLACEHOLDER);
        let takes_sender = url_template.contains(GATEWAY_SENDER_PLACEHOLDER);

        if takes_data || !takes_sender {
            GatewayRequest::Get { url }
        } else {
            GatewayRequest::Post {
                url,
                body: GatewayPostBody {
                    data: data_hex,
                    sender: sender_hex,
                },
            }
        }
    }

    /// Returns the target URL.
    pub fn url(&self) -> &str {
        match self {
            GatewayRequest::Get { url } | GatewayRequest::Post { url, .. } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    data: Option<serde_json::Value>,
}

/// HTTP client for CCIP-Read gateways.
#[derive(Clone)]
pub struct GatewayClient {
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client))
    }

    /// Creates a client on an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Queries the gateway at `url_template` and returns the decoded
    /// response bytes.
    ///
    /// The bytes are not ABI-decoded here.
    #[instrument(skip(self, call_data), fields(sender = %sender))]
    pub async fn query(&self, url_template: &str, sender: Address, call_data: &[u8]) -> Result<Bytes> {
        let request = GatewayRequest::build(url_template, sender, call_data);

        url::Url::parse(request.url()).map_err(|e| ResolveError::GatewayError {
            status: None,
            message: format!("invalid gateway URL '{}': {}", request.url(), e),
        })?;

        let pending = match &request {
            GatewayRequest::Get { url } => {
                debug!(url = %url, "GET gateway");
                self.http_client.get(url)
            }
            GatewayRequest::Post { url, body } => {
                debug!(url = %url, "POST gateway");
                self.http_client.post(url).json(body)
            }
        };

        let response = pending.send().await.map_err(|e| ResolveError::GatewayError {
            status: None,
            message: if e.is_timeout() {
                format!("gateway timed out: {}", e)
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ResolveError::GatewayError {
            status: Some(status.as_u16()),
            message: format!("failed to read gateway body: {}", e),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gateway returned error status");
            return Err(ResolveError::GatewayError {
                status: Some(status.as_u16()),
                message: error_message(&text),
            });
        }

        parse_gateway_body(&text)
    }
}

/// Picks a readable message out of an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extracts the response bytes from a 2xx gateway body.
pub fn parse_gateway_body(body: &str) -> Result<Bytes> {
    let hex_data = match serde_json::from_str::<GatewayEnvelope>(body) {
        Ok(envelope) => match envelope.data {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => {
                return Err(ResolveError::GatewayResponseMalformed(format!(
                    "'data' is not a string: {}",
                    other
                )))
            }
            None => {
                return Err(ResolveError::GatewayResponseMalformed(
                    "response has no 'data' field".into(),
                ))
            }
        },
        Err(_) => {
            let trimmed = body.trim();
            if !trimmed.starts_with("0x") {
                return Err(ResolveError::GatewayResponseMalformed(
                    "response is neither JSON nor hex".into(),
                ));
            }
            trimmed.to_string()
        }
    };

    let digits = hex_data.strip_prefix("0x").ok_or_else(|| {
        ResolveError::GatewayResponseMalformed("'data' is not 0x-prefixed hex".into())
    })?;

    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| ResolveError::GatewayResponseMalformed(format!("invalid hex: {}", e)))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sender() -> Address {
        Address::repeat_byte(0xab)
    }

    fn client() -> GatewayClient {
        GatewayClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_get_request() {
        let request = GatewayRequest::build(
            "https://gw.test/{sender}/{data}.json",
            sender(),
            &[0xde, 0xad],
        );
        assert_eq!(
            request,
            GatewayRequest::Get {
                url: format!("https://gw.test/0x{}/0xdead.json", "ab".repeat(20))
            }
        );
    }

    #[test]
    fn test_build_request_without_placeholders_is_get() {
        let request = GatewayRequest::build("https://gw.test/lookup", sender(), &[0xde, 0xad]);
        assert_eq!(
            request,
            GatewayRequest::Get {
                url: "https://gw.test/lookup".into()
            }
        );
    }

    #[test]
    fn test_build_post_request() {
        let request = GatewayRequest::build("https://gw.test/{sender}", sender(), &[0xBE, 0xEF]);
        match request {
            GatewayRequest::Post { url, body } => {
                assert_eq!(url, format!("https://gw.test/0x{}", "ab".repeat(20)));
                assert_eq!(body.data, "0xbeef");
                assert_eq!(body.sender, format!("0x{}", "ab".repeat(20)));
            }
            other => panic!("expected POST, got {:?}", other),
        }
    }

    #[test]
    fn test_post_body_serialization() {
        let body = GatewayPostBody {
            data: "0x01".into(),
            sender: "0x02".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "data": "0x01", "sender": "0x02" })
        );
    }

    #[test]
    fn test_parse_gateway_body() {
        assert_eq!(parse_gateway_body(r#"{"data":"0x0102"}"#).unwrap().as_ref(), &[1, 2]);
        assert_eq!(parse_gateway_body("  0x0a0b\n").unwrap().as_ref(), &[0x0a, 0x0b]);

        for bad in [r#"{"result":"0x01"}"#, r#"{"data":42}"#, r#"{"data":"zz"}"#, "oops", "0xzz"] {
            assert!(
                matches!(parse_gateway_body(bad), Err(ResolveError::GatewayResponseMalformed(_))),
                "{} should be malformed",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_query_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/lookup/0x[0-9a-f]{40}/0xdead\.json$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": "0xc0ffee" })))
            .expect(1)
            .mount(&server)
            .await;

        let template = format!("{}/lookup/{{sender}}/{{data}}.json", server.uri());
        let bytes = client().query(&template, sender(), &[0xde, 0xad]).await.unwrap();
        assert_eq!(bytes.as_ref(), &[0xc0, 0xff, 0xee]);
    }

    #[tokio::test]
    async fn test_query_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/ccip/0x{}", "ab".repeat(20))))
            .and(body_json(serde_json::json!({
                "data": "0xdead",
                "sender": format!("0x{}", "ab".repeat(20))
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("0xc0ffee"))
            .expect(1)
            .mount(&server)
            .await;

        let template = format!("{}/ccip/{{sender}}", server.uri());
        let bytes = client().query(&template, sender(), &[0xde, 0xad]).await.unwrap();
        assert_eq!(bytes.as_ref(), &[0xc0, 0xff, 0xee]);
    }

    #[tokio::test]
    async fn test_query_without_placeholders_uses_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": "0x01" })))
            .expect(1)
            .mount(&server)
            .await;

        let template = format!("{}/static", server.uri());
        let bytes = client().query(&template, sender(), &[0xde, 0xad]).await.unwrap();
        assert_eq!(bytes.as_ref(), &[0x01]);
    }

    #[tokio::test]
    async fn test_query_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "signer offline" })),
            )
            .mount(&server)
            .await;

        let err = client().query(&server.uri(), sender(), &[1]).await.unwrap_err();
        match err {
            ResolveError::GatewayError { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "signer offline");
            }
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = GatewayClient::new(Duration::from_millis(100)).unwrap();
        let err = client.query(&server.uri(), sender(), &[1]).await.unwrap_err();
        assert!(matches!(err, ResolveError::GatewayError { status: None, .. }));
    }

    #[tokio::test]
    async fn test_query_invalid_url() {
        let err = client().query("not a url", sender(), &[1]).await.unwrap_err();
        assert!(matches!(err, ResolveError::GatewayError { status: None, .. }));
    }
}
