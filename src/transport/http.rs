//! Blocking HTTP transport
//!
//! One `reqwest` blocking client is built per run and shared by every worker;
//! it pools connections internally.

use super::{join_url, Transport, REQUEST_BODY, REQUEST_CONTENT_TYPE};
use crate::config::Call;
use crate::error::{BenchError, BenchResult};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;

/// Transport that POSTs calls to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url`, with an optional per-request timeout
    /// (the client default applies when `None`)
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> BenchResult<Self> {
        let base_url = base_url.into();
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| BenchError::Transport {
            url: base_url.clone(),
            source: Box::new(e),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn invoke(&self, call: &Call) -> BenchResult<()> {
        let url = self.url_for(call);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, REQUEST_CONTENT_TYPE)
            .body(REQUEST_BODY)
            .send()
            .map_err(|e| BenchError::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| BenchError::BodyRead {
            url: url.clone(),
            source: Box::new(e),
        })?;

        if status != StatusCode::OK {
            return Err(BenchError::UnexpectedStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn url_for(&self, call: &Call) -> String {
        join_url(&self.base_url, &call.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn transport_for(server: &mockito::Server) -> HttpTransport {
        HttpTransport::new(format!("{}/run", server.url()), Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_invoke_posts_null_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/run/fn0")
            .match_header("content-type", "text/json")
            .match_body("null")
            .with_status(200)
            .with_body("\"fn0\"")
            .create();

        let transport = transport_for(&server);
        transport.invoke(&Call::new("fn0")).unwrap();
        mock.assert();
    }

    #[test]
    fn test_non_200_is_unexpected_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/run/broken")
            .with_status(500)
            .with_body("sandbox crashed")
            .create();

        let transport = transport_for(&server);
        match transport.invoke(&Call::new("broken")) {
            Err(BenchError::UnexpectedStatus { url, status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "sandbox crashed");
                assert!(url.ends_with("/run/broken"));
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Reserve a port, then free it so nothing is listening there
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport =
            HttpTransport::new(format!("http://127.0.0.1:{}/run", port), Some(Duration::from_secs(2)))
                .unwrap();
        let err = transport.invoke(&Call::new("fn0")).unwrap_err();
        assert!(matches!(err, BenchError::Transport { .. }), "got {:?}", err);
    }

    #[test]
    fn test_url_for() {
        let transport = HttpTransport::new("http://localhost:5000/run/", None).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000/run/");
        assert_eq!(transport.url_for(&Call::new("fn3")), "http://localhost:5000/run/fn3");
    }
}
