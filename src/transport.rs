//! Single-shot HTTP GET execution against the toncenter base URL.

use crate::error::{TransportError, TransportFailure};
use crate::params::QueryParams;
use reqwest::{Client, Url};
use std::fmt;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Status and body of a response that reached us, before envelope decoding.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

#[derive(Clone)]
pub(crate) struct HttpTransport {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: Client::new(),
            base_url,
            api_key: None,
        }
    }

    /// An empty key means anonymous access.
    pub(crate) fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key.filter(|key| !key.is_empty());
    }

    pub(crate) fn set_http_client(&mut self, http: Client) {
        self.http = http;
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint_url(&self, path: &str, query: &QueryParams) -> Result<Url, TransportFailure> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|err| TransportFailure::InvalidUrl(err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// Issues one GET request. No retries.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<RawResponse, TransportError> {
        let url = self.endpoint_url(path, query)?;

        let mut request = self.http.get(url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await.map_err(TransportFailure::Http)?;
        let status = response.status();

        match response.text().await {
            Ok(body) => Ok(RawResponse {
                status: status.as_u16(),
                body,
            }),
            Err(err) => {
                let mut failures = Vec::with_capacity(2);
                if !status.is_success() {
                    failures.push(TransportFailure::Status(status.as_u16()));
                }
                failures.push(TransportFailure::Http(err));
                Err(TransportError::new(failures))
            }
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(
            HttpTransport::new("https://toncenter.com/api/v2").base_url(),
            "https://toncenter.com/api/v2/"
        );
        assert_eq!(
            HttpTransport::new("https://toncenter.com/api/v2/").base_url(),
            "https://toncenter.com/api/v2/"
        );
    }

    #[test]
    fn empty_api_key_is_anonymous() {
        let mut transport = HttpTransport::new("http://localhost");
        transport.set_api_key(Some(String::new()));
        assert!(!transport.has_api_key());
        transport.set_api_key(Some("secret".into()));
        assert!(transport.has_api_key());
    }

    #[test]
    fn endpoint_url_encodes_query() {
        let transport = HttpTransport::new("https://toncenter.com/api/v2");
        let mut query = QueryParams::new();
        query.push("address", "EQ+/=").push("limit", 10);
        let url = transport.endpoint_url("getTransactions", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://toncenter.com/api/v2/getTransactions?address=EQ%2B%2F%3D&limit=10"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut transport = HttpTransport::new("http://localhost");
        transport.set_api_key(Some("secret".into()));
        let debug = format!("{transport:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn invalid_base_url_is_a_transport_failure() {
        let transport = HttpTransport::new("not a url");
        assert!(matches!(
            transport.endpoint_url("getMasterChainInfo", &QueryParams::new()),
            Err(TransportFailure::InvalidUrl(_))
        ));
    }
}
