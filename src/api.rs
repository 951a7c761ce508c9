// API client module: a small blocking HTTP client for the rbxstats API.
// Every request is a plain GET; the API key travels as the `api` query
// parameter and is passed in explicitly by the caller.

use crate::config::DEFAULT_USER_AGENT;
use crate::endpoints::normalize_endpoint;
use crate::error::{FetchError, Result};
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use std::collections::BTreeMap;

/// What the request step produced for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The server answered; `body` is the full response text.
    Response { status: u16, body: String },
    /// No usable response: connect, TLS or body read failure.
    Transport { cause: String },
}

/// Result of a one-off test request.
#[derive(Debug, Clone)]
pub struct TestResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Holds a reqwest blocking client, the base URL, the API key and the
/// headers sent with each fetch.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    headers: HeaderMap,
}

impl ApiClient {
    /// Build a client from explicit values. `base_url` gets a trailing `/`
    /// if it lacks one so endpoints can be appended directly.
    pub fn new(base_url: &str, api_key: &str, headers: &BTreeMap<String, String>) -> Result<Self> {
        let client = Client::builder().build().map_err(FetchError::Client)?;
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(ApiClient {
            client,
            base_url,
            api_key: api_key.to_string(),
            headers: header_map(headers)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for an endpoint, with the `api` parameter appended
    /// after any query string the endpoint already carries.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = normalize_endpoint(endpoint);
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}{}api={}", self.base_url, endpoint, sep, self.api_key)
    }

    /// Issue one blocking GET. Never fails; transport problems come back as
    /// `RequestOutcome::Transport`.
    pub fn get(&self, endpoint: &str) -> RequestOutcome {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint, "GET {}", self.redact(&url));
        let res = match self.client.get(&url).headers(self.headers.clone()).send() {
            Ok(res) => res,
            Err(e) => {
                return RequestOutcome::Transport {
                    cause: e.to_string(),
                }
            }
        };
        let status = res.status().as_u16();
        match res.text() {
            Ok(body) => RequestOutcome::Response { status, body },
            Err(e) => RequestOutcome::Transport {
                cause: format!("failed to read response body: {}", e),
            },
        }
    }

    /// Perform a manual request with extra query parameters. Sends the
    /// configured headers, with `user_agent` replacing the configured one
    /// when given.
    pub fn test_request(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        user_agent: Option<&str>,
    ) -> anyhow::Result<TestResponse> {
        let endpoint = normalize_endpoint(endpoint);
        let url = format!("{}{}", self.base_url, endpoint);
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(k, _)| k != "api")
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.push(("api", self.api_key.as_str()));

        let res = self
            .client
            .get(&url)
            .headers(self.test_headers(user_agent)?)
            .query(&query)
            .send()
            .map_err(|e| anyhow::anyhow!("Failed to send test request: {}", e))?;
        let status = res.status().as_u16();
        let body = res.text().unwrap_or_else(|_| "".into());
        Ok(TestResponse { url, status, body })
    }

    fn test_headers(&self, user_agent: Option<&str>) -> anyhow::Result<HeaderMap> {
        let mut headers = self.headers.clone();
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));
        match user_agent {
            Some(ua) => {
                let value = HeaderValue::from_str(ua)
                    .with_context(|| format!("invalid User-Agent {:?}", ua))?;
                headers.insert(USER_AGENT, value);
            }
            None => {
                headers
                    .entry(USER_AGENT)
                    .or_insert(HeaderValue::from_static(DEFAULT_USER_AGENT));
            }
        }
        Ok(headers)
    }

    /// Mask the `api` query value when a URL ends up in the log file.
    fn redact(&self, url: &str) -> String {
        let Some(pos) = [url.rfind("?api="), url.rfind("&api=")].into_iter().flatten().max() else {
            return url.to_string();
        };
        let start = pos + "?api=".len();
        let end = url[start..].find('&').map_or(url.len(), |i| start + i);
        if start == end {
            return url.to_string();
        }
        format!("{}***{}", &url[..start], &url[end..])
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |reason: String| FetchError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let key = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let val = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(key, val);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str, key: &str) -> ApiClient {
        ApiClient::new(base, key, &BTreeMap::new()).unwrap()
    }

    #[test]
    fn url_appends_api_key() {
        let c = client("https://api.rbxstats.xyz/api/", "k1");
        assert_eq!(
            c.endpoint_url("offsets"),
            "https://api.rbxstats.xyz/api/offsets?api=k1"
        );
        assert_eq!(
            c.endpoint_url("/search?query=test"),
            "https://api.rbxstats.xyz/api/search?query=test&api=k1"
        );
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let c = client("http://127.0.0.1:9/api", "");
        assert_eq!(c.base_url(), "http://127.0.0.1:9/api/");
        assert_eq!(c.endpoint_url("exploits"), "http://127.0.0.1:9/api/exploits?api=");
    }

    #[test]
    fn invalid_header_is_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), "bad\nvalue".to_string());
        let err = ApiClient::new("http://localhost/", "", &headers)
            .err()
            .expect("header should be rejected");
        assert!(matches!(err, FetchError::InvalidHeader { ref name, .. } if name == "User-Agent"));
    }

    #[test]
    fn redact_hides_key() {
        let c = client("http://localhost/", "s3cr3t");
        assert_eq!(
            c.redact(&c.endpoint_url("offsets")),
            "http://localhost/offsets?api=***"
        );
    }

    #[test]
    fn redact_only_touches_api_value() {
        let c = client("http://localhost/", "123");
        assert_eq!(
            c.redact(&c.endpoint_url("offsets/game/123")),
            "http://localhost/offsets/game/123?api=***"
        );
        assert_eq!(
            c.redact(&c.endpoint_url("search?query=123")),
            "http://localhost/search?query=123&api=***"
        );
        let empty = client("http://localhost/", "");
        assert_eq!(
            empty.redact(&empty.endpoint_url("offsets")),
            "http://localhost/offsets?api="
        );
    }

    #[test]
    fn test_headers_follow_config() {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), "configured/2.0".to_string());
        headers.insert("X-Trace".to_string(), "1".to_string());
        let c = ApiClient::new("http://localhost/", "", &headers).unwrap();

        let default = c.test_headers(None).unwrap();
        assert_eq!(default[USER_AGENT], "configured/2.0");
        assert_eq!(default["x-trace"], "1");
        assert_eq!(default[ACCEPT], "application/json");

        let custom = c.test_headers(Some("manual/1.0")).unwrap();
        assert_eq!(custom[USER_AGENT], "manual/1.0");
        assert_eq!(custom.get_all(USER_AGENT).iter().count(), 1);
        assert_eq!(custom["x-trace"], "1");

        let bare = client("http://localhost/", "");
        assert_eq!(bare.test_headers(None).unwrap()[USER_AGENT], DEFAULT_USER_AGENT);
        assert!(bare.test_headers(Some("bad\nua")).is_err());
    }
}
