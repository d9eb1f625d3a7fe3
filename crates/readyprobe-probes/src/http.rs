//! HTTP client capability and its reqwest implementation
//!
//! Redirect handling is fixed per client: by default redirects are NOT
//! followed, so a health probe observes the literal status of the first hop
//! (a 301 from a misrouted load balancer is reported as 301, not masked by
//! whatever the redirect target answers).

use async_trait::async_trait;
use readyprobe_core::types::EndpointConfig;
use std::time::Duration;

use crate::error::TransportError;

/// Maximum hops when redirects are followed
pub const MAX_REDIRECTS: usize = 10;

/// Issues GET requests and reports the status code
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the response status code
    ///
    /// Any HTTP response, including 4xx and 5xx, is `Ok`. Only failing to get
    /// a response at all is a `TransportError`.
    async fn get_status(&self, url: &str) -> Result<u16, TransportError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn get_status(&self, url: &str) -> Result<u16, TransportError> {
        (**self).get_status(url).await
    }
}

/// Options for building a [`ReqwestHttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// Follow up to [`MAX_REDIRECTS`] redirects instead of observing the first hop
    pub follow_redirects: bool,
    /// Timeout for one request, connect included
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self::from(&EndpointConfig::default())
    }
}

impl From<&EndpointConfig> for HttpClientOptions {
    fn from(config: &EndpointConfig) -> Self {
        Self {
            follow_redirects: config.follow_redirects,
            request_timeout: config.request_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    follow_redirects: bool,
}

impl ReqwestHttpClient {
    pub fn new(options: &HttpClientOptions) -> Result<Self, reqwest::Error> {
        let redirect = if options.follow_redirects {
            reqwest::redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .user_agent(&options.user_agent)
            .timeout(options.request_timeout)
            .redirect(redirect)
            .build()?;

        Ok(Self {
            client,
            follow_redirects: options.follow_redirects,
        })
    }

    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_status(&self, url: &str) -> Result<u16, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        Ok(response.status().as_u16())
    }
}

fn classify(url: &str, err: reqwest::Error) -> TransportError {
    let url = url.to_string();
    if err.is_timeout() {
        TransportError::Timeout { url }
    } else if err.is_connect() {
        TransportError::Connect {
            url,
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_endpoint_config() {
        let config = EndpointConfig {
            follow_redirects: true,
            request_timeout_ms: 1500,
            ..EndpointConfig::default()
        };

        let options = HttpClientOptions::from(&config);
        assert!(options.follow_redirects);
        assert_eq!(options.request_timeout, Duration::from_millis(1500));
        assert!(options.user_agent.starts_with("readyprobe/"));
    }

    #[test]
    fn test_default_options_do_not_follow_redirects() {
        let client = ReqwestHttpClient::new(&HttpClientOptions::default()).unwrap();
        assert!(!client.follows_redirects());
    }
}
