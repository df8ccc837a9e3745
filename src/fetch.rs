//! JSON retrieval through an injected HTTP capability.
//!
//! [`get_json`] does not cache: every call issues exactly one GET through the
//! client and hands back whatever JSON it produced. Errors from the client are
//! returned as-is.

use std::sync::Arc;

use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::debug;

/// A capability that performs an HTTP GET and decodes the body as JSON.
///
/// Implement this for a test double to exercise code that fetches JSON without
/// touching the network:
///
/// ```
/// use gatherx::{get_json, HttpClient};
/// use serde_json::{json, Value};
///
/// struct Canned(Value);
///
/// impl HttpClient for Canned {
///     type Error = std::convert::Infallible;
///
///     fn get(&self, _url: &str) -> Result<Value, Self::Error> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let client = Canned(json!({"payload": true}));
/// assert_eq!(get_json(&client, "http://example.com").unwrap(), json!({"payload": true}));
/// ```
pub trait HttpClient {
    type Error;

    fn get(&self, url: &str) -> Result<Value, Self::Error>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    type Error = C::Error;

    fn get(&self, url: &str) -> Result<Value, Self::Error> {
        (**self).get(url)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    type Error = C::Error;

    fn get(&self, url: &str) -> Result<Value, Self::Error> {
        (**self).get(url)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    type Error = C::Error;

    fn get(&self, url: &str) -> Result<Value, Self::Error> {
        (**self).get(url)
    }
}

/// Fetch `url` through `client` and return the decoded JSON body unmodified.
///
/// # Errors
///
/// Whatever `client` reports, unchanged. There are no retries.
pub fn get_json<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Value, C::Error> {
    #[cfg(feature = "tracing")]
    debug!(url, "fetching json");

    client.get(url)
}

/// Blocking [`HttpClient`] backed by `reqwest`.
///
/// The response status is not inspected; the body is decoded as JSON whatever
/// the status code. Do not call from inside an async runtime's worker thread.
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::blocking::Client> for ReqwestClient {
    fn from(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "reqwest")]
impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    fn get(&self, url: &str) -> Result<Value, Self::Error> {
        self.client.get(url).send()?.json()
    }
}
