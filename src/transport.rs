//! How state messages reach the controller.
//!
//! [`HttpTransport`] talks to a real WLED device. [`DryRun`] accepts everything
//! without touching the network, for previews and tests.

use log::{debug, info};

use crate::{Result, WledConfig};

/// Delivers one serialized JSON body to the controller's state endpoint.
pub trait Transport {
    /// POST `body` (already JSON) and return the HTTP status the controller answered with.
    ///
    /// A non-200 status is still `Ok`; only failures to get any answer are errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) when the connection
    /// fails or the timeout expires.
    fn post_json(&self, body: &[u8]) -> Result<u16>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, body: &[u8]) -> Result<u16> {
        (**self).post_json(body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post_json(&self, body: &[u8]) -> Result<u16> {
        (**self).post_json(body)
    }
}

/// Blocking HTTP/1.1 transport with a per-request timeout.
pub struct HttpTransport {
    agent: ureq::Agent,
    url: String,
}

impl HttpTransport {
    /// Transport for the controller described by `config`.
    #[must_use]
    pub fn new(config: &WledConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            agent,
            url: config.json_url(),
        }
    }

    /// Endpoint this transport posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, body: &[u8]) -> Result<u16> {
        debug!("POST {} ({} bytes)", self.url, body.len());
        match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_bytes(body)
        {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _response)) => Ok(status),
            Err(err) => Err(err.into()),
        }
    }
}

/// Transport that logs the request and reports success.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRun;

impl Transport for DryRun {
    fn post_json(&self, body: &[u8]) -> Result<u16> {
        info!("dry run: would POST {} bytes", body.len());
        Ok(200)
    }
}
