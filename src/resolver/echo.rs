//! Resolver backed by plain-text "what is my IP" services.

use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use crate::transport::{HttpClient, HttpRequest};

use super::{AddressResolver, ResolveError};

/// Echo services tried in order when none are configured.
pub const DEFAULT_ENDPOINTS: [&str; 4] = [
    "https://ipinfo.io/ip",
    "https://api.ipify.org",
    "https://ip.seeip.org",
    "https://ifconfig.me/ip",
];

/// Per-endpoint request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Queries an ordered list of echo endpoints and returns the first valid address.
///
/// Endpoints are tried strictly one after another. An endpoint is skipped when
/// the request fails, the status is not 2xx, or the body (trimmed) does not
/// parse as an IPv4 or IPv6 address. No endpoint is retried within a call.
#[derive(Debug)]
pub struct EchoResolver<H> {
    client: H,
    endpoints: Vec<Url>,
    timeout: Duration,
}

impl<H> EchoResolver<H> {
    /// Creates a resolver over the given endpoints with the default timeout.
    #[must_use]
    pub const fn new(client: H, endpoints: Vec<Url>) -> Self {
        Self {
            client,
            endpoints,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-endpoint timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured endpoints in lookup order.
    #[must_use]
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }
}

impl<H: HttpClient> EchoResolver<H> {
    async fn query(&self, endpoint: &Url) -> Result<IpAddr, String> {
        let request = HttpRequest::get(endpoint.clone()).with_timeout(self.timeout);
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("HTTP {}", response.status));
        }

        let text = response
            .body_text()
            .ok_or_else(|| "response is not valid UTF-8".to_string())?
            .trim();

        text.parse::<IpAddr>()
            .map_err(|_| format!("response {text:?} is not an IP address"))
    }
}

impl<H: HttpClient> AddressResolver for EchoResolver<H> {
    async fn resolve(&self) -> Result<IpAddr, ResolveError> {
        if self.endpoints.is_empty() {
            return Err(ResolveError::NoEndpoints);
        }

        for endpoint in &self.endpoints {
            tracing::debug!("Checking public IP via {endpoint}");
            match self.query(endpoint).await {
                Ok(address) => {
                    tracing::info!("Retrieved public IP {address} from {endpoint}");
                    return Ok(address);
                }
                Err(reason) => {
                    tracing::warn!("Failed to get IP from {endpoint}: {reason}");
                }
            }
        }

        tracing::error!("Failed to get public IP from all endpoints");
        Err(ResolveError::Exhausted {
            attempted: self.endpoints.len(),
        })
    }
}
