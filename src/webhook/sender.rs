//! Notification sender trait and HTTP webhook implementation.

use std::time::Duration;

use handlebars::Handlebars;
use http::HeaderValue;
use http::header::CONTENT_TYPE;
use serde::Serialize;

use crate::classify::ProtectedRange;
use crate::transport::{BasicAuth, HttpClient, HttpRequest};

use super::{NotificationPayload, PayloadEncoding, WebhookError, WebhookMethod};

/// Status codes counted as a delivered notification.
pub const SUCCESS_STATUSES: [u16; 4] = [200, 201, 202, 204];

/// Default webhook timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shortest accepted webhook timeout.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest accepted webhook timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers alerts to an external system.
///
/// Implementations make exactly one attempt per call.
pub trait NotificationSender: Send + Sync {
    /// Sends one alert.
    ///
    /// Returns the accepted status code on success.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] on transport failure or an unaccepted status.
    fn send(
        &self,
        payload: &NotificationPayload,
    ) -> impl std::future::Future<Output = Result<http::StatusCode, WebhookError>> + Send;
}

/// HTTP webhook sender.
///
/// How the payload is carried depends on the method (see
/// [`WebhookMethod::encoding`]):
/// - GET: payload fields as URL query parameters, no body
/// - POST/PUT/PATCH: JSON body with `Content-Type: application/json`
/// - HEAD: nothing but the bare URL
///
/// Basic auth is attached whenever credentials are configured.
///
/// # Template Support
///
/// The message text can be replaced with a Handlebars template. Available
/// variables: `current_ip`, `matched_range`, `protected_ranges`,
/// `consecutive_alerts`.
///
/// # Example
///
/// ```
/// use vpn_watch::transport::ReqwestClient;
/// use vpn_watch::webhook::{WebhookDispatcher, WebhookMethod};
/// use url::Url;
///
/// let dispatcher = WebhookDispatcher::new(
///     ReqwestClient::new(),
///     Url::parse("https://hooks.example.com/vpn").unwrap(),
/// )
/// .with_method(WebhookMethod::Put);
/// assert_eq!(dispatcher.method(), WebhookMethod::Put);
/// ```
#[derive(Debug)]
pub struct WebhookDispatcher<H> {
    client: H,
    url: url::Url,
    method: WebhookMethod,
    auth: Option<BasicAuth>,
    timeout: Duration,
    message_template: Option<String>,
}

impl<H> WebhookDispatcher<H> {
    /// Creates a dispatcher using POST, no auth and the default timeout.
    #[must_use]
    pub const fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            url,
            method: WebhookMethod::Post,
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            message_template: None,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn with_method(mut self, method: WebhookMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets (or clears) basic authentication.
    #[must_use]
    pub fn with_basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the message template (Handlebars syntax).
    #[must_use]
    pub fn with_message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = Some(template.into());
        self
    }

    /// Returns the configured URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the configured method.
    #[must_use]
    pub const fn method(&self) -> WebhookMethod {
        self.method
    }

    /// Returns `true` when basic auth is attached to requests.
    #[must_use]
    pub const fn has_auth(&self) -> bool {
        self.auth.is_some()
    }
}

/// Template data for rendering the message.
#[derive(Serialize)]
struct TemplateData<'a> {
    current_ip: &'a str,
    matched_range: Option<&'a ProtectedRange>,
    protected_ranges: &'a [ProtectedRange],
    consecutive_alerts: u64,
}

/// Renders a message template against a payload.
///
/// Output is plain text; no HTML escaping is applied.
///
/// # Errors
///
/// Returns [`WebhookError::Template`] when the template fails to render.
pub(crate) fn render_message(
    template: &str,
    payload: &NotificationPayload,
) -> Result<String, WebhookError> {
    let data = TemplateData {
        current_ip: &payload.current_ip,
        matched_range: payload.matched_range.as_ref(),
        protected_ranges: &payload.protected_ranges,
        consecutive_alerts: payload.consecutive_alerts,
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .render_template(template, &data)
        .map_err(|e| WebhookError::Template(e.to_string()))
}

impl<H: HttpClient> WebhookDispatcher<H> {
    /// Builds the HTTP request for a payload according to the method table.
    fn build_request(&self, payload: &NotificationPayload) -> Result<HttpRequest, WebhookError> {
        let rendered;
        let payload = match &self.message_template {
            Some(template) => {
                rendered = payload
                    .clone()
                    .with_message(render_message(template, payload)?);
                &rendered
            }
            None => payload,
        };

        let mut url = self.url.clone();
        let mut body = None;
        let mut content_type = None;

        match self.method.encoding() {
            PayloadEncoding::Query => {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in payload.query_pairs() {
                    pairs.append_pair(key, &value);
                }
            }
            PayloadEncoding::JsonBody => {
                body = Some(serde_json::to_vec(payload)?);
                content_type = Some(HeaderValue::from_static("application/json"));
            }
            PayloadEncoding::Empty => {}
        }

        let mut request = HttpRequest::new(self.method.as_http(), url)
            .with_basic_auth(self.auth.clone())
            .with_timeout(self.timeout);

        if let Some(value) = content_type {
            request = request.with_header(CONTENT_TYPE, value);
        }
        request.body = body;

        Ok(request)
    }
}

impl<H: HttpClient> NotificationSender for WebhookDispatcher<H> {
    async fn send(&self, payload: &NotificationPayload) -> Result<http::StatusCode, WebhookError> {
        let request = self.build_request(payload)?;

        tracing::info!(
            "Sending {} notification to {}",
            self.method,
            redact_url(&self.url)
        );
        tracing::debug!(
            "Message: {} (auth: {})",
            payload.message,
            if self.auth.is_some() {
                "basic"
            } else {
                "none"
            }
        );

        let response = self.client.request(request).await?;

        if SUCCESS_STATUSES.contains(&response.status.as_u16()) {
            tracing::info!("Notification sent successfully (HTTP {})", response.status);
            return Ok(response.status);
        }

        Err(WebhookError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}

/// Strips credentials and query from a URL before it is logged.
pub(crate) fn redact_url(url: &url::Url) -> String {
    let mut shown = url.clone();
    let _ = shown.set_username("");
    let _ = shown.set_password(None);
    shown.set_query(None);
    shown.to_string()
}
