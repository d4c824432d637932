//! Webhook HTTP methods and how each one carries the payload.

use std::fmt;
use std::str::FromStr;

/// HTTP methods a webhook may be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookMethod {
    /// Payload flattened into URL query parameters.
    Get,
    /// Payload as a JSON body.
    #[default]
    Post,
    /// Payload as a JSON body.
    Put,
    /// Payload as a JSON body.
    Patch,
    /// No payload at all.
    Head,
}

/// How the payload travels with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// `?message=...&current_ip=...`, no body, no content type.
    Query,
    /// `application/json` body.
    JsonBody,
    /// Bare request to the configured URL.
    Empty,
}

impl WebhookMethod {
    /// All accepted methods.
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Head];

    /// Payload encoding used for this method.
    #[must_use]
    pub const fn encoding(self) -> PayloadEncoding {
        match self {
            Self::Get => PayloadEncoding::Query,
            Self::Post | Self::Put | Self::Patch => PayloadEncoding::JsonBody,
            Self::Head => PayloadEncoding::Empty,
        }
    }

    /// The corresponding `http` method.
    #[must_use]
    pub fn as_http(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Patch => http::Method::PATCH,
            Self::Head => http::Method::HEAD,
        }
    }

    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for WebhookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookMethod {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("get".parse::<WebhookMethod>(), Ok(WebhookMethod::Get));
        assert_eq!("Post".parse::<WebhookMethod>(), Ok(WebhookMethod::Post));
        assert_eq!(" PATCH ".parse::<WebhookMethod>(), Ok(WebhookMethod::Patch));
    }

    #[test]
    fn rejects_unsupported_methods() {
        for bad in ["DELETE", "OPTIONS", "", "POSTS"] {
            assert_eq!(bad.parse::<WebhookMethod>(), Err(bad.to_string()));
        }
    }

    #[test]
    fn encoding_table() {
        assert_eq!(WebhookMethod::Get.encoding(), PayloadEncoding::Query);
        assert_eq!(WebhookMethod::Post.encoding(), PayloadEncoding::JsonBody);
        assert_eq!(WebhookMethod::Put.encoding(), PayloadEncoding::JsonBody);
        assert_eq!(WebhookMethod::Patch.encoding(), PayloadEncoding::JsonBody);
        assert_eq!(WebhookMethod::Head.encoding(), PayloadEncoding::Empty);
    }

    #[test]
    fn maps_to_http_methods() {
        for method in WebhookMethod::ALL {
            assert_eq!(method.as_http().as_str(), method.as_str());
        }
    }

    #[test]
    fn default_is_post() {
        assert_eq!(WebhookMethod::default(), WebhookMethod::Post);
    }
}
