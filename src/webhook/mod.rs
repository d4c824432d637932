//! Webhook layer for raising alerts with external services.
//!
//! This module provides:
//! - The enumerated HTTP methods and their payload encodings ([`WebhookMethod`])
//! - The alert payload ([`NotificationPayload`])
//! - The sender abstraction ([`NotificationSender`])
//! - The HTTP implementation ([`WebhookDispatcher`])

mod error;
mod method;
mod payload;
mod sender;


pub use error::WebhookError;
pub use method::{PayloadEncoding, WebhookMethod};
pub use payload::{ALERT_TYPE, MonitorStats, NotificationPayload, default_message};
pub use sender::{
    DEFAULT_TIMEOUT, MAX_TIMEOUT, MIN_TIMEOUT, NotificationSender, SUCCESS_STATUSES,
    WebhookDispatcher,
};

pub(crate) use sender::redact_url;
