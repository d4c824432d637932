//! HTTP transport shared by the address resolver and the webhook dispatcher.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - Basic authentication credentials ([`BasicAuth`])
//! - The client abstraction ([`HttpClient`])
//! - The production client ([`ReqwestClient`])

mod client;
mod error;
mod request;

#[cfg(test)]
pub mod mock;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{BasicAuth, HttpClient, HttpRequest, HttpResponse};
