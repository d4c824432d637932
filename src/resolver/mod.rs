//! Public address discovery.
//!
//! This module provides:
//! - The resolver abstraction ([`AddressResolver`])
//! - The HTTP echo-service implementation ([`EchoResolver`])
//! - The built-in endpoint list ([`DEFAULT_ENDPOINTS`])

mod echo;


pub use echo::{DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT, EchoResolver};

use std::net::IpAddr;

use thiserror::Error;

/// Discovery failed: every endpoint was tried and none produced an address.
///
/// Recoverable. The current check is abandoned; the next scheduled
/// invocation tries again.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// All endpoints failed or returned something that is not an IP address.
    #[error("Failed to resolve public address: all {attempted} endpoint(s) failed")]
    Exhausted {
        /// Number of endpoints that were tried.
        attempted: usize,
    },

    /// No endpoint is configured.
    #[error("No address lookup endpoints configured")]
    NoEndpoints,
}

/// Determines the caller's public network address.
///
/// Implementations perform at most one pass over their sources per call and
/// never retry internally.
pub trait AddressResolver: Send + Sync {
    /// Returns the current public address.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when no source produced a valid address.
    fn resolve(&self) -> impl std::future::Future<Output = Result<IpAddr, ResolveError>> + Send;
}

/// Scripted resolver for tests.
#[cfg(test)]
pub mod mock {
    use super::{AddressResolver, ResolveError};
    use std::net::IpAddr;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed address, or fails every call.
    #[derive(Debug)]
    pub struct MockResolver {
        address: Mutex<Option<IpAddr>>,
        calls: AtomicUsize,
    }

    impl MockResolver {
        /// Resolver that always returns `address`.
        pub fn returning(address: &str) -> Self {
            Self {
                address: Mutex::new(Some(address.parse().unwrap())),
                calls: AtomicUsize::new(0),
            }
        }

        /// Resolver that always fails with [`ResolveError::Exhausted`].
        pub const fn failing() -> Self {
            Self {
                address: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        /// Changes the address returned by subsequent calls.
        pub fn set(&self, address: &str) {
            *self.address.lock().unwrap() = Some(address.parse().unwrap());
        }

        /// Number of `resolve` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AddressResolver for MockResolver {
        async fn resolve(&self) -> Result<IpAddr, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (*self.address.lock().unwrap()).ok_or(ResolveError::Exhausted { attempted: 4 })
        }
    }
}
