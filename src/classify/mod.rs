//! Classification of an address against the protected CIDR ranges.
//!
//! An address inside any protected range means traffic is leaving through
//! the unprotected uplink, i.e. the tunnel is down.

mod range;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use range::{ProtectedRange, RangeParseError};

use std::net::IpAddr;

use serde::Serialize;

/// Result of classifying one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// `true` when the address is outside every protected range.
    pub is_safe: bool,
    /// First configured range containing the address, if any.
    pub matched_range: Option<ProtectedRange>,
}

impl Classification {
    /// Address is outside every protected range.
    #[must_use]
    pub const fn safe() -> Self {
        Self {
            is_safe: true,
            matched_range: None,
        }
    }

    /// Address must be treated as exposed.
    ///
    /// `matched_range` is `None` when classification failed closed.
    #[must_use]
    pub const fn unsafe_with(matched_range: Option<ProtectedRange>) -> Self {
        Self {
            is_safe: false,
            matched_range,
        }
    }
}

/// Tests an address against `ranges`, in configured order.
///
/// - The first range containing the address is reported (no narrowest or
///   widest preference).
/// - Ranges that fail to parse are logged and skipped.
/// - An address that does not parse is unsafe with no matched range.
/// - A non-empty list in which no range parses is unsafe with no matched range.
#[must_use]
pub fn classify(address: &str, ranges: &[ProtectedRange]) -> Classification {
    let Ok(ip) = address.trim().parse::<IpAddr>() else {
        tracing::error!("Cannot classify unparsable address {address:?}; treating as unsafe");
        return Classification::unsafe_with(None);
    };

    let mut parsed_any = false;

    for range in ranges {
        let net = match range.network() {
            Ok(net) => net,
            Err(e) => {
                tracing::error!("Skipping invalid protected range: {e}");
                continue;
            }
        };
        parsed_any = true;

        if net.contains(&ip) {
            tracing::debug!("{ip} is inside protected range {range}");
            return Classification::unsafe_with(Some(range.clone()));
        }
    }

    if !ranges.is_empty() && !parsed_any {
        tracing::error!("No protected range could be parsed; treating {ip} as unsafe");
        return Classification::unsafe_with(None);
    }

    tracing::debug!("{ip} is outside all {} protected range(s)", ranges.len());
    Classification::safe()
}
