//! vpn-watch: VPN-down monitor
//!
//! A library for checking whether the host's public IP address falls inside
//! protected CIDR ranges (meaning traffic bypasses the VPN tunnel) and
//! raising a rate-limited webhook alert when it does.

pub mod check;
pub mod classify;
pub mod config;
pub mod gate;
pub mod resolver;
pub mod state;
pub mod time;
pub mod transport;
pub mod webhook;
