//! URL handling module for kumo
//!
//! This module provides the dedup fingerprint, host/authority extraction,
//! and the registrable-domain comparison used by cross-host policy checks.

mod domain;
mod fingerprint;

// Re-export main functions
pub use domain::{authority, host_of, registrable_domain, same_host, same_registrable_domain};
pub use fingerprint::{fingerprint, is_crawlable};
