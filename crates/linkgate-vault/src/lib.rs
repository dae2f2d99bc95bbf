//! The link vault for Linkgate.
//!
//! Raw download URLs never reach the browser. Instead the vault hands out
//! opaque identifiers that can each be redeemed exactly once, shortly after
//! they were minted.
//!
//! # Key types
//!
//! - [`LinkVault`]: mint opaque IDs for target URLs, redeem them once
//! - [`LinkExtractor`]: pull trusted download URLs out of an HTML body
//! - [`GatewayRouter`]: pick a label and delivery URL for a target URL
//! - [`VaultConfig`]: link lifetime, trusted domains, gateway rules

mod config;
mod error;
mod extract;
mod routing;
mod vault;

pub use config::{DeliveryGateway, GatewayRule, VaultConfig};
pub use error::VaultError;
pub use extract::LinkExtractor;
pub use routing::{GatewayRouter, Route};
pub use vault::{LINK_KEY_PREFIX, LinkMapping, LinkVault};
