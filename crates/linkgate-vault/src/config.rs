//! Vault configuration: link lifetime, trusted domains, delivery gateways.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Delivery gateways
// ---------------------------------------------------------------------------

/// Where a redeemed link is sent, and what the client sees it called.
///
/// `template` must contain `{url}`; it is replaced by the URL-encoded
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryGateway {
    pub label: String,
    pub template: String,
}

/// A delivery gateway plus the host substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRule {
    pub label: String,
    pub patterns: Vec<String>,
    pub template: String,
}

impl GatewayRule {
    pub fn new<P, S>(label: impl Into<String>, patterns: P, template: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            template: template.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// VaultConfig
// ---------------------------------------------------------------------------

/// Configuration for the link vault and its helpers.
///
/// Every field has a default, so a partial `vault` settings section is
/// enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// How long a minted link stays redeemable, in seconds.
    ///
    /// Default: 3600 (1 hour).
    pub link_ttl_secs: u64,

    /// Delete expired mappings at the start of each mint. Without it,
    /// links that are never redeemed stay in the store forever.
    ///
    /// Default: `true`.
    pub sweep_on_mint: bool,

    /// Domains whose download links are extracted from content bodies.
    /// One subdomain label in front is also accepted.
    pub trusted_domains: Vec<String>,

    /// Gateway rules, checked against the target URL's host.
    pub gateways: Vec<GatewayRule>,

    /// Gateway for targets no rule matches.
    pub default_gateway: DeliveryGateway,
}

impl VaultConfig {
    /// Link lifetime as a `Duration`.
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_secs)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            link_ttl_secs: 60 * 60,
            sweep_on_mint: true,
            trusted_domains: ["fast-dl.lol", "fastdl.lol", "vcloud.zip", "vclzip.online"]
                .into_iter()
                .map(String::from)
                .collect(),
            gateways: vec![
                GatewayRule::new(
                    "Fast DL",
                    ["fast-dl", "fastdl"],
                    "https://vclzipfast.dhanjeerider.workers.dev/?url={url}",
                ),
                GatewayRule::new(
                    "VCloud",
                    ["vcloud.zip", "vclzip"],
                    "https://byclass.dhanjeerider.workers.dev/api?url={url}&pagestep=2&1link=gamerxyt&2class=btn-lg",
                ),
            ],
            default_gateway: DeliveryGateway {
                label: "Mirror".into(),
                template: "https://click.dhanjeerider.workers.dev/?url={url}".into(),
            },
        }
    }
}
