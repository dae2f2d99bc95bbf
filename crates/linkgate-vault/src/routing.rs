//! Delivery-gateway routing.
//!
//! Every target URL is served through an external delivery gateway, and
//! the gateway depends on where the file lives. Routing is a pure function
//! of the URL's host: it never fails, and the same URL always lands on the
//! same gateway.

use url::Url;

use crate::{DeliveryGateway, GatewayRule};

/// The outcome of routing a target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Human-readable name shown to the client, e.g. "Fast DL".
    pub label: String,
    /// The gateway URL the client is finally sent to.
    pub delivery_url: String,
}

/// Classifies target URLs by host substring.
///
/// Among rules with a pattern contained in the host, the one with the
/// longest matching pattern wins. Ties go to the rule listed first.
/// Anything else uses the default gateway.
#[derive(Debug, Clone)]
pub struct GatewayRouter {
    rules: Vec<GatewayRule>,
    default: DeliveryGateway,
}

impl GatewayRouter {
    pub fn new(rules: Vec<GatewayRule>, default: DeliveryGateway) -> Self {
        // Patterns are compared against a lowercased host.
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.patterns = rule
                    .patterns
                    .into_iter()
                    .map(|p| p.to_lowercase())
                    .filter(|p| !p.is_empty())
                    .collect();
                rule
            })
            .collect();
        Self { rules, default }
    }

    /// Returns the label for `url` without building a delivery URL.
    pub fn label(&self, url: &str) -> &str {
        let (label, _) = self.select(url);
        label
    }

    /// Routes `url` to its delivery gateway.
    pub fn route(&self, url: &str) -> Route {
        let (label, template) = self.select(url);
        Route {
            label: label.to_string(),
            delivery_url: template.replace("{url}", &urlencoding::encode(url)),
        }
    }

    fn select(&self, url: &str) -> (&str, &str) {
        let host = host_of(url);

        let mut best: Option<(&GatewayRule, usize)> = None;
        for rule in &self.rules {
            let longest = rule
                .patterns
                .iter()
                .filter(|p| host.contains(p.as_str()))
                .map(String::len)
                .max();
            if let Some(len) = longest {
                // Strictly greater keeps the earlier rule on a tie.
                if best.is_none_or(|(_, best_len)| len > best_len) {
                    best = Some((rule, len));
                }
            }
        }

        match best {
            Some((rule, _)) => (rule.label.as_str(), rule.template.as_str()),
            None => (self.default.label.as_str(), self.default.template.as_str()),
        }
    }
}

/// Lowercased host of `url`. Input that does not parse as an absolute URL
/// is matched as a whole.
fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
        .to_lowercase()
}
