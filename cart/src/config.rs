//! Configuration for the cart.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::checkout::DeepLink;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cart configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Name of the storage slot (default: `cart`)
    pub storage_key: String,
    /// Directory for file-backed storage (default: `.storefront`)
    pub storage_dir: PathBuf,
    /// Messaging service base URL (default: `https://wa.me`)
    pub messaging_base_url: String,
    /// Number orders are sent to (default: `2348140441506`)
    pub whatsapp_number: String,
    /// How long the "added to cart" notification stays up, in milliseconds
    /// (default: 3000)
    pub notification_ms: u64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: "cart".to_string(),
            storage_dir: PathBuf::from(".storefront"),
            messaging_base_url: "https://wa.me".to_string(),
            whatsapp_number: "2348140441506".to_string(),
            notification_ms: 3000,
        }
    }
}

impl CartConfig {
    /// Load configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            storage_key: lookup("CART_STORAGE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            storage_dir: lookup("CART_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            messaging_base_url: lookup("CART_MESSAGING_BASE_URL")
                .unwrap_or(defaults.messaging_base_url),
            whatsapp_number: lookup("CART_WHATSAPP_NUMBER")
                .map(|number| number.trim_start_matches('+').to_string())
                .unwrap_or(defaults.whatsapp_number),
            notification_ms: lookup("CART_NOTIFICATION_MS")
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(defaults.notification_ms),
        }
    }

    /// Deep link orders are handed to
    #[must_use]
    pub fn deep_link(&self) -> DeepLink {
        DeepLink::new(&self.messaging_base_url, &self.whatsapp_number)
    }

    /// How long the notification stays up
    #[must_use]
    pub const fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = CartConfig::from_lookup(|_| None);
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.notification_duration(), Duration::from_secs(3));
        assert_eq!(
            config.deep_link(),
            DeepLink::new("https://wa.me", "2348140441506")
        );
    }

    #[test]
    fn reads_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_STORAGE_KEY", "basket"),
            ("CART_STORAGE_DIR", "/tmp/shop"),
            ("CART_WHATSAPP_NUMBER", "+15551234567"),
            ("CART_NOTIFICATION_MS", "500"),
            ("CART_MESSAGING_BASE_URL", "https://api.whatsapp.com/send"),
        ]));

        assert_eq!(config.storage_key, "basket");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.whatsapp_number, "15551234567");
        assert_eq!(config.notification_duration(), Duration::from_millis(500));
        assert_eq!(config.messaging_base_url, "https://api.whatsapp.com/send");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_NOTIFICATION_MS", "soon"),
            ("CART_STORAGE_KEY", "  "),
        ]));

        assert_eq!(config.notification_ms, 3000);
        assert_eq!(config.storage_key, "cart");
    }
}
