//! Host site-settings collaborator.
//!
//! The wiki host owns its naming policy; this crate only consults it. Two
//! touchpoints: read-only key/value settings and the host's final
//! username-validity check.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Setting key for the characters legal in titles and display names.
pub const LEGAL_TITLE_CHARS: &str = "LegalTitleChars";

/// Setting key for the characters the host forbids in usernames.
pub const INVALID_USERNAME_CHARS: &str = "InvalidUsernameCharacters";

/// Read-only access to host site settings and naming rules.
///
/// The two character settings are regex character-class bodies, so ranges
/// such as `a-zA-Z0-9` are allowed; see [`crate::realname`] for how they are
/// applied.
pub trait SiteConfig: Send + Sync {
    /// Returns the value of a named site setting, if the host defines it.
    fn setting(&self, key: &str) -> Option<String>;

    /// The host's username-validity check.
    fn is_valid_username(&self, username: &str) -> bool;
}

/// A fixed, in-memory [`SiteConfig`].
///
/// For hosts whose settings are known at wiring time, and for tests. The
/// default validity check accepts every name.
#[derive(Clone)]
pub struct StaticSiteConfig {
    settings: HashMap<String, String>,
    validator: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl StaticSiteConfig {
    /// Creates an empty configuration that accepts every username.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: HashMap::new(),
            validator: Arc::new(|_| true),
        }
    }

    /// Adds a setting value.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Replaces the username-validity check.
    #[must_use]
    pub fn with_username_validator(
        mut self,
        validator: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validator = Arc::new(validator);
        self
    }
}

impl Default for StaticSiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StaticSiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSiteConfig")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SiteConfig for StaticSiteConfig {
    fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn is_valid_username(&self, username: &str) -> bool {
        (self.validator)(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_lookup() {
        let site = StaticSiteConfig::new()
            .with_setting(LEGAL_TITLE_CHARS, "a-zA-Z0-9")
            .with_setting(INVALID_USERNAME_CHARS, "@:");

        assert_eq!(site.setting(LEGAL_TITLE_CHARS).as_deref(), Some("a-zA-Z0-9"));
        assert_eq!(site.setting(INVALID_USERNAME_CHARS).as_deref(), Some("@:"));
        assert_eq!(site.setting("SomethingElse"), None);
    }

    #[test]
    fn test_default_validator_accepts_everything() {
        let site = StaticSiteConfig::new();

        assert!(site.is_valid_username("Anything Goes (42)"));
        assert!(site.is_valid_username(""));
    }

    #[test]
    fn test_custom_validator() {
        let site = StaticSiteConfig::new()
            .with_username_validator(|name| !name.starts_with(char::is_whitespace));

        assert!(site.is_valid_username("Nelly (42)"));
        assert!(!site.is_valid_username(" (42)"));
    }
}
