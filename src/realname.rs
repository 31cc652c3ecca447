//! Display-name derivation.
//!
//! Discord usernames are free-form; wiki display names are not. This module
//! turns a raw provider username into a name the host will accept: replace
//! every disallowed character, tidy the result, and suffix the provider id
//! so two identically-named users stay distinguishable.

use regex::Regex;

use crate::host::{INVALID_USERNAME_CHARS, LEGAL_TITLE_CHARS, SiteConfig};

/// Derives the host-legal display name for a provider identity.
///
/// The derived form is `<sanitized username> (<id>)`. When the host's
/// validity check rejects that, or the host's character settings do not form
/// a usable pattern, the provider id alone is returned so login is never
/// blocked by an unusable display name.
pub fn derive_realname(site: &dyn SiteConfig, id: &str, username: &str) -> String {
    match format_realname(site, id, username) {
        Some(name) if site.is_valid_username(&name) => name,
        _ => id.to_string(),
    }
}

fn format_realname(site: &dyn SiteConfig, id: &str, username: &str) -> Option<String> {
    Some(format!("{} ({id})", sanitize_username(site, username)?))
}

/// Replaces every character that is outside the host's legal set, inside the
/// host's invalid set, or a literal `/`, with `-`. The replaced name is then
/// trimmed and its first character upper-cased.
fn sanitize_username(site: &dyn SiteConfig, username: &str) -> Option<String> {
    let legal = site.setting(LEGAL_TITLE_CHARS).unwrap_or_default();
    let invalid = site.setting(INVALID_USERNAME_CHARS).unwrap_or_default();

    let pattern = match disallowed_chars(&legal, &invalid) {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::warn!("Unusable username character settings: {}", err);
            return None;
        }
    };

    let replaced = pattern.replace_all(username, "-");
    Some(capitalize_first(replaced.trim()))
}

/// Builds the pattern matching each disallowed character. The settings are
/// regex character-class bodies; an empty setting contributes no branch.
fn disallowed_chars(legal: &str, invalid: &str) -> Result<Regex, regex::Error> {
    let mut branches = Vec::new();
    if !legal.is_empty() {
        branches.push(format!("[^{legal}]"));
    }
    if !invalid.is_empty() {
        branches.push(format!("[{invalid}]"));
    }
    branches.push("/".to_string());
    Regex::new(&branches.join("|"))
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
