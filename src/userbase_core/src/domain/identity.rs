//! Values exchanged with the external identity provider.
//!
//! The provider owns sessions, password verification and the OAuth2
//! protocol. These types only carry what crosses the boundary.

use secrecy::Secret;

use super::email::Email;

/// Login credentials forwarded to the identity provider.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: Secret<String>,
}

/// The authorization code (and optional state) an OAuth2 provider redirected
/// back with.
#[derive(Debug, Clone)]
pub struct OAuthCallback {
    pub provider: String,
    pub code: String,
    pub state: Option<String>,
}

/// Caller context the provider needs to correlate its own cookies.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub cookie: Option<String>,
}

/// The provider's answer, passed back to the caller untouched.
///
/// `headers` holds the provider's end-to-end response headers in order,
/// repeated names included (`Set-Cookie`, `Location`, ...).
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl IdentitySession {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Values of every header called `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_values("set-cookie").collect()
    }

    /// Email the provider reported for the authenticated identity, if any.
    pub fn email(&self) -> Option<&str> {
        self.body.get("email")?.as_str()
    }
}
