//! Admin session secret handling
//!
//! The admin panel uses a single shared secret as its only credential. The
//! session "token" is the secret itself, carried in a cookie set at login.
//! There is no per-user identity and no server-side session store; validity
//! is exact equality with the configured secret.
//!
//! Comparison is constant-time so the cookie/password check does not leak
//! prefix length through timing.

use subtle::ConstantTimeEq;

use crate::{Error, Result};

/// Name of the session cookie set by the login endpoint
pub const SESSION_COOKIE: &str = "rastreo_session";

/// The configured admin secret.
///
/// Constructed once at startup; an empty secret is a configuration error and
/// the process must not come up without one.
#[derive(Clone)]
pub struct SessionSecret {
    secret: String,
}

impl SessionSecret {
    /// Wrap the configured admin password, rejecting empty values
    pub fn new(secret: String) -> Result<Self> {
        if secret.trim().is_empty() {
            return Err(Error::Config(
                "admin password is not set (use --admin-password, RASTREO_ADMIN_PASSWORD, or the config file)"
                    .to_string(),
            ));
        }
        Ok(Self { secret })
    }

    /// Constant-time comparison of a presented credential against the secret
    pub fn verify(&self, presented: &str) -> bool {
        constant_time_str_eq(presented, &self.secret)
    }

    /// Cookie value issued at login (equal to the secret itself)
    pub fn cookie_value(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for SessionSecret {
    // Never print the secret in logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSecret").finish_non_exhaustive()
    }
}

/// Constant-time comparison of two strings
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extract a cookie value from a `Cookie` request header
///
/// Minimal parser: splits on `;`, trims, and matches `name=value` pairs.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        if k == name {
            Some(v)
        } else {
            None
        }
    })
}
