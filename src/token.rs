use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::config::DEFAULT_TOKEN_PREFIX;

/// The per-page anti-forgery token.
///
/// One token exists per page session and is shared by every form on the
/// page. It is immutable once generated and never persisted.
///
/// # Security Properties
///
/// - `Debug` and `Display` never print the value
/// - Access requires the explicit [`expose`](Self::expose) call
/// - The value is "probably unique", NOT cryptographically strong. A server
///   that wants to verify it as a real CSRF secret must mint it from a CSPRNG
///   instead of using [`TokenProvider`].
///
/// # Examples
///
/// ```
/// use form_guard::TokenProvider;
///
/// let token = TokenProvider::default().generate();
///
/// assert_eq!(format!("{:?}", token), "CsrfToken([REDACTED])");
/// assert!(token.expose().starts_with("csrf_"));
/// ```
// Do NOT add Default: an empty token would be injected silently.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken {
    value: String,
}

impl CsrfToken {
    /// Returns the token value for injection into a form.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Returns true if `candidate` equals this token.
    pub fn matches(&self, candidate: &str) -> bool {
        self.value == candidate
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken([REDACTED])")
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Generates page tokens: `<prefix><random base-36><timestamp base-36>`.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    prefix: String,
}

impl TokenProvider {
    /// Creates a provider with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generates a fresh token from the thread RNG and the wall clock.
    pub fn generate(&self) -> CsrfToken {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        self.generate_with(&mut rand::thread_rng(), millis)
    }

    /// Generates a token from an explicit RNG and timestamp.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, timestamp_millis: u64) -> CsrfToken {
        let random: u64 = rng.gen();

        let mut value = String::with_capacity(self.prefix.len() + 24);
        value.push_str(&self.prefix);
        value.push_str(&to_base36(random));
        value.push_str(&to_base36(timestamp_millis));

        CsrfToken { value }
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_PREFIX)
    }
}

/// Formats `n` in lowercase base 36.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}
