//! Secret string wrapper for the API key.
//!
//! Prevents accidental logging of the token through `Debug`/`Display`.

use std::fmt;

/// A wrapper for sensitive strings that redacts the value in Debug/Display output.
///
/// # Example
///
/// ```
/// use github_models::config::SecretString;
///
/// let secret = SecretString::new("ghp_example_token");
/// assert_eq!(format!("{:?}", secret), "<REDACTED>");
/// assert_eq!(secret.expose(), "ghp_example_token");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new `SecretString` from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trims surrounding whitespace and returns `None` if nothing is left.
    ///
    /// ```
    /// use github_models::config::SecretString;
    ///
    /// assert!(SecretString::from_trimmed("   ").is_none());
    /// assert_eq!(SecretString::from_trimmed(" tok\n").unwrap().expose(), "tok");
    /// ```
    #[must_use]
    pub fn from_trimmed(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self::new(trimmed))
    }

    /// Exposes the underlying secret value.
    ///
    /// Use this only where the token is actually sent, such as the
    /// `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
