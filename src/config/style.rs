//! API style selection.

use std::fmt;

/// Request/response shape used against the inference API.
///
/// Parsed case-insensitively; an empty value selects [`ApiStyle::Github`].
/// Anything unrecognized is kept verbatim in [`ApiStyle::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApiStyle {
    /// GitHub Models chat completions (the default).
    #[default]
    Github,
    /// Chat completions, same wire shape as [`ApiStyle::Github`].
    Chat,
    /// Legacy OpenAI-style text completions.
    OpenAi,
    /// Unrecognized value; uses the degraded fallback request path.
    Other(String),
}

impl ApiStyle {
    /// Parse a style name.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self::Github;
        }
        match value.to_lowercase().as_str() {
            "github" => Self::Github,
            "chat" => Self::Chat,
            "openai" => Self::OpenAi,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Returns true for the chat-completion styles.
    #[must_use]
    pub const fn is_chat(&self) -> bool {
        matches!(self, Self::Github | Self::Chat)
    }

    /// Canonical name of the style.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Github => "github",
            Self::Chat => "chat",
            Self::OpenAi => "openai",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ApiStyle {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
