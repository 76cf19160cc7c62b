use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical tag identifier.
///
/// Always non-empty and made only of ASCII uppercase letters and digits.
/// The only way to build one is [`TagToken::new`], which checks exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagToken(String);

impl TagToken {
    /// Wrap an already-canonical string. Returns `None` if it is not canonical.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if Self::is_canonical(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn is_canonical(value: &str) -> bool {
        !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(format!("not a canonical tag token: {value:?}"))
        }
    }
}

impl From<TagToken> for String {
    fn from(token: TagToken) -> Self {
        token.0
    }
}
