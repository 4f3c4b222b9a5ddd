//! Locale identifiers used as catalog lookup keys.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A validated `language[-region]` identifier in canonical BCP-47 form.
///
/// Both `-` and `_` are accepted as separators so that file stems such as
/// `en_US` parse, but the stored tag always uses `-` (`en-US`).
///
/// ```rust
/// use message_format::Locale;
///
/// let locale: Locale = "en_us".parse()?;
/// assert_eq!(locale.as_str(), "en-US");
/// assert_eq!(locale.language(), "en");
/// # Ok::<(), message_format::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Parses and canonicalizes a locale tag.
    pub fn new(tag: &str) -> Result<Self, Error> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLocale(tag.to_string()));
        }
        let id: LanguageIdentifier = trimmed
            .replace('_', "-")
            .parse()
            .map_err(|_| Error::InvalidLocale(tag.to_string()))?;
        Ok(Locale(id.to_string()))
    }

    /// The canonical tag, e.g. `en-US`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, e.g. `en` for `en-US`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// The next less specific locale, if any (`en-US` → `en`).
    pub fn parent(&self) -> Option<Locale> {
        if self.0.contains('-') {
            Some(Locale(self.language().to_string()))
        } else {
            None
        }
    }

    /// This locale followed by its parents, most specific first.
    pub fn chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        if let Some(parent) = self.parent() {
            chain.push(parent);
        }
        chain
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::new(&value)
    }
}

impl TryFrom<&str> for Locale {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Locale::new(value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
