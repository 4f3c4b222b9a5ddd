//! Options controlling how message sources are read into a [`crate::Catalog`].

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Read behavior options for [`crate::CatalogBuilder`] file-loading APIs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Locale applied to single-locale files added with `add_file`, taking
    /// precedence over a `#: Locale:` header and the file name.
    pub locale_hint: Option<Locale>,
    /// Whether values wrapped in single quotes (`'text'`) lose the quotes.
    pub strip_quotes: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            locale_hint: None,
            strip_quotes: true,
        }
    }
}

impl LoadOptions {
    /// Creates default load options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a locale hint.
    pub fn with_locale_hint(mut self, locale_hint: Option<Locale>) -> Self {
        self.locale_hint = locale_hint;
        self
    }

    /// Enables/disables quote stripping.
    pub fn with_strip_quotes(mut self, strip_quotes: bool) -> Self {
        self.strip_quotes = strip_quotes;
        self
    }
}
