//! The immutable message catalog.
//!
//! A [`Catalog`] maps `(Locale, key)` to a [`Template`] and carries a default
//! locale. Lookups walk this chain and stop at the first hit:
//!
//! 1. the requested locale, then its parent (`en-US` → `en`);
//! 2. the default locale, then its parent;
//! 3. otherwise [`Error::MissingKey`].
//!
//! Catalogs are built once with [`CatalogBuilder`] or [`Catalog::load`] and
//! never mutated afterwards; loading again produces a new catalog.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    builder::CatalogBuilder,
    error::Error,
    formats::{FormatType, PropertiesFormat, properties::Pair},
    load_options::LoadOptions,
    locale::Locale,
    types::Template,
};

/// One input to [`Catalog::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// In-memory content. `locale` is required for single-locale formats
    /// unless the content carries a `#: Locale:` header.
    Text {
        name: String,
        locale: Option<Locale>,
        format: FormatType,
        content: String,
    },
    /// A single file; the format comes from its extension.
    File(PathBuf),
    /// Every supported file directly inside a directory.
    Dir(PathBuf),
}

impl Source {
    /// In-memory properties content for `locale`.
    pub fn properties(locale: Locale, content: impl Into<String>) -> Self {
        Source::Text {
            name: format!("<{}>", locale),
            locale: Some(locale),
            format: FormatType::Properties,
            content: content.into(),
        }
    }

    /// In-memory multi-locale CSV content.
    pub fn csv(content: impl Into<String>) -> Self {
        Source::Text {
            name: "<csv>".to_string(),
            locale: None,
            format: FormatType::Csv,
            content: content.into(),
        }
    }

    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Source::File(path.into())
    }

    pub fn dir<P: Into<PathBuf>>(path: P) -> Self {
        Source::Dir(path.into())
    }
}

/// Immutable collection of templates indexed by locale and key.
///
/// # Example
///
/// ```rust
/// use message_format::{Catalog, Locale, Source};
///
/// let en: Locale = "en".parse()?;
/// let catalog = Catalog::load(en.clone(), [Source::properties(en, "greet = Hello, {name}!")])?;
///
/// let fr: Locale = "fr".parse()?;
/// assert_eq!(catalog.resolve(&fr, "greet")?.as_str(), "Hello, {name}!");
/// assert!(!catalog.has_key(&fr, "greet"));
/// # Ok::<(), message_format::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    default_locale: Locale,
    tables: BTreeMap<Locale, BTreeMap<String, Template>>,
}

impl Catalog {
    pub(crate) fn from_parts(
        default_locale: Locale,
        tables: BTreeMap<Locale, BTreeMap<String, Template>>,
    ) -> Self {
        Catalog {
            default_locale,
            tables,
        }
    }

    /// Creates a builder for a catalog with the given default locale.
    pub fn builder(default_locale: Locale) -> CatalogBuilder {
        CatalogBuilder::new(default_locale)
    }

    /// Loads all `sources` with default [`LoadOptions`].
    ///
    /// Any error aborts the whole load and no catalog is returned.
    pub fn load<I>(default_locale: Locale, sources: I) -> Result<Catalog, Error>
    where
        I: IntoIterator<Item = Source>,
    {
        Self::load_with_options(default_locale, sources, LoadOptions::default())
    }

    /// Loads all `sources` with explicit [`LoadOptions`].
    pub fn load_with_options<I>(
        default_locale: Locale,
        sources: I,
        options: LoadOptions,
    ) -> Result<Catalog, Error>
    where
        I: IntoIterator<Item = Source>,
    {
        sources
            .into_iter()
            .try_fold(
                CatalogBuilder::new(default_locale).with_options(options),
                CatalogBuilder::add_source,
            )
            .map(CatalogBuilder::build)
    }

    /// Returns the template for `key`, walking the locale fallback chain.
    pub fn resolve(&self, locale: &Locale, key: &str) -> Result<&Template, Error> {
        locale
            .chain()
            .into_iter()
            .chain(self.default_locale.chain())
            .find_map(|candidate| self.get(&candidate, key))
            .ok_or_else(|| Error::MissingKey {
                locale: locale.to_string(),
                key: key.to_string(),
            })
    }

    /// Whether `locale` itself defines `key`. No fallback is applied.
    pub fn has_key(&self, locale: &Locale, key: &str) -> bool {
        self.get(locale, key).is_some()
    }

    /// Exact lookup without fallback.
    pub fn get(&self, locale: &Locale, key: &str) -> Option<&Template> {
        self.tables.get(locale).and_then(|table| table.get(key))
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// All locales with at least one entry, sorted.
    pub fn locales(&self) -> Vec<&Locale> {
        self.tables.keys().collect()
    }

    /// Keys defined for `locale`, sorted.
    pub fn keys(&self, locale: &Locale) -> Vec<&str> {
        self.tables
            .get(locale)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of `(locale, key)` entries.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exports one locale as a properties file model, keys sorted.
    pub fn to_properties(&self, locale: &Locale) -> Option<PropertiesFormat> {
        self.tables.get(locale).map(|table| PropertiesFormat {
            locale: Some(locale.clone()),
            pairs: table
                .iter()
                .map(|(key, template)| Pair::new(key.as_str(), template.as_str()))
                .collect(),
        })
    }

    /// Caches the catalog to a JSON snapshot file.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads a catalog from a JSON snapshot written by [`Catalog::cache_to_file`].
    pub fn load_from_cache<P: AsRef<Path>>(path: P) -> Result<Catalog, Error> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
