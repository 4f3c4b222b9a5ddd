//! Resolve-then-render convenience on top of [`Catalog`] and [`Renderer`].

use std::sync::Arc;

use tracing::debug;

use crate::{
    catalog::Catalog,
    error::Error,
    locale::Locale,
    renderer::Renderer,
    types::{PlaceholderMap, Value},
};

/// Pairs a shared catalog with a renderer.
///
/// The catalog is held behind an [`Arc`], so translators are cheap to clone
/// and can be shared across threads. Swapping in a reloaded catalog with
/// [`Translator::with_catalog`] never touches the old one.
///
/// ```rust
/// use message_format::{Catalog, Locale, PlaceholderMap, Renderer, Source, Translator};
///
/// let en: Locale = "en".parse()?;
/// let catalog = Catalog::load(en.clone(), [Source::properties(en, "greet = Hello, {name}!")])?;
/// let translator = Translator::new(catalog, Renderer::new());
///
/// let fr: Locale = "fr".parse()?;
/// let text = translator.translate(&fr, "greet", &PlaceholderMap::new().with("name", "Ava"))?;
/// assert_eq!(text, "Hello, Ava!");
/// # Ok::<(), message_format::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
    renderer: Renderer,
}

impl Translator {
    pub fn new(catalog: impl Into<Arc<Catalog>>, renderer: Renderer) -> Self {
        Translator {
            catalog: catalog.into(),
            renderer,
        }
    }

    /// Returns a translator using `catalog` and this translator's renderer.
    pub fn with_catalog(&self, catalog: impl Into<Arc<Catalog>>) -> Self {
        Translator {
            catalog: catalog.into(),
            renderer: self.renderer.clone(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Resolves `key` for `locale` and renders it with `values`.
    pub fn translate(
        &self,
        locale: &Locale,
        key: &str,
        values: &PlaceholderMap,
    ) -> Result<String, Error> {
        let template = self.catalog.resolve(locale, key)?;
        self.renderer.render(template.as_str(), values)
    }

    /// Like [`Translator::translate`] with positional values bound to
    /// `{0}`, `{1}`, ...
    pub fn translate_args<V>(&self, locale: &Locale, key: &str, args: &[V]) -> Result<String, Error>
    where
        V: Clone + Into<Value>,
    {
        self.translate(locale, key, &PlaceholderMap::positional(args.iter().cloned()))
    }

    /// Like [`Translator::translate`], but a key missing from every locale
    /// renders as the key itself. Other errors still propagate.
    pub fn translate_or_key(
        &self,
        locale: &Locale,
        key: &str,
        values: &PlaceholderMap,
    ) -> Result<String, Error> {
        match self.translate(locale, key, values) {
            Err(Error::MissingKey { .. }) => {
                debug!(locale = %locale, key, "missing key, rendering the key itself");
                Ok(key.to_string())
            }
            other => other,
        }
    }
}
