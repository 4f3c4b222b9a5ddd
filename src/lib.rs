#![forbid(unsafe_code)]
//! Simple message translation and placeholder replacement.
//!
//! A host application loads its per-locale messages once into an immutable
//! [`Catalog`], then renders messages by key with a [`Renderer`]:
//!
//! ```rust
//! use message_format::{Catalog, Locale, PlaceholderMap, Renderer, Source};
//!
//! let en: Locale = "en".parse()?;
//! let catalog = Catalog::load(
//!     en.clone(),
//!     [
//!         Source::properties(en, "greet = Hello, {name}!"),
//!         Source::properties("de".parse()?, "greet = Hallo, {name}!"),
//!     ],
//! )?;
//!
//! let template = catalog.resolve(&"fr".parse()?, "greet")?;
//! let text = Renderer::new().render(template.as_str(), &PlaceholderMap::new().with("name", "Ava"))?;
//! assert_eq!(text, "Hello, Ava!");
//! # Ok::<(), message_format::Error>(())
//! ```
//!
//! # Formats
//!
//! - **properties**: `key = value` lines, one locale per file
//! - **CSV**: a `key` column plus one column per locale
//!
//! # Templates
//!
//! `{name}` is replaced by the value named `name`; `{name:hint}` passes the
//! value through the formatter registered for `hint`. `{{` and `}}` produce
//! literal braces. Substitution is single-pass.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod formats;
pub mod load_options;
pub mod locale;
pub mod renderer;
pub mod template;
pub mod traits;
pub mod translator;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    builder::CatalogBuilder,
    catalog::{Catalog, Source},
    error::Error,
    formats::FormatType,
    load_options::LoadOptions,
    locale::Locale,
    renderer::{MissingPlaceholder, RenderOptions, Renderer, ValueFormatter},
    translator::Translator,
    types::{PlaceholderMap, Template, Value},
};
