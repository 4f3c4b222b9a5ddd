//! Placeholder substitution.
//!
//! A [`Renderer`] turns a template and a [`PlaceholderMap`] into the final
//! string. Substitution is single-pass: substituted values are copied into
//! the output as-is and never scanned for further tokens.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::Error,
    template::{Segment, scan},
    types::{PlaceholderMap, Value},
};

/// What to do when a template names a placeholder that has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPlaceholder {
    /// Emit the token text unchanged, e.g. `{name}`.
    #[default]
    Keep,
    /// Fail with [`Error::UnresolvedPlaceholder`].
    Error,
}

/// Render behavior options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    pub missing: MissingPlaceholder,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the missing placeholder policy.
    pub fn with_missing(mut self, missing: MissingPlaceholder) -> Self {
        self.missing = missing;
        self
    }

    /// Shorthand for `with_missing(MissingPlaceholder::Error)`.
    pub fn strict() -> Self {
        Self::new().with_missing(MissingPlaceholder::Error)
    }
}

/// Formats a placeholder value for a `{name:hint}` token.
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &Value) -> Result<String, Error>;
}

impl<F> ValueFormatter for F
where
    F: Fn(&Value) -> Result<String, Error> + Send + Sync,
{
    fn format(&self, value: &Value) -> Result<String, Error> {
        self(value)
    }
}

/// Substitutes placeholder tokens in templates.
///
/// # Example
///
/// ```rust
/// use message_format::{PlaceholderMap, Renderer};
///
/// let renderer = Renderer::new();
/// let values = PlaceholderMap::new().with("name", "Ava");
/// assert_eq!(renderer.render("Hello, {name}!", &values)?, "Hello, Ava!");
/// assert_eq!(renderer.render("{{name}}", &values)?, "{name}");
/// # Ok::<(), message_format::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
    defaults: PlaceholderMap,
    formatters: HashMap<String, Arc<dyn ValueFormatter>>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hints = self.formatters.keys().collect::<Vec<_>>();
        hints.sort();
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("defaults", &self.defaults)
            .field("formatters", &hints)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Renderer {
            options,
            ..Self::default()
        }
    }

    /// Values used for any placeholder the per-call map does not provide.
    pub fn with_defaults(mut self, defaults: PlaceholderMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Registers a formatter for `{name:hint}` tokens.
    pub fn with_formatter(
        mut self,
        hint: impl Into<String>,
        formatter: impl ValueFormatter + 'static,
    ) -> Self {
        self.formatters.insert(hint.into(), Arc::new(formatter));
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn defaults(&self) -> &PlaceholderMap {
        &self.defaults
    }

    /// Renders `template`, looking names up in `values` and then in the
    /// renderer's defaults.
    pub fn render(&self, template: &str, values: &PlaceholderMap) -> Result<String, Error> {
        let segments = scan(template)?;
        let mut out = String::with_capacity(template.len());

        for segment in segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Escaped(c) => out.push(c),
                Segment::Token(token) => {
                    let value = values
                        .get(token.name)
                        .or_else(|| self.defaults.get(token.name));
                    match (value, token.hint) {
                        (Some(value), None) => out.push_str(&value.to_string()),
                        (Some(value), Some(hint)) => {
                            let formatter = self
                                .formatters
                                .get(hint)
                                .ok_or_else(|| Error::UnknownFormatter(hint.to_string()))?;
                            out.push_str(&formatter.format(value)?);
                        }
                        (None, _) => match self.options.missing {
                            MissingPlaceholder::Keep => {
                                trace!(placeholder = token.name, "keeping unresolved placeholder");
                                out.push_str(token.raw);
                            }
                            MissingPlaceholder::Error => {
                                return Err(Error::UnresolvedPlaceholder(token.name.to_string()));
                            }
                        },
                    }
                }
            }
        }

        Ok(out)
    }
}
