//! Builder for creating a [`Catalog`] with a fluent interface.
//!
//! Every `add_*` method consumes the builder and returns it again on
//! success, so an error drops everything loaded so far and no partial
//! catalog can escape.
//!
//! # Example
//!
//! ```rust,no_run
//! use message_format::{Catalog, Locale};
//!
//! let catalog = Catalog::builder("en".parse()?)
//!     .add_file("lang/en.properties")?
//!     .add_file("lang/de_DE.properties")?
//!     .add_dir("lang/extra")?
//!     .build();
//! # Ok::<(), message_format::Error>(())
//! ```

use std::{
    collections::{BTreeMap, BTreeSet, btree_map::Entry},
    path::Path,
};

use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, Source},
    error::Error,
    formats::{CsvTable, FormatType, PropertiesFormat},
    load_options::LoadOptions,
    locale::Locale,
    traits::Parser,
    types::Template,
};

#[derive(Debug)]
pub struct CatalogBuilder {
    default_locale: Locale,
    options: LoadOptions,
    tables: BTreeMap<Locale, BTreeMap<String, Template>>,
}

impl CatalogBuilder {
    /// Creates a new `CatalogBuilder` with no entries.
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            options: LoadOptions::default(),
            tables: BTreeMap::new(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds any [`Source`].
    pub fn add_source(self, source: Source) -> Result<Self, Error> {
        match source {
            Source::Text {
                name,
                locale,
                format,
                content,
            } => self.add_text(&name, locale, format, &content),
            Source::File(path) => self.add_file(path),
            Source::Dir(path) => self.add_dir(path),
        }
    }

    /// Adds properties content for `locale`.
    pub fn add_str(self, locale: Locale, content: &str) -> Result<Self, Error> {
        let name = format!("<{}>", locale);
        self.add_text(&name, Some(locale), FormatType::Properties, content)
    }

    /// Adds multi-locale CSV content.
    pub fn add_csv_str(self, content: &str) -> Result<Self, Error> {
        self.add_text("<csv>", None, FormatType::Csv, content)
    }

    fn add_text(
        self,
        name: &str,
        locale: Option<Locale>,
        format: FormatType,
        content: &str,
    ) -> Result<Self, Error> {
        match format {
            FormatType::Properties => {
                let parsed = PropertiesFormat::from_str(content, name)?;
                let locale = locale.or_else(|| parsed.locale.clone()).ok_or_else(|| {
                    Error::malformed_resource(name, 0, "no locale given for properties content")
                })?;
                self.merge_properties(name, locale, parsed)
            }
            FormatType::Csv => self.merge_table(name, CsvTable::from_str(content, name)?),
        }
    }

    /// Adds a resource file by inferring its format from the file extension.
    ///
    /// For single-locale files the locale comes from, in order: the
    /// options' locale hint, a `#: Locale:` header, the file stem
    /// (`en_US.properties` → `en-US`).
    pub fn add_file<P: AsRef<Path>>(self, path: P) -> Result<Self, Error> {
        let hint = self.options.locale_hint.clone();
        self.load_file(path.as_ref(), hint)
    }

    /// Adds a resource file with an explicit format and optional locale.
    pub fn add_file_with_format<P: AsRef<Path>>(
        self,
        path: P,
        format: FormatType,
        locale: Option<Locale>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = path.display().to_string();
        match format {
            FormatType::Properties => {
                let parsed = PropertiesFormat::read_from(path)?;
                let locale = match locale.or_else(|| parsed.locale.clone()) {
                    Some(locale) => locale,
                    None => locale_from_stem(path)?,
                };
                self.merge_properties(&name, locale, parsed)
            }
            FormatType::Csv => {
                let table = CsvTable::read_from(path)?;
                self.merge_table(&name, table)
            }
        }
    }

    /// Adds every supported file directly inside `dir`, in file name order.
    ///
    /// Sub-directories, files with other extensions and properties files
    /// whose locale is neither in a `#: Locale:` header nor in the file stem
    /// are skipped.
    pub fn add_dir<P: AsRef<Path>>(mut self, dir: P) -> Result<Self, Error> {
        let mut paths = std::fs::read_dir(dir.as_ref())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        for path in paths {
            if path.is_dir() {
                debug!(path = %path.display(), "skipping directory");
                continue;
            }
            match FormatType::from_path(&path) {
                None => {
                    debug!(path = %path.display(), "skipping unsupported file");
                }
                Some(FormatType::Csv) => {
                    self = self.add_file_with_format(&path, FormatType::Csv, None)?;
                }
                Some(FormatType::Properties) => {
                    let parsed = PropertiesFormat::read_from(&path)?;
                    let locale = parsed
                        .locale
                        .clone()
                        .or_else(|| locale_from_stem(&path).ok());
                    match locale {
                        Some(locale) => {
                            let name = path.display().to_string();
                            self = self.merge_properties(&name, locale, parsed)?;
                        }
                        None => {
                            debug!(path = %path.display(), "skipping file without a locale");
                        }
                    }
                }
            }
        }
        Ok(self)
    }

    fn load_file(self, path: &Path, locale: Option<Locale>) -> Result<Self, Error> {
        let format = FormatType::from_path(path).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "cannot infer format from file extension: {:?}",
                path.extension()
            ))
        })?;
        self.add_file_with_format(path, format, locale)
    }

    fn merge_properties(
        mut self,
        name: &str,
        locale: Locale,
        parsed: PropertiesFormat,
    ) -> Result<Self, Error> {
        let count = parsed.pairs.len();
        for pair in &parsed.pairs {
            let value = if self.options.strip_quotes {
                pair.unquoted_value()
            } else {
                pair.value.as_str()
            };
            self.insert(&locale, &pair.key, value, name, pair.line)?;
        }
        debug!(source = name, locale = %locale, entries = count, "loaded properties");
        Ok(self)
    }

    fn merge_table(mut self, name: &str, table: CsvTable) -> Result<Self, Error> {
        for (index, locale) in table.locales.iter().enumerate() {
            for (key, value, line) in table.column(index) {
                self.insert(locale, key, value, name, line)?;
            }
        }
        // Rows with every cell empty still claim their key.
        let mut seen = BTreeSet::new();
        for row in &table.rows {
            if !seen.insert(row.key.as_str()) {
                return Err(Error::DuplicateKey {
                    locale: table.locales[0].to_string(),
                    key: row.key.clone(),
                    source_name: name.to_string(),
                    line: row.line,
                });
            }
        }
        debug!(
            source = name,
            locales = table.locales.len(),
            rows = table.rows.len(),
            "loaded csv table"
        );
        Ok(self)
    }

    fn insert(
        &mut self,
        locale: &Locale,
        key: &str,
        value: &str,
        name: &str,
        line: usize,
    ) -> Result<(), Error> {
        let table = self.tables.entry(locale.clone()).or_default();
        match table.entry(key.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateKey {
                locale: locale.to_string(),
                key: key.to_string(),
                source_name: name.to_string(),
                line,
            }),
            Entry::Vacant(slot) => {
                slot.insert(Template::from(value));
                Ok(())
            }
        }
    }

    /// Builds the immutable [`Catalog`].
    pub fn build(self) -> Catalog {
        if !self.tables.contains_key(&self.default_locale) {
            warn!(
                default_locale = %self.default_locale,
                "default locale has no entries; lookups only succeed for exact locales"
            );
        }
        Catalog::from_parts(self.default_locale, self.tables)
    }
}

fn locale_from_stem(path: &Path) -> Result<Locale, Error> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Locale::new(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::new(tag).unwrap()
    }

    #[test]
    fn test_duplicate_key_in_one_source() {
        let result = CatalogBuilder::new(locale("en")).add_str(locale("en"), "a = 1\nb = 2\na = 3\n");
        match result {
            Err(Error::DuplicateKey {
                locale, key, line, ..
            }) => {
                assert_eq!(locale, "en");
                assert_eq!(key, "a");
                assert_eq!(line, 3);
            }
            Ok(_) => panic!("Expected DuplicateKey, got a builder"),
            Err(other) => panic!("Expected DuplicateKey, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key_across_sources_of_one_locale() {
        let result = CatalogBuilder::new(locale("en"))
            .add_str(locale("en"), "a = 1\n")
            .and_then(|b| b.add_csv_str("key,en,fr\na,one,un\n"));
        assert!(matches!(result, Err(Error::DuplicateKey { .. })));
    }

    #[test]
    fn test_same_key_in_different_locales_is_fine() {
        let catalog = CatalogBuilder::new(locale("en"))
            .add_str(locale("en"), "a = 1\n")
            .and_then(|b| b.add_str(locale("fr"), "a = un\n"))
            .unwrap()
            .build();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_csv_rows_merge_per_locale() {
        let catalog = CatalogBuilder::new(locale("en"))
            .add_csv_str("key,en,fr\ngreet,Hello,Bonjour\nbye,Bye,\n")
            .unwrap()
            .build();
        assert!(catalog.has_key(&locale("fr"), "greet"));
        assert!(!catalog.has_key(&locale("fr"), "bye"));
        assert_eq!(catalog.keys(&locale("en")), vec!["bye", "greet"]);
    }

    #[test]
    fn test_csv_duplicate_row_with_empty_cells() {
        let result = CatalogBuilder::new(locale("en")).add_csv_str("key,en\nx,\nx,\n");
        assert!(matches!(result, Err(Error::DuplicateKey { line: 3, .. })));
    }

    #[test]
    fn test_quote_stripping_option() {
        let stripped = CatalogBuilder::new(locale("en"))
            .add_str(locale("en"), "q = 'quoted'\n")
            .unwrap()
            .build();
        assert_eq!(stripped.get(&locale("en"), "q").unwrap().as_str(), "quoted");

        let kept = CatalogBuilder::new(locale("en"))
            .with_options(LoadOptions::new().with_strip_quotes(false))
            .add_str(locale("en"), "q = 'quoted'\n")
            .unwrap()
            .build();
        assert_eq!(kept.get(&locale("en"), "q").unwrap().as_str(), "'quoted'");
    }

    #[test]
    fn test_text_source_uses_header_locale() {
        let catalog = CatalogBuilder::new(locale("en"))
            .add_source(Source::Text {
                name: "inline".to_string(),
                locale: None,
                format: FormatType::Properties,
                content: "#: Locale: it\nciao = Ciao\n".to_string(),
            })
            .unwrap()
            .build();
        assert!(catalog.has_key(&locale("it"), "ciao"));
    }

    #[test]
    fn test_text_source_without_locale_fails() {
        let result = CatalogBuilder::new(locale("en")).add_source(Source::Text {
            name: "inline".to_string(),
            locale: None,
            format: FormatType::Properties,
            content: "ciao = Ciao\n".to_string(),
        });
        assert!(matches!(result, Err(Error::MalformedResource { .. })));
    }

    #[test]
    fn test_dir_skips_properties_without_locale() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("en.properties"), "greet = Hello\n").unwrap();
        std::fs::write(dir.path().join("lang.properties"), "greet = Shadow\n").unwrap();
        std::fs::write(dir.path().join("shared.properties"), "#: Locale: fr\ngreet = Salut\n")
            .unwrap();

        let catalog = CatalogBuilder::new(locale("en"))
            .add_dir(dir.path())
            .unwrap()
            .build();
        assert_eq!(catalog.locales(), vec![&locale("en"), &locale("fr")]);
        assert_eq!(catalog.get(&locale("en"), "greet").unwrap().as_str(), "Hello");
    }

    #[test]
    fn test_single_file_without_locale_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lang.properties");
        std::fs::write(&path, "greet = Hello\n").unwrap();
        let result = CatalogBuilder::new(locale("en")).add_file(&path);
        assert!(matches!(result, Err(Error::InvalidLocale(_))));
    }

    #[test]
    fn test_locale_from_stem() {
        assert_eq!(
            locale_from_stem(Path::new("lang/en_US.properties")).unwrap(),
            locale("en-US")
        );
        assert!(matches!(
            locale_from_stem(Path::new("lang/not valid.properties")),
            Err(Error::InvalidLocale(_))
        ));
    }
}
