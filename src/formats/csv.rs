//! Support for multi-locale CSV message tables.
//!
//! The first row is a header naming one locale per column after `key`:
//!
//! ```text
//! key,en,fr
//! greet,"Hello, {name}!","Bonjour, {name} !"
//! bye,Goodbye,
//! ```
//!
//! An empty cell means the locale has no entry for that key.

use std::io::{BufRead, Write};

use crate::{error::Error, locale::Locale, traits::Parser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub locales: Vec<Locale>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    /// One cell per entry of [`Table::locales`].
    pub values: Vec<Option<String>>,
    /// 1-based line of the record.
    pub line: usize,
}

impl Table {
    /// Values of one locale column as `(key, value, line)`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = (&str, &str, usize)> + '_ {
        self.rows.iter().filter_map(move |row| {
            row.values
                .get(index)
                .and_then(|v| v.as_deref())
                .map(|value| (row.key.as_str(), value, row.line))
        })
    }
}

fn csv_error(source_name: &str, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.kind() {
        csv::ErrorKind::UnequalLengths { .. } => {
            Error::malformed_resource(source_name, line, "row width does not match header")
        }
        csv::ErrorKind::Utf8 { .. } => {
            Error::malformed_resource(source_name, line, "content is not valid UTF-8")
        }
        _ => Error::Csv(err),
    }
}

impl Parser for Table {
    fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut records = rdr.records();

        let header = match records.next() {
            Some(header) => header.map_err(|e| csv_error(source_name, e))?,
            None => {
                return Err(Error::malformed_resource(source_name, 1, "missing header row"));
            }
        };
        let mut columns = header.iter().map(|cell| cell.trim_start_matches('\u{feff}').trim());
        if columns.next() != Some("key") {
            return Err(Error::malformed_resource(
                source_name,
                1,
                "first header column must be `key`",
            ));
        }
        let locales = columns
            .map(|tag| {
                Locale::new(tag).map_err(|_| {
                    Error::malformed_resource(source_name, 1, format!("invalid locale `{}`", tag))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if locales.is_empty() {
            return Err(Error::malformed_resource(
                source_name,
                1,
                "header names no locale columns",
            ));
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|e| csv_error(source_name, e))?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let mut cells = record.iter();
            let key = cells.next().unwrap_or_default().trim().to_string();
            if key.is_empty() {
                return Err(Error::malformed_resource(source_name, line, "empty key"));
            }
            rows.push(Row {
                key,
                values: cells
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
                line,
            });
        }

        Ok(Table { locales, rows })
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(
            std::iter::once("key").chain(self.locales.iter().map(Locale::as_str)),
        )?;
        for row in &self.rows {
            wtr.write_record(
                std::iter::once(row.key.as_str())
                    .chain(row.values.iter().map(|v| v.as_deref().unwrap_or_default())),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}
