//! Support for the `key = value` properties format.
//!
//! ```text
//! #: Locale: en
//! # Shown on the start screen
//! greet = Hello, {name}!
//! farewell: Goodbye, \
//!           {name}.
//! ```
//!
//! - `#` and `!` start a comment line; `#: Locale: <tag>` is a header that
//!   names the file's locale.
//! - The first unescaped `=` or `:` separates key and value. Unescaped
//!   whitespace around both is trimmed.
//! - A line ending in an odd number of backslashes continues on the next line.
//! - Escapes: `\n`, `\t`, `\r`, `\f`, `\uXXXX` (a surrogate pair such as
//!   `\uD83D\uDE00` yields one character), and `\` before any other
//!   character yields that character.
//! - A value wrapped in unescaped single quotes is marked as quoted.

use std::io::{BufRead, ErrorKind, Write};

use indoc::indoc;

use crate::{error::Error, locale::Locale, traits::Parser};

/// A parsed properties file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Locale named by a `#: Locale:` header, if any.
    pub locale: Option<Locale>,
    /// Entries in file order. Duplicates are kept; the catalog rejects them.
    pub pairs: Vec<Pair>,
}

/// A single `key = value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    /// Unescaped value, including any surrounding quotes.
    pub value: String,
    /// Whether the raw value was wrapped in unescaped single quotes.
    pub quoted: bool,
    /// 1-based line where the entry starts.
    pub line: usize,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Pair {
            key: key.into(),
            value: value.into(),
            quoted: false,
            line: 0,
        }
    }

    /// The value with its surrounding quotes removed when it was quoted.
    pub fn unquoted_value(&self) -> &str {
        if !self.quoted {
            return &self.value;
        }
        self.value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .unwrap_or(&self.value)
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self, Error> {
        let mut format = Format::default();
        let mut logical = String::new();
        let mut logical_start = 0;
        let mut continuing = false;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => {
                    Error::malformed_resource(source_name, line_no, "content is not valid UTF-8")
                }
                _ => Error::Io(e),
            })?;
            let line = if index == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let line = line.trim_start();

            if !continuing {
                if let Some(header) = line.strip_prefix("#:") {
                    if let Some((name, value)) = header.split_once(':') {
                        if name.trim().eq_ignore_ascii_case("locale") {
                            format.locale = Some(Locale::new(value.trim()).map_err(|_| {
                                Error::malformed_resource(
                                    source_name,
                                    line_no,
                                    format!("invalid locale header `{}`", value.trim()),
                                )
                            })?);
                        }
                    }
                    continue;
                }
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                logical_start = line_no;
            }

            if ends_with_continuation(line) {
                logical.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }

            logical.push_str(line);
            continuing = false;
            format
                .pairs
                .push(parse_entry(&logical, source_name, logical_start)?);
            logical.clear();
        }

        if continuing && !logical.trim().is_empty() {
            format
                .pairs
                .push(parse_entry(&logical, source_name, logical_start)?);
        }

        Ok(format)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(indoc! {"
            # This file is generated by message-format.
            # Placeholders use {name}; write {{ and }} for literal braces.
        "});
        if let Some(locale) = &self.locale {
            content.push_str(&format!("#: Locale: {}\n", locale));
        }
        content.push('\n');

        for pair in &self.pairs {
            content.push_str(&escape(&pair.key, true));
            content.push_str(" = ");
            content.push_str(&escape(&pair.value, false));
            content.push('\n');
        }

        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn parse_entry(logical: &str, source_name: &str, line: usize) -> Result<Pair, Error> {
    let mut escaped = false;
    let mut separator = None;
    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            separator = Some(i);
            break;
        }
    }

    let Some(separator) = separator else {
        return Err(Error::malformed_resource(
            source_name,
            line,
            "expected `key = value`",
        ));
    };

    let key = unescape(&logical[..separator], source_name, line)?;
    if key.text.is_empty() {
        return Err(Error::malformed_resource(source_name, line, "empty key"));
    }
    let value = unescape(&logical[separator + 1..], source_name, line)?;

    Ok(Pair {
        key: key.text,
        value: value.text,
        quoted: value.quoted,
        line,
    })
}

struct Unescaped {
    text: String,
    quoted: bool,
}

/// Resolves escapes and trims whitespace that was not escaped.
fn unescape(raw: &str, source_name: &str, line: usize) -> Result<Unescaped, Error> {
    let mut chars: Vec<(char, bool)> = Vec::with_capacity(raw.len());
    let mut iter = raw.chars();

    while let Some(c) = iter.next() {
        if c != '\\' {
            chars.push((c, false));
            continue;
        }
        let Some(next) = iter.next() else {
            break;
        };
        let resolved = match next {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'f' => '\u{000c}',
            'u' => {
                let hex: String = iter.by_ref().take(4).collect();
                let invalid = || {
                    Error::malformed_resource(
                        source_name,
                        line,
                        format!("invalid unicode escape `\\u{}`", hex),
                    )
                };
                let unit = code_unit(&hex).ok_or_else(invalid)?;
                if (0xD800..=0xDBFF).contains(&unit) {
                    // A high surrogate must be followed by `\uXXXX` holding the low half.
                    let low = iter
                        .as_str()
                        .strip_prefix("\\u")
                        .and_then(|rest| rest.get(..4))
                        .and_then(code_unit)
                        .filter(|low| (0xDC00..=0xDFFF).contains(low))
                        .ok_or_else(invalid)?;
                    iter.nth(5);
                    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                        .ok_or_else(invalid)?
                } else {
                    char::from_u32(unit).ok_or_else(invalid)?
                }
            }
            other => other,
        };
        chars.push((resolved, true));
    }

    let start = chars
        .iter()
        .position(|&(c, escaped)| escaped || !c.is_whitespace())
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|&(c, escaped)| escaped || !c.is_whitespace())
        .map_or(start, |i| i + 1);
    let trimmed = &chars[start..end];

    let quoted = trimmed.len() >= 2
        && trimmed[0] == ('\'', false)
        && trimmed[trimmed.len() - 1] == ('\'', false);

    Ok(Unescaped {
        text: trimmed.iter().map(|&(c, _)| c).collect(),
        quoted,
    })
}

/// Parses exactly four hex digits; signs and other characters are rejected.
fn code_unit(hex: &str) -> Option<u32> {
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let last = text.chars().count().saturating_sub(1);
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{000c}' => out.push_str("\\f"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            '\'' if !is_key && (i == 0 || i == last) => out.push_str("\\'"),
            c if c.is_whitespace() && (is_key || i == 0 || i == last) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Format, Error> {
        Format::from_str(content, "test.properties")
    }

    #[test]
    fn test_parse_basic_pairs_and_comments() {
        let content = indoc! {"
            # Greeting for the user
            greet = Hello, {name}!
            ! old-style comment
            farewell:Goodbye
        "};
        let parsed = parse(content).unwrap();
        assert_eq!(parsed.pairs.len(), 2);
        assert_eq!(parsed.pairs[0].key, "greet");
        assert_eq!(parsed.pairs[0].value, "Hello, {name}!");
        assert_eq!(parsed.pairs[0].line, 2);
        assert_eq!(parsed.pairs[1].key, "farewell");
        assert_eq!(parsed.pairs[1].value, "Goodbye");
        assert_eq!(parsed.pairs[1].line, 4);
    }

    #[test]
    fn test_locale_header() {
        let parsed = parse("#: Locale: de_AT\nkey = Wert\n").unwrap();
        assert_eq!(parsed.locale, Some(Locale::new("de-AT").unwrap()));

        let err = parse("#: Locale: !!\n").unwrap_err();
        assert!(matches!(err, Error::MalformedResource { line: 1, .. }));
    }

    #[test]
    fn test_separator_inside_value() {
        let parsed = parse("url = https://example.com/?a=b\n").unwrap();
        assert_eq!(parsed.pairs[0].key, "url");
        assert_eq!(parsed.pairs[0].value, "https://example.com/?a=b");
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let parsed = parse(r"a\=b\:c = value").unwrap();
        assert_eq!(parsed.pairs[0].key, "a=b:c");
    }

    #[test]
    fn test_line_continuation() {
        let content = "multi = first, \\\n        second\nnext = ok\n";
        let parsed = parse(content).unwrap();
        assert_eq!(parsed.pairs.len(), 2);
        assert_eq!(parsed.pairs[0].value, "first, second");
        assert_eq!(parsed.pairs[0].line, 1);
        assert_eq!(parsed.pairs[1].line, 3);
    }

    #[test]
    fn test_escapes() {
        let parsed = parse(r"k = tab\there\nnew \u00e9 \\ \ ").unwrap();
        assert_eq!(parsed.pairs[0].value, "tab\there\nnew é \\  ");
    }

    #[test]
    fn test_invalid_unicode_escape() {
        let err = parse("k = \\u12G4\n").unwrap_err();
        assert!(matches!(err, Error::MalformedResource { line: 1, .. }));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let parsed = parse("smile = \\uD83D\\uDE00!\n").unwrap();
        assert_eq!(parsed.pairs[0].value, "\u{1F600}!");
    }

    #[test]
    fn test_lone_surrogate_is_malformed() {
        for content in ["k = \\uD83D\n", "k = \\uD83Dx\n", "k = \\uDE00\n", "k = \\uD83D\\u0041\n"] {
            assert!(
                matches!(parse(content), Err(Error::MalformedResource { line: 1, .. })),
                "{:?} should be malformed",
                content
            );
        }
    }

    #[test]
    fn test_signed_unicode_escape_is_malformed() {
        assert!(matches!(
            parse("k = \\u+041\n"),
            Err(Error::MalformedResource { .. })
        ));
    }

    #[test]
    fn test_unquoted_value_tolerates_inconsistent_flag() {
        let pair = Pair {
            quoted: true,
            ..Pair::new("k", "x")
        };
        assert_eq!(pair.unquoted_value(), "x");
        let pair = Pair {
            quoted: true,
            ..Pair::new("k", "")
        };
        assert_eq!(pair.unquoted_value(), "");
    }

    #[test]
    fn test_line_without_separator_is_malformed() {
        let err = parse("good = yes\nbad line without separator\n").unwrap_err();
        match err {
            Error::MalformedResource {
                source_name, line, ..
            } => {
                assert_eq!(source_name, "test.properties");
                assert_eq!(line, 2);
            }
            other => panic!("Expected MalformedResource, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_key_is_malformed() {
        assert!(matches!(
            parse(" = value"),
            Err(Error::MalformedResource { .. })
        ));
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let parsed = parse("empty =\n").unwrap();
        assert_eq!(parsed.pairs[0].value, "");
    }

    #[test]
    fn test_quoted_value() {
        let parsed = parse("q = 'quoted text'\nplain = it's\n").unwrap();
        assert!(parsed.pairs[0].quoted);
        assert_eq!(parsed.pairs[0].unquoted_value(), "quoted text");
        assert!(!parsed.pairs[1].quoted);
        assert_eq!(parsed.pairs[1].unquoted_value(), "it's");
    }

    #[test]
    fn test_bom_is_skipped() {
        let parsed = parse("\u{feff}key = value").unwrap();
        assert_eq!(parsed.pairs[0].key, "key");
    }

    #[test]
    fn test_duplicates_are_preserved_for_the_catalog() {
        let parsed = parse("k = 1\nk = 2\n").unwrap();
        assert_eq!(parsed.pairs.len(), 2);
    }

    #[test]
    fn test_round_trip_serialization() {
        let original = Format {
            locale: Some(Locale::new("en").unwrap()),
            pairs: vec![
                Pair::new("greet", "Hello, {name}!"),
                Pair::new("odd key=1", " padded\tvalue "),
                Pair::new("#hash", "'kept quotes'"),
                Pair::new("lines", "a\nb\\c"),
            ],
        };
        let mut output = Vec::new();
        original.to_writer(&mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("#: Locale: en"));

        let reparsed = parse(&output_str).unwrap();
        assert_eq!(reparsed.locale, original.locale);
        assert_eq!(reparsed.pairs.len(), original.pairs.len());
        for (orig, new) in original.pairs.iter().zip(reparsed.pairs.iter()) {
            assert_eq!(orig.key, new.key);
            assert_eq!(orig.value, new.value);
            assert!(!new.quoted);
        }
    }
}
