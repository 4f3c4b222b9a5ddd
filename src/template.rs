//! Placeholder token scanning.
//!
//! Syntax:
//! - `{name}` is a placeholder, `{name:hint}` a placeholder with a format hint.
//! - `{{` and `}}` are literal `{` and `}`.
//! - Tokens cannot nest. An unterminated token, a stray `}` or an invalid
//!   name is a [`Error::MalformedTemplate`].
//!
//! The scanner makes one left-to-right pass over the input and never
//! backtracks.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(r"^[\w.\-]+$").unwrap();
    static ref HINT_REGEX: Regex = Regex::new(r"^[\w.\-]*$").unwrap();
}

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, copied through unchanged.
    Literal(&'a str),
    /// A single delimiter produced by an escape sequence.
    Escaped(char),
    /// A placeholder token.
    Token(Token<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub name: &'a str,
    pub hint: Option<&'a str>,
    /// Full token text including the braces, e.g. `{count:plural}`.
    pub raw: &'a str,
    /// Byte offset of the opening brace.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    /// A delimiter was seen; the next character decides between an escape
    /// and a token start (for `{`) or an error (for `}`).
    Escape(char),
    InToken,
}

/// Splits a template into segments.
pub fn scan(template: &str) -> Result<Vec<Segment<'_>>, Error> {
    let mut segments = Vec::new();
    let mut state = State::Literal;
    let mut literal_start = 0;
    let mut token_start = 0;
    let mut delimiter_at = 0;

    for (i, c) in template.char_indices() {
        state = match (state, c) {
            (State::Literal, '{' | '}') => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                delimiter_at = i;
                State::Escape(c)
            }
            (State::Literal, _) => State::Literal,
            (State::Escape(d), c) if c == d => {
                segments.push(Segment::Escaped(d));
                literal_start = i + c.len_utf8();
                State::Literal
            }
            (State::Escape('}'), _) => {
                return Err(Error::malformed_template(
                    delimiter_at,
                    "unmatched `}` (use `}}` for a literal brace)",
                ));
            }
            (State::Escape(_), '}') => {
                return Err(Error::malformed_template(delimiter_at, "empty placeholder"));
            }
            (State::Escape(_), _) => {
                token_start = delimiter_at;
                State::InToken
            }
            (State::InToken, '}') => {
                let raw = &template[token_start..i + 1];
                segments.push(Segment::Token(parse_token(raw, token_start)?));
                literal_start = i + 1;
                State::Literal
            }
            (State::InToken, '{') => {
                return Err(Error::malformed_template(
                    i,
                    "nested `{` inside a placeholder",
                ));
            }
            (State::InToken, _) => State::InToken,
        };
    }

    match state {
        State::Literal => {
            if literal_start < template.len() {
                segments.push(Segment::Literal(&template[literal_start..]));
            }
            Ok(segments)
        }
        State::Escape('}') => Err(Error::malformed_template(
            delimiter_at,
            "unmatched `}` (use `}}` for a literal brace)",
        )),
        State::Escape(_) | State::InToken => Err(Error::malformed_template(
            if state == State::InToken {
                token_start
            } else {
                delimiter_at
            },
            "unterminated placeholder",
        )),
    }
}

fn parse_token(raw: &str, position: usize) -> Result<Token<'_>, Error> {
    let inner = &raw[1..raw.len() - 1];
    let (name, hint) = match inner.split_once(':') {
        Some((name, hint)) => (name, Some(hint)),
        None => (inner, None),
    };

    if !NAME_REGEX.is_match(name) {
        return Err(Error::malformed_template(
            position,
            format!("invalid placeholder name `{}`", name),
        ));
    }
    if let Some(hint) = hint {
        if hint.is_empty() || !HINT_REGEX.is_match(hint) {
            return Err(Error::malformed_template(
                position,
                format!("invalid format hint `{}`", hint),
            ));
        }
    }

    Ok(Token {
        name,
        hint,
        raw,
        position,
    })
}

/// Returns placeholder names in order of appearance, validating the template.
///
/// ```rust
/// use message_format::template::placeholders;
///
/// assert_eq!(placeholders("{a} and {{b}} and {c:upper}")?, vec!["a", "c"]);
/// # Ok::<(), message_format::Error>(())
/// ```
pub fn placeholders(template: &str) -> Result<Vec<&str>, Error> {
    Ok(scan(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Token(token) => Some(token.name),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_of(result: Result<Vec<Segment<'_>>, Error>) -> usize {
        match result {
            Err(Error::MalformedTemplate { position, .. }) => position,
            other => panic!("Expected MalformedTemplate, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_literal_only() {
        assert_eq!(scan("plain text").unwrap(), vec![Segment::Literal("plain text")]);
        assert!(scan("").unwrap().is_empty());
    }

    #[test]
    fn test_scan_tokens_and_literals() {
        let segments = scan("Hello, {name}!").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Literal("Hello, "));
        match &segments[1] {
            Segment::Token(token) => {
                assert_eq!(token.name, "name");
                assert_eq!(token.hint, None);
                assert_eq!(token.raw, "{name}");
                assert_eq!(token.position, 7);
            }
            other => panic!("Expected token, got {:?}", other),
        }
        assert_eq!(segments[2], Segment::Literal("!"));
    }

    #[test]
    fn test_scan_hint() {
        let segments = scan("{count:plural}").unwrap();
        match &segments[0] {
            Segment::Token(token) => {
                assert_eq!(token.name, "count");
                assert_eq!(token.hint, Some("plural"));
            }
            other => panic!("Expected token, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_escapes() {
        assert_eq!(
            scan("{{literal}}").unwrap(),
            vec![
                Segment::Escaped('{'),
                Segment::Literal("literal"),
                Segment::Escaped('}')
            ]
        );
        assert_eq!(scan("{{").unwrap(), vec![Segment::Escaped('{')]);
    }

    #[test]
    fn test_scan_multibyte_literal() {
        let segments = scan("Grüße, {name} ✓").unwrap();
        assert_eq!(segments[0], Segment::Literal("Grüße, "));
        assert_eq!(segments[2], Segment::Literal(" ✓"));
    }

    #[test]
    fn test_unterminated_token() {
        assert_eq!(position_of(scan("Hello {name")), 6);
        assert_eq!(position_of(scan("trailing {")), 9);
    }

    #[test]
    fn test_stray_closing_brace() {
        assert_eq!(position_of(scan("a } b")), 2);
        assert_eq!(position_of(scan("end}")), 3);
    }

    #[test]
    fn test_nested_and_empty_tokens() {
        assert_eq!(position_of(scan("{a{b}}")), 2);
        assert_eq!(position_of(scan("x {}")), 2);
        assert_eq!(position_of(scan("{bad name}")), 0);
        assert_eq!(position_of(scan("{name:}")), 0);
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            placeholders("{0} {greeting}, {0}!").unwrap(),
            vec!["0", "greeting", "0"]
        );
        assert!(placeholders("{oops").is_err());
    }
}
