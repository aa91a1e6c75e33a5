use crate::core::errors::{DeployfigError, Result};
use crate::core::models::layer_file::{LayerEntry, LayerFile, Line};
use crate::core::traits::parser::ConfigParser;
use std::path::PathBuf;

/// Parses and serializes dotenv-style layer files.
///
/// Supports:
/// - `KEY=value` entries, with an optional leading `export `
/// - Quoted values (`KEY="value"` and `KEY='value'`); double quotes
///   understand `\n`, `\r`, `\"` and `\\` escapes
/// - Comment lines (`# ...`)
/// - Blank lines
pub struct DotenvParser {
    file: PathBuf,
}

impl DotenvParser {
    /// Parser whose errors name `file`.
    pub fn for_file(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// Parse a single line into a `Line` variant.
    fn parse_line(&self, raw: &str, line_number: usize) -> Result<Line> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Ok(Line::Blank);
        }

        if trimmed.starts_with('#') {
            return Ok(Line::Comment(raw.to_string()));
        }

        let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);

        let Some(eq_pos) = body.find('=') else {
            return Err(self.error(format!(
                "line {line_number}: expected KEY=value, got: {trimmed}"
            )));
        };

        let key = body[..eq_pos].trim().to_string();
        if key.is_empty() {
            return Err(self.error(format!("line {line_number}: empty key")));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(self.error(format!(
                "line {line_number}: key '{key}' contains whitespace"
            )));
        }

        let value = strip_quotes(body[eq_pos + 1..].trim());

        Ok(Line::Entry(LayerEntry {
            key,
            value,
            line_number,
        }))
    }

    fn error(&self, detail: String) -> DeployfigError {
        DeployfigError::ParseError {
            file: self.file.clone(),
            detail,
        }
    }
}

impl Default for DotenvParser {
    fn default() -> Self {
        Self::for_file(".env")
    }
}

/// Remove matching surrounding quotes (single or double) from a value.
fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == b'"' && last == b'"' {
            return unescape(&s[1..s.len() - 1]);
        }
        if first == b'\'' && last == b'\'' {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Undo the escapes `serialize` writes inside double quotes. Unknown
/// sequences are kept as written.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a value on output when leaving it bare would change its meaning.
///
/// A line break always forces escaped double quotes, since every entry
/// must stay on one line.
fn quote_if_needed(value: &str) -> String {
    let multiline = value.contains(['\n', '\r']);
    let needs_quotes = multiline
        || value != value.trim()
        || value.starts_with('#')
        || (value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))));
    if !needs_quotes {
        value.to_string()
    } else if !multiline && value.contains('"') && !value.contains('\'') {
        format!("'{value}'")
    } else {
        format!("\"{}\"", escape(value))
    }
}

impl ConfigParser for DotenvParser {
    fn parse(&self, content: &str) -> Result<LayerFile> {
        let mut lines = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            lines.push(self.parse_line(raw, idx + 1)?);
        }

        Ok(LayerFile {
            lines,
            source_path: Some(self.file.clone()),
        })
    }

    fn serialize(&self, layer: &LayerFile) -> Result<String> {
        let mut output = String::new();

        for (i, line) in layer.lines.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            match line {
                Line::Entry(entry) => {
                    output.push_str(&entry.key);
                    output.push('=');
                    output.push_str(&quote_if_needed(&entry.value));
                }
                Line::Comment(text) => output.push_str(text),
                Line::Blank => {}
            }
        }
        output.push('\n');

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_entries() {
        let parser = DotenvParser::default();
        let file = parser.parse("DEBUG=false\nALLOWED_HOSTS=example.com").unwrap();

        assert_eq!(file.keys(), vec!["DEBUG", "ALLOWED_HOSTS"]);
        assert_eq!(file.get("DEBUG"), Some("false"));
        assert_eq!(file.get("ALLOWED_HOSTS"), Some("example.com"));
    }

    #[test]
    fn parse_quoted_values() {
        let parser = DotenvParser::default();
        let file = parser
            .parse("A=\"two words\"\nB='single'\nC=\"unbalanced")
            .unwrap();

        assert_eq!(file.get("A"), Some("two words"));
        assert_eq!(file.get("B"), Some("single"));
        assert_eq!(file.get("C"), Some("\"unbalanced"));
    }

    #[test]
    fn parse_export_prefix() {
        let parser = DotenvParser::default();
        let file = parser.parse("export DJANGO_SETTINGS_MODULE=mysite.settings.pro").unwrap();

        assert_eq!(
            file.get("DJANGO_SETTINGS_MODULE"),
            Some("mysite.settings.pro")
        );
    }

    #[test]
    fn parse_comments_and_blanks() {
        let parser = DotenvParser::default();
        let file = parser.parse("# Hosts\nALLOWED_HOSTS=*\n\n# Debug\nDEBUG=true").unwrap();

        assert_eq!(file.lines.len(), 5);
        assert!(matches!(file.lines[0], Line::Comment(_)));
        assert!(matches!(file.lines[2], Line::Blank));
        assert!(matches!(file.lines[4], Line::Entry(_)));
    }

    #[test]
    fn parse_value_with_equals() {
        let parser = DotenvParser::default();
        let file = parser
            .parse("DATABASE_URL=postgres://user@localhost/db?sslmode=require")
            .unwrap();

        assert_eq!(
            file.get("DATABASE_URL"),
            Some("postgres://user@localhost/db?sslmode=require")
        );
    }

    #[test]
    fn repeated_key_last_wins() {
        let parser = DotenvParser::default();
        let file = parser.parse("DEBUG=true\nDEBUG=false").unwrap();

        assert_eq!(file.get("DEBUG"), Some("false"));
    }

    #[test]
    fn invalid_line_names_file_and_line() {
        let parser = DotenvParser::for_file(".deployfig/production.env");
        let err = parser.parse("DEBUG=false\nNOT_VALID").unwrap_err().to_string();

        assert!(err.contains("production.env"));
        assert!(err.contains("line 2"));
    }

    #[test]
    fn empty_key_fails() {
        let parser = DotenvParser::default();
        assert!(parser.parse("=value").is_err());
    }

    #[test]
    fn key_with_space_fails() {
        let parser = DotenvParser::default();
        assert!(parser.parse("SECRET KEY=value").is_err());
    }

    #[test]
    fn serialize_keeps_comments_and_quotes_padding() {
        let parser = DotenvParser::default();
        let original = "# Project\nPROJECT_NAME=mysite\n\nMOTD=\" padded \"\n";
        let file = parser.parse(original).unwrap();

        assert_eq!(parser.serialize(&file).unwrap(), original);
    }

    #[test]
    fn parse_double_quoted_escapes() {
        let parser = DotenvParser::default();
        let file = parser
            .parse(r#"A="one\ntwo"
B='one\ntwo'
C="say \"hi\""
D="C:\temp""#)
            .unwrap();

        assert_eq!(file.get("A"), Some("one\ntwo"));
        assert_eq!(file.get("B"), Some("one\\ntwo"));
        assert_eq!(file.get("C"), Some("say \"hi\""));
        assert_eq!(file.get("D"), Some("C:\\temp"));
    }

    #[test]
    fn multiline_value_stays_on_one_line() {
        let parser = DotenvParser::default();
        let key = "-----BEGIN KEY-----\nabc\r\n-----END KEY-----";
        let file = LayerFile {
            lines: vec![Line::Entry(LayerEntry {
                key: "SECRET_KEY".to_string(),
                value: key.to_string(),
                line_number: 1,
            })],
            source_path: None,
        };

        let written = parser.serialize(&file).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert_eq!(
            written,
            "SECRET_KEY=\"-----BEGIN KEY-----\\nabc\\r\\n-----END KEY-----\"\n"
        );
        assert_eq!(parser.parse(&written).unwrap().get("SECRET_KEY"), Some(key));
    }
}
