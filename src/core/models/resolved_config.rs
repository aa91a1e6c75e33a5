use std::fmt;

use crate::core::errors::{DeployfigError, Result};

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A committed layer file, by profile name.
    Layer(String),
    /// Injected from the process environment at resolution time.
    Environment,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Layer(name) => write!(f, "{name}"),
            Origin::Environment => write!(f, "env"),
        }
    }
}

/// One setting after layering.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub key: String,
    pub value: String,
    pub origin: Origin,
}

/// Immutable mapping of setting name to resolved value.
///
/// Keys keep the order in which they first appeared across the layers.
/// Values are plain strings; the typed accessors below parse on demand
/// so a malformed value only fails the consumer that reads it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedConfig {
    values: Vec<ResolvedValue>,
}

impl ResolvedConfig {
    pub(crate) fn new(values: Vec<ResolvedValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|v| v.value.as_str())
    }

    pub fn origin(&self, key: &str) -> Option<&Origin> {
        self.find(key).map(|v| &v.origin)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.key.as_str()).collect()
    }

    pub fn values(&self) -> &[ResolvedValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a boolean setting.
    ///
    /// Accepts `true/false`, `1/0`, `yes/no`, `on/off` in any case.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(invalid(key, raw, "expected a boolean: true or false")),
        }
    }

    pub fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(key, raw, "expected a non-negative integer"))
            })
            .transpose()
    }

    pub fn get_port(&self, key: &str) -> Result<Option<u16>> {
        self.get(key)
            .map(|raw| match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(invalid(key, raw, "expected a port number between 1 and 65535")),
            })
            .transpose()
    }

    /// Parse Unix permission bits written in octal (`666`, `0660`).
    pub fn get_octal(&self, key: &str) -> Result<Option<u32>> {
        self.get(key)
            .map(|raw| match u32::from_str_radix(raw.trim(), 8) {
                Ok(bits) if bits <= 0o7777 => Ok(bits),
                _ => Err(invalid(key, raw, "expected octal permission bits such as 666")),
            })
            .transpose()
    }

    /// Parse a comma-separated list, dropping empty items.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
    }

    fn find(&self, key: &str) -> Option<&ResolvedValue> {
        self.values.iter().find(|v| v.key == key)
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> DeployfigError {
    DeployfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(pairs: &[(&str, &str)]) -> ResolvedConfig {
        ResolvedConfig::new(
            pairs
                .iter()
                .map(|(k, v)| ResolvedValue {
                    key: k.to_string(),
                    value: v.to_string(),
                    origin: Origin::Layer("base".to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn bool_accepts_common_spellings() {
        let config = make_config(&[("A", "True"), ("B", "off"), ("C", "1"), ("D", "no")]);

        assert_eq!(config.get_bool("A").unwrap(), Some(true));
        assert_eq!(config.get_bool("B").unwrap(), Some(false));
        assert_eq!(config.get_bool("C").unwrap(), Some(true));
        assert_eq!(config.get_bool("D").unwrap(), Some(false));
        assert_eq!(config.get_bool("MISSING").unwrap(), None);
    }

    #[test]
    fn malformed_bool_reported_on_read() {
        let config = make_config(&[("DEBUG", "maybe")]);

        let err = config.get_bool("DEBUG").unwrap_err().to_string();
        assert!(err.contains("DEBUG"));
        assert!(err.contains("maybe"));
    }

    #[test]
    fn list_splits_and_trims() {
        let config = make_config(&[("HOSTS", " example.com, www.example.com ,,")]);

        assert_eq!(
            config.get_list("HOSTS").unwrap(),
            vec!["example.com", "www.example.com"]
        );
    }

    #[test]
    fn empty_list_is_present_but_empty() {
        let config = make_config(&[("HOSTS", "")]);

        assert_eq!(config.get_list("HOSTS"), Some(vec![]));
        assert_eq!(config.get_list("OTHER"), None);
    }

    #[test]
    fn octal_permission_bits() {
        let config = make_config(&[("OK", "666"), ("LEADING", "0660"), ("BAD", "999")]);

        assert_eq!(config.get_octal("OK").unwrap(), Some(0o666));
        assert_eq!(config.get_octal("LEADING").unwrap(), Some(0o660));
        assert!(config.get_octal("BAD").is_err());
    }

    #[test]
    fn port_rejects_zero_and_overflow() {
        let config = make_config(&[("A", "0"), ("B", "70000"), ("C", "8080")]);

        assert!(config.get_port("A").is_err());
        assert!(config.get_port("B").is_err());
        assert_eq!(config.get_port("C").unwrap(), Some(8080));
    }

    #[test]
    fn origin_display() {
        assert_eq!(Origin::Layer("production".into()).to_string(), "production");
        assert_eq!(Origin::Environment.to_string(), "env");
    }
}
