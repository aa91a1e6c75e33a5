use std::path::PathBuf;

/// A single key-value entry in a layer file.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    pub key: String,
    pub value: String,
    pub line_number: usize,
}

/// Represents any line in a layer file.
///
/// Comments and blank lines are kept so a resolved file still reads
/// like the layers it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// A key-value setting.
    Entry(LayerEntry),
    /// A comment line (e.g. `# Database`).
    Comment(String),
    /// An empty or whitespace-only line.
    Blank,
}

/// A parsed profile layer (e.g. `.deployfig/production.env`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerFile {
    pub lines: Vec<Line>,
    pub source_path: Option<PathBuf>,
}

impl LayerFile {
    /// Returns the value for the given key, if present.
    ///
    /// When a key is repeated the last occurrence wins, matching how
    /// the application runtime reads the file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .filter(|e| e.key == key)
            .last()
            .map(|e| e.value.as_str())
    }

    /// Returns all keys in this file, in file order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries().map(|e| e.key.as_str()).collect()
    }

    /// Iterates over only the key-value entries, skipping comments and blanks.
    pub fn entries(&self) -> impl Iterator<Item = &LayerEntry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            _ => None,
        })
    }
}
