use crate::core::errors::Result;
use crate::core::models::layer_file::LayerFile;

/// Port for parsing and serializing profile layer files.
pub trait ConfigParser: Send + Sync {
    /// Parse raw file content into a structured `LayerFile`.
    fn parse(&self, content: &str) -> Result<LayerFile>;

    /// Serialize a `LayerFile` back to its file format.
    fn serialize(&self, layer: &LayerFile) -> Result<String>;
}
