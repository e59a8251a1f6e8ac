use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub mod json;
pub mod text;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Text,
}

impl OutputFormat {
    /// Format selected by a `--json` style flag
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" | "pretty" => Ok(OutputFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Render `data` as JSON or through the given text renderer
pub fn render<T, F>(data: &T, format: OutputFormat, text: F) -> Result<String, ExportError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::to_json_pretty(data),
        OutputFormat::Text => Ok(text(data)),
    }
}

/// Write rendered output to a file, creating parent directories
pub fn write_output<P: AsRef<Path>>(content: &str, output_path: P) -> Result<(), ExportError> {
    if let Some(parent) = output_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, content)?;
    Ok(())
}
