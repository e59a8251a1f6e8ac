use super::ExportError;
use std::io::Write;
use std::path::Path;

/// Serialize to indented JSON
pub fn to_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, ExportError> {
    serde_json::to_string_pretty(data).map_err(|e| ExportError::SerializationError(e.to_string()))
}

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize + ?Sized,
    P: AsRef<Path>,
{
    let json_data = to_json_pretty(data)?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::{TrendCalculator, TrendData};
    use tempfile::NamedTempFile;

    #[test]
    fn test_trend_data_uses_camel_case() {
        let data = TrendData {
            period: 7,
            recovery: TrendCalculator::new().calculate(&[70.0, 60.0]),
            hrv: None,
            rhr: None,
            sleep_performance: None,
            sleep_hours: None,
            strain: None,
        };

        let json = to_json_pretty(&data).unwrap();
        assert!(json.contains("\"sleepPerformance\": null"));
        assert!(json.contains("\"period\": 7"));
        assert!(json.contains("\"trend\": \"stable\""));
    }

    #[test]
    fn test_export_json_generic() {
        #[derive(serde::Serialize)]
        struct TestData {
            name: String,
            value: u32,
        }

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let temp_file = NamedTempFile::new().unwrap();
        let result = export_json(&data, temp_file.path());

        assert!(result.is_ok());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"name\": \"test\""));
        assert!(content.contains("\"value\": 42"));
        assert!(content.ends_with("}\n"));
    }
}
