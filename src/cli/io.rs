//! JSON I/O handling for CLI
//!
//! - Records: one JSON array of objects per file
//! - Events: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::notify::ViewEvent;

/// Read the record file: a JSON array whose entries are objects
pub fn load_records(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
    })?;

    match serde_json::from_str(&content)? {
        Value::Array(values) => Ok(values),
        other => Err(CliError::data_error(format!(
            "{} must hold a JSON array of records, found {}",
            path.display(),
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Encode one event as a single line
pub fn encode_event(event: &ViewEvent) -> CliResult<String> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}

/// Write one event line and flush
pub fn write_event<W: Write>(writer: &mut W, event: &ViewEvent) -> CliResult<()> {
    writer.write_all(encode_event(event)?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"age": 1}}, {{"age": 2}}]"#).unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_records_rejects_object() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"age": 1}}"#).unwrap();

        let err = load_records(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "XV_CLI_DATA_ERROR");
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records(Path::new("/nonexistent/records.json")).unwrap_err();
        assert_eq!(err.code_str(), "XV_CLI_IO_ERROR");
    }

    #[test]
    fn test_write_event_is_one_line() {
        let event = ViewEvent::CommandRejected {
            code: "XV_INVALID_ARGUMENT".into(),
            message: "bad".into(),
        };
        let mut out = Vec::new();
        write_event(&mut out, &event).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["event"], "commandRejected");
    }
}
