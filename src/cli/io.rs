//! JSON output for CLI commands
//!
//! - Command results go to stdout, one JSON document per line
//! - Logs go to stderr (see `observability`)
//! - UTF-8 only

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(&mut io::stdout().lock(), &response)
}

/// Write one serializable value as a single JSON line
pub fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `values` to `path` as one pretty-printed JSON array
pub fn write_json_file<T: Serialize>(path: &Path, values: &[T]) -> CliResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, values)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_line_is_one_line() {
        let mut buffer = Vec::new();
        write_line(&mut buffer, &json!({"id": 1, "plan": {"Plan": {}}})).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_write_json_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plans.json");
        let plans = vec![json!({"Plan": {"Total Cost": 1.5}}), json!([])];

        write_json_file(&path, &plans).unwrap();

        let read: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, plans);
    }
}
