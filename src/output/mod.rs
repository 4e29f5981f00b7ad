//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;

    /// Format and print to stdout
    fn print(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.format(format)?);
        Ok(())
    }
}

/// Lists render as a table for both `pretty` and `table`
impl<T: Tabled + Serialize> Formattable for Vec<T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Pretty | OutputFormat::Table => Ok(table::format_table(self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    #[test]
    fn test_vec_formats_as_table() {
        let rows = vec![Row { id: "INC-1".into() }];
        let out = rows.format(OutputFormat::Table).unwrap();
        assert!(out.contains("ID"));
        assert!(out.contains("INC-1"));
    }

    #[test]
    fn test_vec_formats_as_json_envelope() {
        let rows = vec![Row { id: "INC-1".into() }];
        let out = rows.format(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["data"][0]["id"], "INC-1");
        assert!(value["meta"]["version"].is_string());
    }

    #[test]
    fn test_empty_vec_message() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(
            rows.format(OutputFormat::Pretty).unwrap(),
            "No results found."
        );
    }
}
