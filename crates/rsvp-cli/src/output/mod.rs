//! Output formatting module
//!
//! Rows render as a rounded table or as JSON. A single row renders as a JSON
//! object so `whoami --format json` can be piped straight into `jq`. Session
//! transitions get a one-line status marker on stdout; warnings go to stderr.

use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use rsvp_core::SessionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

/// Render rows in the requested format
pub fn render_rows<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<String>
where
    T: Serialize + Tabled,
{
    let rendered = match (format, rows) {
        (OutputFormat::Table, _) => Table::new(rows).with(Style::rounded()).to_string(),
        (OutputFormat::Json, [row]) => serde_json::to_string_pretty(row)?,
        (OutputFormat::Json, _) => serde_json::to_string_pretty(rows)?,
    };
    Ok(rendered)
}

pub fn print_rows<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    println!("{}", render_rows(rows, format)?);
    Ok(())
}

/// One-line session status, prefixed with a marker for the resulting state
pub fn print_status(status: SessionStatus, message: &str, quiet: bool) {
    if !quiet {
        println!("{} {}", status_marker(status), message);
    }
}

fn status_marker(status: SessionStatus) -> colored::ColoredString {
    match status {
        SessionStatus::Authenticated => "●".green(),
        SessionStatus::Anonymous => "○".dimmed(),
        SessionStatus::Loading => "◌".yellow(),
    }
}

/// Warning on stderr (respects quiet mode)
pub fn print_warning(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message.yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        key: &'static str,
        value: &'static str,
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_single_row_renders_as_json_object() {
        let json = render_rows(&[Row { key: "status", value: "anonymous" }], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["value"], "anonymous");
    }

    #[test]
    fn test_many_rows_render_as_json_array() {
        let rows = [Row { key: "a", value: "1" }, Row { key: "b", value: "2" }];
        let value: serde_json::Value = serde_json::from_str(&render_rows(&rows, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_table_has_header_and_rounded_border() {
        let table = render_rows(&[Row { key: "a", value: "1" }], OutputFormat::Table).unwrap();
        assert!(table.contains("key"));
        assert!(table.starts_with('╭'));
    }
}
