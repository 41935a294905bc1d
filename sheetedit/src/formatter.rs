//! Console output for command results

use colored::*;
use sheetedit_core::{Cell, CellValue, ErrorKind, SheetEditError};
use std::path::Path;

pub fn print_created(file_path: &Path, sheet_name: &str) {
    println!(
        "{} '{}' with worksheet '{}'",
        "Created new workbook".green(),
        file_path.display(),
        sheet_name.cyan()
    );
}

pub fn print_sheets(file_path: &Path, sheets: &[String]) {
    println!("{}", format!("Worksheets in {}:", file_path.display()).bold());
    for name in sheets {
        println!("  - {}", name);
    }
}

/// Print a read cell: the value, plus the formula when there is one
pub fn print_cell(cell: &Cell) {
    println!("Value in cell {}: {}", cell.address, display_value(&cell.value));
    if let Some(formula) = &cell.formula {
        println!("Formula: ={}", formula.dimmed());
    }
}

pub fn print_written(address: &str, value: &CellValue) {
    println!(
        "{} '{}' to cell {}",
        "Successfully wrote".green(),
        value,
        address.to_ascii_uppercase()
    );
}

pub fn print_guidance(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);
    if let Some(hint) = error_hint(err) {
        eprintln!("{}", hint.dimmed());
    }
}

fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    let kind = err.downcast_ref::<SheetEditError>()?.kind();
    Some(match kind {
        ErrorKind::NotFound => "Check the file path and worksheet name",
        ErrorKind::InvalidArgument => "Check the command-line arguments and configuration",
        ErrorKind::Io => "Check that the file is a readable .xlsx workbook and the location is writable",
    })
}

fn display_value(value: &CellValue) -> String {
    match value {
        CellValue::Empty => "(empty)".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&CellValue::Empty), "(empty)");
        assert_eq!(display_value(&CellValue::Number(3.0)), "3");
        assert_eq!(display_value(&CellValue::Text("Hi".to_string())), "Hi");
    }

    #[test]
    fn test_error_hint_follows_error_kind() {
        let not_found = anyhow::Error::new(SheetEditError::FileNotFound("a.xlsx".into()));
        assert_eq!(
            error_hint(&not_found),
            Some("Check the file path and worksheet name")
        );

        let invalid = anyhow::Error::new(SheetEditError::MissingValue("A1".to_string()))
            .context("Failed to write cell");
        assert_eq!(
            error_hint(&invalid),
            Some("Check the command-line arguments and configuration")
        );

        let io = anyhow::Error::new(SheetEditError::Document {
            path: "a.xlsx".into(),
            message: "bad zip".to_string(),
        });
        assert!(error_hint(&io).unwrap().starts_with("Check that the file"));

        assert_eq!(error_hint(&anyhow::anyhow!("plain failure")), None);
    }
}
