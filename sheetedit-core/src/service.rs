//! Spreadsheet operations: create a workbook, read a cell, write a cell
//!
//! Every call is one open -> act -> (save) transaction on the file at `path`.
//! The in-memory document is owned by the call and dropped on every exit
//! path. Nothing coordinates concurrent callers: two processes writing the
//! same file race at the filesystem level and the last save wins.

use crate::address::CellAddress;
use crate::config::{MissingSheetPolicy, ServiceConfig};
use crate::error::{Result, SheetEditError};
use crate::probe;
use crate::value::{Cell, CellValue};
use log::{debug, info};
use std::path::Path;
use umya_spreadsheet::{Spreadsheet, Worksheet};

const MAX_SHEET_NAME_LEN: usize = 31;
/// Name of the worksheet `umya_spreadsheet::new_file` starts with
const PROVIDER_FIRST_SHEET: &str = "Sheet1";
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Check a worksheet name against the xlsx naming rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| SheetEditError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(invalid(&format!("character '{ch}' is not allowed")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid("name cannot start or end with an apostrophe"));
    }
    Ok(())
}

/// Cell-level operations over workbook files
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetService {
    config: ServiceConfig,
}

impl SpreadsheetService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create a workbook with a single worksheet, replacing any existing file
    ///
    /// Returns the name of the worksheet that was created.
    pub fn create_workbook<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: Option<&str>,
    ) -> Result<String> {
        let path = path.as_ref();
        let sheet_name = self.config.resolve_sheet_name(sheet_name);
        validate_sheet_name(sheet_name)?;
        ensure_parent_dir(path)?;

        let mut book = umya_spreadsheet::new_file();
        book.get_sheet_by_name_mut(PROVIDER_FIRST_SHEET)
            .ok_or_else(|| SheetEditError::document(path, "new workbook has no worksheet"))?
            .set_name(sheet_name);

        save(&book, path)?;
        info!("Created workbook {} with worksheet '{}'", path.display(), sheet_name);
        Ok(sheet_name.to_string())
    }

    /// Set one cell's value and save the workbook in place
    ///
    /// Any previous value or formula at the address is replaced. The file is
    /// only rewritten after every check has passed.
    pub fn write_cell<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: Option<&str>,
        address: &str,
        value: CellValue,
    ) -> Result<()> {
        let path = path.as_ref();
        ensure_exists(path)?;
        let address = CellAddress::parse(address)?;
        if value.is_empty() {
            return Err(SheetEditError::MissingValue(address.to_string()));
        }
        let sheet_name = self.config.resolve_sheet_name(sheet_name);

        let mut book = open(path)?;
        let sheet = self.resolve_sheet_for_write(&mut book, path, sheet_name)?;
        let cell = sheet.get_cell_mut(address.coordinate());
        match value {
            CellValue::Text(text) => {
                cell.set_value_string(text);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            CellValue::Bool(b) => {
                cell.set_value_bool(b);
            }
            CellValue::Empty => return Err(SheetEditError::MissingValue(address.to_string())),
        }

        save(&book, path)?;
        debug!("Wrote {}!{} in {}", sheet_name, address, path.display());
        Ok(())
    }

    /// Read one cell; cells never written come back as [`CellValue::Empty`]
    pub fn read_cell<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: Option<&str>,
        address: &str,
    ) -> Result<Cell> {
        let path = path.as_ref();
        ensure_exists(path)?;
        let address = CellAddress::parse(address)?;
        let sheet_name = self.config.resolve_sheet_name(sheet_name);

        let book = open(path)?;
        let sheet = stored_sheet_name(&book, sheet_name)
            .and_then(|stored| book.get_sheet_by_name(&stored))
            .ok_or_else(|| SheetEditError::WorksheetNotFound {
                sheet: sheet_name.to_string(),
                path: path.to_path_buf(),
            })?;

        Ok(snapshot(address, sheet))
    }

    /// Worksheet names in workbook order
    pub fn list_sheets<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        probe::sheet_names(path)
    }

    fn resolve_sheet_for_write<'a>(
        &self,
        book: &'a mut Spreadsheet,
        path: &Path,
        sheet_name: &str,
    ) -> Result<&'a mut Worksheet> {
        let stored = match stored_sheet_name(book, sheet_name) {
            Some(stored) => stored,
            None => match self.config.missing_sheet_policy {
                MissingSheetPolicy::Error => {
                    return Err(SheetEditError::WorksheetNotFound {
                        sheet: sheet_name.to_string(),
                        path: path.to_path_buf(),
                    });
                }
                MissingSheetPolicy::Create => {
                    validate_sheet_name(sheet_name)?;
                    book.new_sheet(sheet_name)
                        .map_err(|e| SheetEditError::document(path, e))?;
                    info!("Added worksheet '{}' to {}", sheet_name, path.display());
                    sheet_name.to_string()
                }
            },
        };

        book.get_sheet_by_name_mut(&stored).ok_or_else(|| {
            SheetEditError::WorksheetNotFound {
                sheet: sheet_name.to_string(),
                path: path.to_path_buf(),
            }
        })
    }
}

#[cfg(feature = "async")]
mod nonblocking {
    use super::*;
    use std::path::PathBuf;

    fn join_error(path: PathBuf, e: tokio::task::JoinError) -> SheetEditError {
        SheetEditError::io(path, std::io::Error::other(e))
    }

    /// Async wrappers that run the blocking call on tokio's blocking pool
    impl SpreadsheetService {
        pub async fn create_workbook_async(
            &self,
            path: impl Into<PathBuf>,
            sheet_name: Option<&str>,
        ) -> Result<String> {
            let service = self.clone();
            let path = path.into();
            let sheet_name = sheet_name.map(str::to_string);
            let task_path = path.clone();
            tokio::task::spawn_blocking(move || {
                service.create_workbook(&task_path, sheet_name.as_deref())
            })
            .await
            .map_err(|e| join_error(path, e))?
        }

        pub async fn write_cell_async(
            &self,
            path: impl Into<PathBuf>,
            sheet_name: Option<&str>,
            address: &str,
            value: CellValue,
        ) -> Result<()> {
            let service = self.clone();
            let path = path.into();
            let sheet_name = sheet_name.map(str::to_string);
            let address = address.to_string();
            let task_path = path.clone();
            tokio::task::spawn_blocking(move || {
                service.write_cell(&task_path, sheet_name.as_deref(), &address, value)
            })
            .await
            .map_err(|e| join_error(path, e))?
        }

        pub async fn read_cell_async(
            &self,
            path: impl Into<PathBuf>,
            sheet_name: Option<&str>,
            address: &str,
        ) -> Result<Cell> {
            let service = self.clone();
            let path = path.into();
            let sheet_name = sheet_name.map(str::to_string);
            let address = address.to_string();
            let task_path = path.clone();
            tokio::task::spawn_blocking(move || {
                service.read_cell(&task_path, sheet_name.as_deref(), &address)
            })
            .await
            .map_err(|e| join_error(path, e))?
        }
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SheetEditError::FileNotFound(path.to_path_buf()))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(SheetEditError::io(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("directory {} does not exist", parent.display()),
                ),
            ))
        }
        _ => Ok(()),
    }
}

fn open(path: &Path) -> Result<Spreadsheet> {
    debug!("Opening {}", path.display());
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| SheetEditError::document(path, e))
}

fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    debug!("Saving {}", path.display());
    umya_spreadsheet::writer::xlsx::write(book, path).map_err(|e| SheetEditError::document(path, e))
}

/// Worksheet names are unique ignoring case; returns the name as stored
fn stored_sheet_name(book: &Spreadsheet, requested: &str) -> Option<String> {
    book.get_sheet_collection_no_check()
        .iter()
        .map(|sheet| sheet.get_name())
        .find(|name| same_sheet_name(name, requested))
        .map(str::to_string)
}

fn same_sheet_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn value_from_raw(data_type: &str, raw: &str) -> CellValue {
    match data_type {
        "b" => CellValue::Bool(raw.eq_ignore_ascii_case("TRUE") || raw == "1"),
        _ if raw.is_empty() => CellValue::Empty,
        "n" => raw
            .parse::<f64>()
            .map(CellValue::Number)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        _ => CellValue::Text(raw.to_string()),
    }
}

fn snapshot(address: CellAddress, sheet: &Worksheet) -> Cell {
    let Some(cell) = sheet.get_cell(address.coordinate()) else {
        return Cell::empty(address);
    };

    let formula = cell
        .is_formula()
        .then(|| cell.get_formula().trim_start_matches('=').to_string())
        .filter(|f| !f.is_empty());

    let value = value_from_raw(cell.get_data_type(), &cell.get_value());

    Cell {
        address,
        value,
        formula,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Sheet1").is_ok());
        assert!(validate_sheet_name("Q1 Report (draft)").is_ok());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());

        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("[x]").is_err());
        assert!(validate_sheet_name("'quoted'").is_err());
    }

    #[test]
    fn test_sheet_names_compare_ignoring_case() {
        assert!(same_sheet_name("Sheet1", "sheet1"));
        assert!(same_sheet_name("DATA", "data"));
        assert!(same_sheet_name("Über", "über"));
        assert!(!same_sheet_name("Sheet1", "Sheet2"));
    }

    #[test]
    fn test_value_from_raw() {
        assert_eq!(value_from_raw("n", "42"), CellValue::Number(42.0));
        assert_eq!(value_from_raw("n", ""), CellValue::Empty);
        assert_eq!(value_from_raw("s", ""), CellValue::Empty);
        assert_eq!(value_from_raw("b", "1"), CellValue::Bool(true));
        assert_eq!(value_from_raw("b", "FALSE"), CellValue::Bool(false));
        assert_eq!(value_from_raw("s", "Hello"), CellValue::Text("Hello".to_string()));
    }

    #[test]
    fn test_unparsable_number_cell_keeps_its_text() {
        assert_eq!(
            value_from_raw("n", "#N/A"),
            CellValue::Text("#N/A".to_string())
        );
    }

    #[test]
    fn test_parent_dir_check() {
        assert!(ensure_parent_dir(Path::new("book.xlsx")).is_ok());
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_parent_dir(&dir.path().join("book.xlsx")).is_ok());
        let err = ensure_parent_dir(&dir.path().join("missing/book.xlsx")).unwrap_err();
        assert!(matches!(err, SheetEditError::Io { .. }));
    }
}
