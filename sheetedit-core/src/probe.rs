//! Read-only peek at a workbook package without loading cell data

use crate::error::{Result, SheetEditError};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Worksheet names in workbook order, read from `xl/workbook.xml`
pub fn sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SheetEditError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| SheetEditError::io(path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| SheetEditError::document(path, e))?;

    let mut workbook_xml = String::new();
    archive
        .by_name(WORKBOOK_PART)
        .map_err(|e| SheetEditError::document(path, format!("{WORKBOOK_PART}: {e}")))?
        .read_to_string(&mut workbook_xml)
        .map_err(|e| SheetEditError::io(path, e))?;

    parse_sheet_names(&workbook_xml).map_err(|message| SheetEditError::document(path, message))
}

fn parse_sheet_names(workbook_xml: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(workbook_xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| format!("Error parsing XML: {e}"))?;
                    if attr.key.as_ref() == b"name" {
                        let name = attr
                            .unescape_value()
                            .map_err(|e| format!("Error parsing XML: {e}"))?;
                        sheets.push(name.into_owned());
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Error parsing XML at position {}: {e}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet_names_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Summary" sheetId="1" r:id="rId1"/>
<sheet name="Q&amp;A" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;
        assert_eq!(
            parse_sheet_names(xml).unwrap(),
            vec!["Summary".to_string(), "Q&A".to_string()]
        );
    }

    #[test]
    fn test_parse_prefixed_elements() {
        let xml = r#"<x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:sheets><x:sheet name="Only" sheetId="1"/></x:sheets></x:workbook>"#;
        assert_eq!(parse_sheet_names(xml).unwrap(), vec!["Only".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = sheet_names("definitely-missing.xlsx").unwrap_err();
        assert!(matches!(err, SheetEditError::FileNotFound(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        let err = sheet_names(&path).unwrap_err();
        assert!(matches!(err, SheetEditError::Document { .. }));
    }
}
