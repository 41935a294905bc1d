//! sheetedit-core: create Excel workbooks and read or write single cells
//!
//! The workbook format itself is handled by `umya-spreadsheet`; this crate adds
//! cell-address validation, default worksheet resolution and typed errors on
//! top of it.

pub mod address;
pub mod config;
pub mod error;
pub mod probe;
pub mod service;
pub mod value;

pub use address::CellAddress;
pub use config::{MissingSheetPolicy, ServiceConfig, SheetEditConfig};
pub use error::{ErrorKind, Result, SheetEditError};
pub use service::SpreadsheetService;
pub use value::{Cell, CellValue};
