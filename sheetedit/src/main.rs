use anyhow::{Context, Result};
use clap::Parser;
use sheetedit_core::{CellValue, SheetEditConfig, SpreadsheetService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod formatter;

const DEFAULT_CONFIG_FILE: &str = "sheetedit.toml";

#[derive(Parser)]
#[command(name = "sheetedit")]
#[command(about = "Create Excel workbooks and read or write single cells", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Worksheet name (default: Sheet1, or the configured default)
    #[arg(short, long, value_name = "SHEET")]
    sheet: Option<String>,

    /// Cell address (e.g., A1)
    #[arg(short, long, value_name = "CELL")]
    cell: Option<String>,

    /// Value to write to the cell
    #[arg(short, long, value_name = "VALUE", allow_hyphen_values = true)]
    value: Option<String>,

    /// Read value from cell
    #[arg(short, long)]
    read: bool,

    /// Write value to cell
    #[arg(short, long)]
    write: bool,

    /// Create a new Excel file
    #[arg(short = 'n', long = "new")]
    create: bool,

    /// List the worksheets in the file
    #[arg(short, long)]
    list: bool,

    /// Store --value as text instead of detecting numbers and booleans
    #[arg(long)]
    text: bool,

    /// Path to configuration file (TOML)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

/// What a given flag combination asks for, in validation order
#[derive(Debug, PartialEq)]
enum Action {
    Create,
    List,
    Read { cell: String },
    Write { cell: String, value: CellValue },
    Guidance(&'static str),
}

impl Cli {
    fn action(&self) -> Action {
        if self.create {
            return Action::Create;
        }
        if self.list {
            return Action::List;
        }
        if !self.read && !self.write {
            return Action::Guidance("Please specify either --read or --write");
        }

        let value = self.value.as_deref().filter(|v| !v.is_empty());
        if self.write && value.is_none() {
            return Action::Guidance("Please provide a value to write using --value");
        }

        let Some(cell) = self.cell.as_deref().filter(|c| !c.is_empty()) else {
            return Action::Guidance("Please specify a cell address using --cell");
        };

        match value {
            Some(raw) if !self.read => Action::Write {
                cell: cell.to_string(),
                value: if self.text {
                    CellValue::Text(raw.to_string())
                } else {
                    CellValue::infer(raw)
                },
            },
            _ => Action::Read {
                cell: cell.to_string(),
            },
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SheetEditConfig> {
    let config = if let Some(config_path) = path {
        SheetEditConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_config_path.exists() {
            SheetEditConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            SheetEditConfig::default()
        }
    };

    config
        .with_env_overrides()
        .context("Invalid default worksheet override")
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    log::debug!("Using config: {:?}", config.app);
    let service = SpreadsheetService::new(config.app);
    let sheet = cli.sheet.as_deref();

    match cli.action() {
        Action::Create => {
            let created = service.create_workbook(&cli.file, sheet)?;
            formatter::print_created(&cli.file, &created);
        }
        Action::List => {
            let sheets = service.list_sheets(&cli.file)?;
            formatter::print_sheets(&cli.file, &sheets);
        }
        Action::Read { cell } => {
            let cell = service.read_cell(&cli.file, sheet, &cell)?;
            formatter::print_cell(&cell);
        }
        Action::Write { cell, value } => {
            service.write_cell(&cli.file, sheet, &cell, value.clone())?;
            formatter::print_written(&cell, &value);
        }
        Action::Guidance(message) => formatter::print_guidance(message),
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter::print_error(&err);
            ExitCode::FAILURE
        }
    }
}
